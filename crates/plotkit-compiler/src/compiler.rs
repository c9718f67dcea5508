//! Compilation pipeline
//!
//! Runs the fixed stage order (parse with inline tessellation, normalize,
//! simplify, optimize, emit) and returns the program together with the
//! collected advisory warnings and job statistics.

use crate::emit::ProgramEmitter;
use crate::model::PlotPath;
use crate::normalize::{self, ConstraintWarning};
use crate::optimize;
use crate::simplify;
use crate::svg::SvgImporter;
use plotkit_core::{Config, Program, Result};
use serde::Serialize;
use std::path::Path;

/// Summary numbers for a compiled job
#[derive(Debug, Clone, Serialize)]
pub struct CompileStats {
    /// Paths in the final ordering
    pub path_count: usize,
    /// Commands in the emitted program
    pub command_count: usize,
    /// Combined path length in mm
    pub total_length_mm: f64,
    /// Rapid positioning commands emitted
    pub rapid_moves: usize,
    /// Productive draw commands emitted
    pub draw_moves: usize,
    /// Rough duration estimate in seconds, from feed rates
    pub estimated_time_sec: f64,
}

/// A compiled job: the program plus everything the caller should surface
#[derive(Debug, Clone)]
pub struct CompiledJob {
    /// The sequenced program
    pub program: Program,
    /// Advisory constraint warnings collected during normalization
    pub warnings: Vec<ConstraintWarning>,
    /// Job statistics
    pub stats: CompileStats,
    /// The ordered paths the program was emitted from
    pub paths: Vec<PlotPath>,
}

/// End-to-end toolpath compiler
#[derive(Debug, Clone)]
pub struct ToolpathCompiler {
    config: Config,
}

impl ToolpathCompiler {
    /// Create a compiler with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Compile an SVG file at 1 unit per mm.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<CompiledJob> {
        let paths =
            SvgImporter::new(&self.config.geometry, 1.0).import_file(path)?;
        Ok(self.compile_paths(paths))
    }

    /// Compile SVG text with an explicit scale factor.
    pub fn compile_svg(&self, content: &str, scale: f64) -> Result<CompiledJob> {
        let paths = SvgImporter::new(&self.config.geometry, scale).import_str(content)?;
        Ok(self.compile_paths(paths))
    }

    /// Run the pipeline stages on already-parsed paths.
    pub fn compile_paths(&self, mut paths: Vec<PlotPath>) -> CompiledJob {
        let warnings = normalize::normalize(&mut paths, &self.config.envelope);
        simplify::simplify_paths(&mut paths, self.config.geometry.simplify_epsilon_mm);
        let paths = optimize::order_paths(paths);

        let program =
            ProgramEmitter::new(self.config.motion, self.config.flow).emit(&paths);
        let stats = self.stats_for(&paths, &program);

        tracing::info!(
            paths = stats.path_count,
            commands = stats.command_count,
            warnings = warnings.len(),
            "compiled job"
        );

        CompiledJob {
            program,
            warnings,
            stats,
            paths,
        }
    }

    fn stats_for(&self, paths: &[PlotPath], program: &Program) -> CompileStats {
        let rapid_moves = program
            .lines()
            .iter()
            .filter(|l| l.contains(" G0 "))
            .count();
        let draw_moves = program
            .lines()
            .iter()
            .filter(|l| l.contains(" G1 "))
            .count();

        let total_length_mm = paths.iter().map(|p| p.length()).sum();
        let estimated_time_sec = draw_moves as f64 * 60.0
            / self.config.motion.draw_feed_rate as f64
            + rapid_moves as f64 * 60.0 / self.config.motion.travel_feed_rate as f64;

        CompileStats {
            path_count: paths.len(),
            command_count: program.len(),
            total_length_mm,
            rapid_moves,
            draw_moves,
            estimated_time_sec,
        }
    }
}
