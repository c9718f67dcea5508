//! # PlotKit Compiler
//!
//! The toolpath compiler: turns vector line-art into a sequenced motion
//! program for the plotter.
//!
//! Stages, in the order the pipeline runs them:
//! 1. SVG import and path-grammar parsing (curves tessellated inline)
//! 2. Normalization (centering + advisory envelope/complexity checks)
//! 3. Douglas-Peucker simplification
//! 4. Nearest-neighbor path ordering
//! 5. Program emission (flow state machine, sequence numbering)

pub mod compiler;
pub mod emit;
pub mod model;
pub mod normalize;
pub mod optimize;
pub mod parser;
pub mod simplify;
pub mod svg;
pub mod tessellate;

pub use compiler::{CompileStats, CompiledJob, ToolpathCompiler};
pub use emit::{emit_point_list, ProgramEmitter};
pub use model::{Bounds, PlotPath, Point};
pub use normalize::{normalize, ConstraintWarning};
pub use optimize::order_paths;
pub use parser::PathParser;
pub use simplify::{douglas_peucker, simplify_paths};
pub use svg::SvgImporter;
