//! Sequenced motion program container
//!
//! A program is an ordered list of textual command lines, each prefixed
//! with a strictly increasing sequence number (`N1`, `N2`, ...). Sequence
//! numbers are assigned exactly once, at emission, with no gaps or reuse.
//! On disk a program is newline-delimited, one program per file.

use crate::error::{ProgramError, Result};
use std::path::Path;

/// Extract the sequence number from a `N<seq> ...` command line.
///
/// Returns `None` when the line does not carry a well-formed prefix.
pub fn parse_sequence(line: &str) -> Option<u64> {
    let first = line.split_whitespace().next()?;
    first.strip_prefix('N')?.parse().ok()
}

/// An ordered, sequenced command program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    lines: Vec<String>,
}

impl Program {
    /// Create an empty program
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a program from already-sequenced lines
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Append a command line
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// The command lines in emission order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of commands in the program
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the program contains no commands
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the program as newline-delimited text
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Parse a program from newline-delimited text
    ///
    /// Blank lines are skipped. Every remaining line must carry a
    /// sequence-number prefix.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut lines = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if parse_sequence(line).is_none() {
                return Err(ProgramError::MissingSequence {
                    line_number: idx + 1,
                    line: line.to_string(),
                }
                .into());
            }
            lines.push(line.to_string());
        }
        Ok(Self { lines })
    }

    /// Write the program to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Read a program back from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let program = Self::from_text(&text)?;
        tracing::debug!(commands = program.len(), "loaded program");
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence() {
        assert_eq!(parse_sequence("N1 G28"), Some(1));
        assert_eq!(parse_sequence("N42 G1 X1.00 Y2.00 F600"), Some(42));
        assert_eq!(parse_sequence("G28"), None);
        assert_eq!(parse_sequence("Nx G28"), None);
        assert_eq!(parse_sequence(""), None);
    }

    #[test]
    fn test_from_text_skips_blanks_and_validates() {
        let program = Program::from_text("N1 G28\n\nN2 M5\n").unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.lines()[1], "N2 M5");

        let err = Program::from_text("N1 G28\nM5").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Program(ProgramError::MissingSequence { line_number: 2, .. })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.gcode");

        let mut program = Program::new();
        program.push("N1 G28".to_string());
        program.push("N2 M114".to_string());
        program.save(&path).unwrap();

        let loaded = Program::load(&path).unwrap();
        assert_eq!(loaded, program);
    }
}
