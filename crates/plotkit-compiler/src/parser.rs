//! Vector path grammar parser
//!
//! Parses SVG-style path data (`M/m L/l H/h V/v C/c Q/q A/a Z/z`) into an
//! ordered list of [`PlotPath`]s. The grammar is handled by an explicit
//! tokenizer plus a per-command arity check; a wrong coordinate count is a
//! fatal parse error and no partial result is produced. Curves are
//! tessellated inline as they are encountered.
//!
//! Shape primitives (line, rectangle, circle, ellipse, polyline, polygon)
//! are built directly as point lists without going through the grammar.

use crate::model::{PlotPath, Point};
use crate::tessellate;
use plotkit_core::{GeometrySettings, ParseError, Result};

/// Segment count used when converting circles and ellipses to polylines.
const CIRCLE_SEGMENTS: usize = 36;

/// A lexical token of the path grammar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathToken {
    /// A single-letter command
    Command(char),
    /// A numeric coordinate
    Number(f64),
}

/// Split path data into command letters and numbers.
///
/// Whitespace and commas separate tokens; numbers may carry a sign, a
/// decimal point, and an exponent. A sign or dot that never reaches a digit
/// is rejected.
pub fn tokenize(data: &str) -> Result<Vec<PathToken>> {
    let bytes = data.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() || c == ',' {
            i += 1;
            continue;
        }
        if c.is_ascii_alphabetic() {
            tokens.push(PathToken::Command(c));
            i += 1;
            continue;
        }

        let start = i;
        if c == '+' || c == '-' {
            i += 1;
        }
        let mut seen_digit = false;
        let mut seen_dot = false;
        while i < bytes.len() {
            let ch = bytes[i] as char;
            if ch.is_ascii_digit() {
                seen_digit = true;
                i += 1;
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                i += 1;
            } else if (ch == 'e' || ch == 'E') && seen_digit {
                // Exponent only counts when followed by [sign]digits;
                // otherwise leave the letter for the command lexer.
                let mut j = i + 1;
                if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                    j += 1;
                }
                if j < bytes.len() && bytes[j].is_ascii_digit() {
                    i = j;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                break;
            } else {
                break;
            }
        }

        if !seen_digit {
            let end = if i > start { i } else { start + 1 };
            return Err(ParseError::InvalidNumber {
                token: data[start..end].to_string(),
            }
            .into());
        }
        let token = &data[start..i];
        let value: f64 = token.parse().map_err(|_| ParseError::InvalidNumber {
            token: token.to_string(),
        })?;
        tokens.push(PathToken::Number(value));
    }

    Ok(tokens)
}

/// Coordinates required per repeat group for a command.
fn group_arity(command: char) -> usize {
    match command {
        'M' | 'm' | 'L' | 'l' => 2,
        'H' | 'h' | 'V' | 'v' => 1,
        'C' | 'c' => 6,
        'Q' | 'q' => 4,
        'A' | 'a' => 7,
        _ => 0,
    }
}

/// Stateful path-data parser
///
/// Tracks the running cursor and the start of the open subpath while
/// translating commands into points.
pub struct PathParser<'a> {
    geometry: &'a GeometrySettings,
    scale: f64,
    paths: Vec<PlotPath>,
    current: Vec<Point>,
    cursor: (f64, f64),
    subpath_start: (f64, f64),
}

impl<'a> PathParser<'a> {
    /// Create a parser with the given tessellation settings and a uniform
    /// input scale factor.
    pub fn new(geometry: &'a GeometrySettings, scale: f64) -> Self {
        Self {
            geometry,
            scale,
            paths: Vec::new(),
            current: Vec::new(),
            cursor: (0.0, 0.0),
            subpath_start: (0.0, 0.0),
        }
    }

    /// Parse one `d` attribute into subpaths.
    pub fn parse(mut self, data: &str) -> Result<Vec<PlotPath>> {
        let tokens = tokenize(data)?;
        let mut i = 0;

        while i < tokens.len() {
            let command = match tokens[i] {
                PathToken::Command(c) => c,
                PathToken::Number(n) => {
                    return Err(ParseError::ExpectedCommand {
                        token: n.to_string(),
                    }
                    .into())
                }
            };
            i += 1;

            let mut args = Vec::new();
            while let Some(PathToken::Number(n)) = tokens.get(i) {
                args.push(n * self.scale);
                i += 1;
            }

            self.apply(command, &args)?;
        }

        self.flush();
        Ok(self.paths)
    }

    fn target(&self, x: f64, y: f64, relative: bool) -> (f64, f64) {
        if relative {
            (self.cursor.0 + x, self.cursor.1 + y)
        } else {
            (x, y)
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.paths.push(PlotPath::new(std::mem::take(&mut self.current)));
        }
    }

    fn check_arity(command: char, args: &[f64]) -> Result<()> {
        let group = group_arity(command);
        let ok = if group == 0 {
            args.is_empty()
        } else {
            !args.is_empty() && args.len() % group == 0
        };
        if ok {
            Ok(())
        } else {
            Err(ParseError::WrongArity {
                command,
                expected: group,
                got: args.len(),
            }
            .into())
        }
    }

    fn apply(&mut self, command: char, args: &[f64]) -> Result<()> {
        match command {
            'M' | 'm' => {
                Self::check_arity(command, args)?;
                let relative = command == 'm';
                self.flush();

                let (x, y) = self.target(args[0], args[1], relative);
                self.cursor = (x, y);
                self.subpath_start = (x, y);
                self.current.push(Point::travel(x, y));

                // Extra coordinate pairs are implicit line-tos.
                for pair in args[2..].chunks(2) {
                    let (x, y) = self.target(pair[0], pair[1], relative);
                    self.cursor = (x, y);
                    self.current.push(Point::draw(x, y));
                }
            }
            'L' | 'l' => {
                Self::check_arity(command, args)?;
                let relative = command == 'l';
                for pair in args.chunks(2) {
                    let (x, y) = self.target(pair[0], pair[1], relative);
                    self.cursor = (x, y);
                    self.current.push(Point::draw(x, y));
                }
            }
            'H' | 'h' => {
                Self::check_arity(command, args)?;
                for &x in args {
                    self.cursor.0 = if command == 'h' { self.cursor.0 + x } else { x };
                    self.current.push(Point::draw(self.cursor.0, self.cursor.1));
                }
            }
            'V' | 'v' => {
                Self::check_arity(command, args)?;
                for &y in args {
                    self.cursor.1 = if command == 'v' { self.cursor.1 + y } else { y };
                    self.current.push(Point::draw(self.cursor.0, self.cursor.1));
                }
            }
            'C' | 'c' => {
                Self::check_arity(command, args)?;
                let relative = command == 'c';
                for set in args.chunks(6) {
                    let (x1, y1) = self.target(set[0], set[1], relative);
                    let (x2, y2) = self.target(set[2], set[3], relative);
                    let (x, y) = self.target(set[4], set[5], relative);
                    let samples = tessellate::cubic(
                        self.cursor.0,
                        self.cursor.1,
                        x1,
                        y1,
                        x2,
                        y2,
                        x,
                        y,
                        self.geometry.curve_tolerance_mm,
                    );
                    for (sx, sy) in samples {
                        self.current.push(Point::draw(sx, sy));
                    }
                    self.cursor = (x, y);
                }
            }
            'Q' | 'q' => {
                Self::check_arity(command, args)?;
                let relative = command == 'q';
                for set in args.chunks(4) {
                    let (x1, y1) = self.target(set[0], set[1], relative);
                    let (x, y) = self.target(set[2], set[3], relative);
                    let samples = tessellate::quadratic(
                        self.cursor.0,
                        self.cursor.1,
                        x1,
                        y1,
                        x,
                        y,
                        self.geometry.curve_tolerance_mm,
                    );
                    for (sx, sy) in samples {
                        self.current.push(Point::draw(sx, sy));
                    }
                    self.cursor = (x, y);
                }
            }
            'A' | 'a' => {
                Self::check_arity(command, args)?;
                let relative = command == 'a';
                for set in args.chunks(7) {
                    // Radii, rotation, and flags are validated for arity but
                    // the arc is flattened as a straight chord.
                    let (x, y) = self.target(set[5], set[6], relative);
                    for (sx, sy) in tessellate::arc_chord(self.cursor.0, self.cursor.1, x, y) {
                        self.current.push(Point::draw(sx, sy));
                    }
                    self.cursor = (x, y);
                }
            }
            'Z' | 'z' => {
                Self::check_arity(command, args)?;
                if !self.current.is_empty() {
                    let (x, y) = self.subpath_start;
                    self.current.push(Point::draw(x, y));
                    self.cursor = (x, y);
                }
            }
            'S' | 's' | 'T' | 't' => {
                // Smooth curve shorthands are not supported; skip them the
                // way the device firmware tooling always has.
                tracing::warn!(command = %command, "skipping unsupported smooth-curve command");
            }
            other => {
                return Err(ParseError::UnknownCommand { command: other }.into());
            }
        }
        Ok(())
    }
}

/// Build a path for an SVG `line` element.
pub fn line_segment(x1: f64, y1: f64, x2: f64, y2: f64) -> PlotPath {
    PlotPath::new(vec![Point::travel(x1, y1), Point::draw(x2, y2)])
}

/// Build a closed rectangle path from its origin and size.
pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> PlotPath {
    PlotPath::new(vec![
        Point::travel(x, y),
        Point::draw(x + width, y),
        Point::draw(x + width, y + height),
        Point::draw(x, y + height),
        Point::draw(x, y),
    ])
}

/// Build a circle as a closed polyline.
pub fn circle(cx: f64, cy: f64, r: f64) -> PlotPath {
    ellipse(cx, cy, r, r)
}

/// Build an ellipse as a closed polyline.
pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> PlotPath {
    let mut points = Vec::with_capacity(CIRCLE_SEGMENTS + 1);
    for i in 0..=CIRCLE_SEGMENTS {
        let angle = (i as f64 / CIRCLE_SEGMENTS as f64) * std::f64::consts::TAU;
        let x = cx + rx * angle.cos();
        let y = cy + ry * angle.sin();
        points.push(if i == 0 {
            Point::travel(x, y)
        } else {
            Point::draw(x, y)
        });
    }
    PlotPath::new(points)
}

/// Build a path from a flat coordinate list (`polyline`/`polygon`).
///
/// Returns `None` when fewer than one full pair is present; an odd
/// coordinate count is rejected.
pub fn polyline(coords: &[f64], close: bool) -> Result<Option<PlotPath>> {
    if coords.len() < 2 {
        return Ok(None);
    }
    if coords.len() % 2 != 0 {
        return Err(ParseError::Svg {
            reason: format!("odd coordinate count {} in points attribute", coords.len()),
        }
        .into());
    }

    let mut points = vec![Point::travel(coords[0], coords[1])];
    for pair in coords[2..].chunks(2) {
        points.push(Point::draw(pair[0], pair[1]));
    }
    if close && coords.len() >= 4 {
        points.push(Point::draw(coords[0], coords[1]));
    }
    Ok(Some(PlotPath::new(points)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::Error;

    fn parse(data: &str) -> Result<Vec<PlotPath>> {
        let geometry = GeometrySettings::default();
        PathParser::new(&geometry, 1.0).parse(data)
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = tokenize("M 1,-2.5.5 1e2").unwrap();
        assert_eq!(
            tokens,
            vec![
                PathToken::Command('M'),
                PathToken::Number(1.0),
                PathToken::Number(-2.5),
                PathToken::Number(0.5),
                PathToken::Number(100.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_rejects_bare_sign() {
        let err = tokenize("M - 3").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_move_then_lines() {
        let paths = parse("M 10 10 L 20 10 20 20").unwrap();
        assert_eq!(paths.len(), 1);
        let points = &paths[0].points;
        assert_eq!(points.len(), 3);
        assert!(points[0].is_travel);
        assert!(!points[1].is_travel);
        assert_eq!((points[2].x, points[2].y), (20.0, 20.0));
    }

    #[test]
    fn test_implicit_lineto_after_move() {
        let paths = parse("M 0 0 5 0 5 5").unwrap();
        assert_eq!(paths.len(), 1);
        let points = &paths[0].points;
        assert_eq!(points.len(), 3);
        assert!(points[0].is_travel);
        assert!(!points[1].is_travel && !points[2].is_travel);
    }

    #[test]
    fn test_relative_commands_accumulate() {
        let paths = parse("m 1 1 l 2 0 h 3 v -1").unwrap();
        let points = &paths[0].points;
        assert_eq!((points[1].x, points[1].y), (3.0, 1.0));
        assert_eq!((points[2].x, points[2].y), (6.0, 1.0));
        assert_eq!((points[3].x, points[3].y), (6.0, 0.0));
    }

    #[test]
    fn test_each_move_starts_a_new_path() {
        let paths = parse("M 0 0 L 1 0 M 10 10 L 11 10").unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[1].points[0].is_travel);
    }

    #[test]
    fn test_close_returns_to_subpath_start() {
        let paths = parse("M 1 2 L 5 2 L 5 6 Z").unwrap();
        let points = &paths[0].points;
        let last = points.last().unwrap();
        assert_eq!((last.x, last.y), (1.0, 2.0));
        assert!(!last.is_travel);
    }

    #[test]
    fn test_close_does_not_start_new_path() {
        let paths = parse("M 0 0 L 1 0 Z L 0 1").unwrap();
        assert_eq!(paths.len(), 1);
        // The post-close line continues from the subpath start.
        let last = paths[0].points.last().unwrap();
        assert_eq!((last.x, last.y), (0.0, 1.0));
    }

    #[test]
    fn test_curve_commands_end_on_exact_endpoint() {
        let paths = parse("M 0 0 C 10 0 10 10 20 10 Q 30 10 40 0").unwrap();
        let last = paths[0].points.last().unwrap();
        assert!((last.x - 40.0).abs() < 1e-9);
        assert!(last.y.abs() < 1e-9);
    }

    #[test]
    fn test_arc_is_flattened_to_chord() {
        let paths = parse("M 0 0 A 5 5 0 0 1 10 0").unwrap();
        let points = &paths[0].points;
        // 1 travel + 20 chord samples.
        assert_eq!(points.len(), 21);
        for p in &points[1..] {
            assert!(p.y.abs() < 1e-9);
        }
    }

    #[test]
    fn test_wrong_arity_is_fatal() {
        for data in ["M 5", "L 1 2 3", "C 1 2 3 4 5", "Q 1 2 3", "A 1 2 3 4 5 6", "Z 1"] {
            let err = parse(data).unwrap_err();
            assert!(
                matches!(err, Error::Parse(ParseError::WrongArity { .. })),
                "expected arity error for {data:?}"
            );
        }
    }

    #[test]
    fn test_unknown_command_is_fatal() {
        let err = parse("M 0 0 W 1 2").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::UnknownCommand { command: 'W' })
        ));
    }

    #[test]
    fn test_smooth_commands_are_skipped() {
        let paths = parse("M 0 0 L 1 0 S 2 2 3 3 L 2 0").unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].points.len(), 3);
    }

    #[test]
    fn test_scale_applies_to_all_coordinates() {
        let geometry = GeometrySettings::default();
        let paths = PathParser::new(&geometry, 2.0).parse("M 1 1 l 1 0").unwrap();
        let points = &paths[0].points;
        assert_eq!((points[0].x, points[0].y), (2.0, 2.0));
        assert_eq!((points[1].x, points[1].y), (4.0, 2.0));
    }

    #[test]
    fn test_shape_primitives() {
        let rect = rectangle(0.0, 0.0, 4.0, 2.0);
        assert_eq!(rect.points.len(), 5);
        assert!(rect.points[0].is_travel);
        assert_eq!(rect.points[4], Point::draw(0.0, 0.0));
        assert!((rect.length() - 12.0).abs() < 1e-9);

        let circle = circle(0.0, 0.0, 10.0);
        assert_eq!(circle.points.len(), 37);
        let first = circle.points.first().unwrap();
        let last = circle.points.last().unwrap();
        assert!((first.x - last.x).abs() < 1e-9);
        assert!((first.y - last.y).abs() < 1e-9);

        let open = polyline(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0], false)
            .unwrap()
            .unwrap();
        assert_eq!(open.points.len(), 3);
        let closed = polyline(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0], true)
            .unwrap()
            .unwrap();
        assert_eq!(closed.points.len(), 4);
        assert_eq!(closed.points[3], Point::draw(0.0, 0.0));

        assert!(polyline(&[1.0], false).unwrap().is_none());
        assert!(polyline(&[0.0, 0.0, 1.0], false).is_err());
    }
}
