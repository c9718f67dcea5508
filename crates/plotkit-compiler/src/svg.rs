//! SVG document import
//!
//! Scans an SVG document for drawing elements (`path`, `line`, `rect`,
//! `circle`, `ellipse`, `polyline`, `polygon`) in document order and turns
//! each into one or more [`PlotPath`]s. Path elements go through the
//! grammar parser; the other elements are built as shape primitives.

use crate::model::PlotPath;
use crate::parser::{self, PathParser};
use plotkit_core::{GeometrySettings, ParseError, Result};
use regex::Regex;
use std::path::Path;

/// Extract a quoted attribute value from an element's attribute text.
fn attr_value<'t>(attrs: &'t str, name: &str) -> Option<&'t str> {
    let re = Regex::new(&format!(
        r#"(?:^|\s){}\s*=\s*["']([^"']*)["']"#,
        regex::escape(name)
    ))
    .expect("invalid attribute regex");
    re.captures(attrs).map(|cap| cap.get(1).expect("capture group").as_str())
}

/// Numeric attribute with the SVG default of 0 when absent.
fn numeric_attr(attrs: &str, name: &str) -> Result<f64> {
    match attr_value(attrs, name) {
        None => Ok(0.0),
        Some(value) => value.trim().parse().map_err(|_| {
            ParseError::Svg {
                reason: format!("attribute {}=\"{}\" is not a number", name, value),
            }
            .into()
        }),
    }
}

/// All numbers in a `points` attribute, in order.
fn point_list(value: &str) -> Vec<f64> {
    let re = Regex::new(r"-?\d*\.?\d+").expect("invalid number regex");
    re.find_iter(value)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// SVG importer with a uniform coordinate scale
pub struct SvgImporter<'a> {
    geometry: &'a GeometrySettings,
    scale: f64,
}

impl<'a> SvgImporter<'a> {
    /// Create an importer; `scale` maps SVG units to mm (1.0 = 1 unit/mm).
    pub fn new(geometry: &'a GeometrySettings, scale: f64) -> Self {
        Self { geometry, scale }
    }

    /// Import all drawing elements from an SVG file.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<Vec<PlotPath>> {
        let content = std::fs::read_to_string(path)?;
        self.import_str(&content)
    }

    /// Import all drawing elements from SVG text.
    pub fn import_str(&self, content: &str) -> Result<Vec<PlotPath>> {
        let element_re =
            Regex::new(r#"<(path|line|rect|circle|ellipse|polyline|polygon)\b([^>]*)>"#)
                .expect("invalid element regex");

        let s = self.scale;
        let mut paths = Vec::new();

        for cap in element_re.captures_iter(content) {
            let tag = cap.get(1).expect("tag capture").as_str();
            let attrs = cap.get(2).expect("attrs capture").as_str();

            match tag {
                "path" => {
                    if let Some(d) = attr_value(attrs, "d") {
                        let parsed = PathParser::new(self.geometry, s).parse(d)?;
                        paths.extend(parsed);
                    }
                }
                "line" => {
                    paths.push(parser::line_segment(
                        numeric_attr(attrs, "x1")? * s,
                        numeric_attr(attrs, "y1")? * s,
                        numeric_attr(attrs, "x2")? * s,
                        numeric_attr(attrs, "y2")? * s,
                    ));
                }
                "rect" => {
                    paths.push(parser::rectangle(
                        numeric_attr(attrs, "x")? * s,
                        numeric_attr(attrs, "y")? * s,
                        numeric_attr(attrs, "width")? * s,
                        numeric_attr(attrs, "height")? * s,
                    ));
                }
                "circle" => {
                    paths.push(parser::circle(
                        numeric_attr(attrs, "cx")? * s,
                        numeric_attr(attrs, "cy")? * s,
                        numeric_attr(attrs, "r")? * s,
                    ));
                }
                "ellipse" => {
                    paths.push(parser::ellipse(
                        numeric_attr(attrs, "cx")? * s,
                        numeric_attr(attrs, "cy")? * s,
                        numeric_attr(attrs, "rx")? * s,
                        numeric_attr(attrs, "ry")? * s,
                    ));
                }
                "polyline" | "polygon" => {
                    let coords: Vec<f64> = point_list(attr_value(attrs, "points").unwrap_or(""))
                        .into_iter()
                        .map(|v| v * s)
                        .collect();
                    if let Some(path) = parser::polyline(&coords, tag == "polygon")? {
                        paths.push(path);
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(
            paths = paths.len(),
            points = paths.iter().map(|p| p.points.len()).sum::<usize>(),
            "imported SVG document"
        );
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(content: &str) -> Result<Vec<PlotPath>> {
        let geometry = GeometrySettings::default();
        SvgImporter::new(&geometry, 1.0).import_str(content)
    }

    #[test]
    fn test_elements_in_document_order() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
            <rect x="0" y="0" width="10" height="10"/>
            <path d="M 20 20 L 30 20"/>
            <line x1="0" y1="0" x2="5" y2="5"/>
        </svg>"##;
        let paths = import(svg).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].points.len(), 5);
        assert_eq!(paths[1].points.len(), 2);
        assert_eq!((paths[2].points[1].x, paths[2].points[1].y), (5.0, 5.0));
    }

    #[test]
    fn test_missing_numeric_attributes_default_to_zero() {
        let paths = import(r#"<svg><circle r="5"/></svg>"#).unwrap();
        assert_eq!(paths.len(), 1);
        let first = paths[0].points.first().unwrap();
        assert!((first.x - 5.0).abs() < 1e-9);
        assert!(first.y.abs() < 1e-9);
    }

    #[test]
    fn test_polygon_closes_and_polyline_does_not() {
        let svg = r#"<svg>
            <polyline points="0,0 4,0 4,4"/>
            <polygon points="0,0 4,0 4,4"/>
        </svg>"#;
        let paths = import(svg).unwrap();
        assert_eq!(paths[0].points.len(), 3);
        assert_eq!(paths[1].points.len(), 4);
    }

    #[test]
    fn test_short_point_list_is_skipped() {
        let paths = import(r#"<svg><polyline points="7"/></svg>"#).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_bad_attribute_is_fatal() {
        let err = import(r#"<svg><rect x="wide" width="10"/></svg>"#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_scale_applies_to_shapes() {
        let geometry = GeometrySettings::default();
        let paths = SvgImporter::new(&geometry, 2.0)
            .import_str(r#"<svg><rect width="10" height="5"/></svg>"#)
            .unwrap();
        assert!((paths[0].length() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_attribute_names_do_not_match_suffixes() {
        // stroke-width must not satisfy a lookup for width.
        let attrs = r#"stroke-width="3" width="10""#;
        assert_eq!(attr_value(attrs, "width"), Some("10"));
    }
}
