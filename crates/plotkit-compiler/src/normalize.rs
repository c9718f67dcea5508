//! Geometry normalization and advisory validation
//!
//! Centers all paths on the origin, then checks the result against the
//! circular work envelope and the job complexity budgets. Every violation
//! is collected as a warning; none of them stops compilation.

use crate::model::{Bounds, PlotPath};
use plotkit_core::EnvelopeSettings;

/// An advisory constraint violation found during normalization
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintWarning {
    /// A point lies outside the circular work envelope
    OutsideEnvelope {
        /// X coordinate of the offending point (after centering).
        x: f64,
        /// Y coordinate of the offending point (after centering).
        y: f64,
        /// The configured envelope radius in mm.
        radius_mm: f64,
    },
    /// The job has more paths than the configured maximum
    TooManyPaths { count: usize, max: usize },
    /// The combined path length exceeds the configured maximum
    TotalLengthExceeded { length_mm: f64, max_mm: f64 },
    /// The job has more points than the configured maximum
    TooManyPoints { count: usize, max: usize },
}

impl std::fmt::Display for ConstraintWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutsideEnvelope { x, y, radius_mm } => {
                write!(f, "Point ({:.1}, {:.1}) outside envelope radius {}mm", x, y, radius_mm)
            }
            Self::TooManyPaths { count, max } => {
                write!(f, "Too many paths: {} > {}", count, max)
            }
            Self::TotalLengthExceeded { length_mm, max_mm } => {
                write!(f, "Total length too long: {:.1}mm > {}mm", length_mm, max_mm)
            }
            Self::TooManyPoints { count, max } => {
                write!(f, "Too many points: {} > {}", count, max)
            }
        }
    }
}

/// Center the geometry on the origin and validate it.
///
/// Translation is the only mutation; validation runs on the translated
/// points and only collects warnings. Empty input is a no-op.
pub fn normalize(paths: &mut [PlotPath], envelope: &EnvelopeSettings) -> Vec<ConstraintWarning> {
    let Some(bounds) = Bounds::of(paths) else {
        return Vec::new();
    };

    let (center_x, center_y) = bounds.center();
    for path in paths.iter_mut() {
        for point in &mut path.points {
            point.x -= center_x;
            point.y -= center_y;
        }
    }
    tracing::debug!(
        width = bounds.width(),
        height = bounds.height(),
        "centered geometry on origin"
    );

    let mut warnings = Vec::new();

    for path in paths.iter() {
        for point in &path.points {
            let dist = (point.x * point.x + point.y * point.y).sqrt();
            if dist > envelope.radius_mm {
                warnings.push(ConstraintWarning::OutsideEnvelope {
                    x: point.x,
                    y: point.y,
                    radius_mm: envelope.radius_mm,
                });
            }
        }
    }

    if paths.len() > envelope.max_paths {
        warnings.push(ConstraintWarning::TooManyPaths {
            count: paths.len(),
            max: envelope.max_paths,
        });
    }

    let total_length: f64 = paths.iter().map(|p| p.length()).sum();
    if total_length > envelope.max_total_length_mm {
        warnings.push(ConstraintWarning::TotalLengthExceeded {
            length_mm: total_length,
            max_mm: envelope.max_total_length_mm,
        });
    }

    let total_points: usize = paths.iter().map(|p| p.points.len()).sum();
    if total_points > envelope.max_points {
        warnings.push(ConstraintWarning::TooManyPoints {
            count: total_points,
            max: envelope.max_points,
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn test_centering_moves_bbox_center_to_origin() {
        let mut paths = vec![PlotPath::new(vec![
            Point::travel(10.0, 20.0),
            Point::draw(30.0, 40.0),
        ])];
        let warnings = normalize(&mut paths, &EnvelopeSettings::default());
        assert!(warnings.is_empty());
        assert_eq!((paths[0].points[0].x, paths[0].points[0].y), (-10.0, -10.0));
        assert_eq!((paths[0].points[1].x, paths[0].points[1].y), (10.0, 10.0));
    }

    #[test]
    fn test_empty_input_is_noop() {
        let mut paths: Vec<PlotPath> = Vec::new();
        assert!(normalize(&mut paths, &EnvelopeSettings::default()).is_empty());
    }

    #[test]
    fn test_envelope_warning_names_the_point() {
        let mut paths = vec![PlotPath::new(vec![
            Point::travel(-300.0, 0.0),
            Point::draw(300.0, 0.0),
        ])];
        let warnings = normalize(&mut paths, &EnvelopeSettings::default());
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            warnings[0],
            ConstraintWarning::OutsideEnvelope { x, .. } if x == -300.0
        ));
    }

    #[test]
    fn test_budget_warnings_are_advisory_and_cumulative() {
        let envelope = EnvelopeSettings {
            radius_mm: 1000.0,
            max_paths: 1,
            max_total_length_mm: 5.0,
            max_points: 3,
        };
        let mut paths = vec![
            PlotPath::new(vec![Point::travel(0.0, 0.0), Point::draw(10.0, 0.0)]),
            PlotPath::new(vec![Point::travel(0.0, 5.0), Point::draw(10.0, 5.0)]),
        ];
        let warnings = normalize(&mut paths, &envelope);
        assert_eq!(warnings.len(), 3);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ConstraintWarning::TooManyPaths { count: 2, max: 1 })));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ConstraintWarning::TotalLengthExceeded { .. })));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ConstraintWarning::TooManyPoints { count: 4, max: 3 })));
    }
}
