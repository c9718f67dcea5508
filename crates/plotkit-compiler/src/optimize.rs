//! Path order optimization
//!
//! Greedy nearest-neighbor reordering of whole paths to cut non-productive
//! travel between them. O(n²) in the path count, which the normalizer's
//! complexity budget keeps small. Paths are reordered, never reversed or
//! otherwise mutated.

use crate::model::PlotPath;

/// Reorder paths so each one starts near where the previous one ended.
///
/// The first path stays fixed. At each step the remaining path whose first
/// point is closest to the last placed path's last point is placed next;
/// ties keep the earliest candidate.
pub fn order_paths(paths: Vec<PlotPath>) -> Vec<PlotPath> {
    if paths.len() <= 1 {
        return paths;
    }

    let mut remaining = paths;
    let mut ordered = vec![remaining.remove(0)];

    while !remaining.is_empty() {
        let last_point = *ordered
            .last()
            .and_then(|p| p.last())
            .expect("placed paths are non-empty");

        let mut nearest_idx = 0;
        let mut nearest_dist = f64::INFINITY;
        for (i, path) in remaining.iter().enumerate() {
            if let Some(first) = path.first() {
                let dist = first.distance_to(&last_point);
                if dist < nearest_dist {
                    nearest_dist = dist;
                    nearest_idx = i;
                }
            }
        }

        ordered.push(remaining.remove(nearest_idx));
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn path(from: (f64, f64), to: (f64, f64)) -> PlotPath {
        PlotPath::new(vec![Point::travel(from.0, from.1), Point::draw(to.0, to.1)])
    }

    #[test]
    fn test_nearest_start_is_placed_next() {
        // A ends at (0,0); C starts closer than B.
        let a = path((5.0, 0.0), (0.0, 0.0));
        let b = path((10.0, 0.0), (11.0, 0.0));
        let c = path((1.0, 0.0), (2.0, 0.0));

        let ordered = order_paths(vec![a, b, c]);
        assert_eq!(ordered[0].last().unwrap().x, 0.0);
        assert_eq!(ordered[1].first().unwrap().x, 1.0);
        assert_eq!(ordered[2].first().unwrap().x, 10.0);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let a = path((0.0, 0.0), (0.0, 0.0));
        let b = path((3.0, 0.0), (4.0, 0.0));
        let c = path((-3.0, 0.0), (-4.0, 0.0));

        let ordered = order_paths(vec![a, b, c]);
        // b and c are equidistant; b came first.
        assert_eq!(ordered[1].first().unwrap().x, 3.0);
    }

    #[test]
    fn test_single_path_untouched() {
        let only = path((1.0, 1.0), (2.0, 2.0));
        let ordered = order_paths(vec![only.clone()]);
        assert_eq!(ordered, vec![only]);
    }

    #[test]
    fn test_point_order_within_paths_is_preserved() {
        let a = path((0.0, 0.0), (10.0, 0.0));
        // b's END is near a's end but its START is far; no reversal happens.
        let b = path((20.0, 0.0), (11.0, 0.0));
        let ordered = order_paths(vec![a, b]);
        assert_eq!(ordered[1].first().unwrap().x, 20.0);
        assert_eq!(ordered[1].last().unwrap().x, 11.0);
    }
}
