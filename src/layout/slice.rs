//! Page slices: break points turned into contiguous capture regions

use serde::{Deserialize, Serialize};

/// Region of the scaled content surface that becomes one page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSlice {
    pub start_y: f32,
    pub end_y: f32,
}

impl PageSlice {
    pub fn height(&self) -> f32 {
        self.end_y - self.start_y
    }
}

/// Map break points onto slices of the scaled surface.
///
/// `break_points` must be zero-prefixed and strictly increasing, with
/// `total_height` at or past the last one. The result has one slice per
/// break point, each ending where the next begins.
pub fn calculate_page_slices(break_points: &[f32], total_height: f32, scale: f32) -> Vec<PageSlice> {
    debug_assert!(
        break_points.first().map_or(true, |&first| first == 0.0),
        "break points must start at 0"
    );
    debug_assert!(
        break_points.windows(2).all(|w| w[0] < w[1]),
        "break points must be strictly increasing"
    );

    break_points
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = break_points.get(i + 1).copied().unwrap_or(total_height);
            PageSlice {
                start_y: start * scale,
                end_y: end * scale,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page() {
        let slices = calculate_page_slices(&[0.0], 500.0, 3.0);
        assert_eq!(
            slices,
            vec![PageSlice {
                start_y: 0.0,
                end_y: 1500.0
            }]
        );
    }

    #[test]
    fn test_slices_are_contiguous() {
        let slices = calculate_page_slices(&[0.0, 900.0, 1850.5], 2400.0, 2.0);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start_y, 0.0);
        for pair in slices.windows(2) {
            assert_eq!(pair[0].end_y, pair[1].start_y);
        }
        assert_eq!(slices[2].end_y, 4800.0);
        assert_eq!(slices[1].height(), 1901.0);
    }

    #[test]
    fn test_empty_break_points() {
        assert!(calculate_page_slices(&[], 100.0, 1.0).is_empty());
    }
}
