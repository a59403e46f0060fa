//! Cell classification for the calendar grid
//!
//! A grid cell covers a fixed sub-interval of the day. The ranges that
//! intersect it are first merged, then the merged shape is snapped to the
//! nearest representable partial-block glyph. Terminal cells only have 8
//! distinguishable levels per edge, so positions within half a sub-step
//! (1/16) of an eighth boundary snap to it instead of erroring out.

use ratatui::style::Color;

use crate::tui::theme;

/// Snap tolerance: half of one eighth sub-step
const HALF_STEP: f64 = 1.0 / 16.0;

/// A fractional range inside one cell, carrying the color of the log it
/// came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRange {
    pub start: f64,
    pub end: f64,
    pub color: Color,
}

impl CellRange {
    pub fn new(start: f64, end: f64, color: Color) -> Self {
        Self { start, end, color }
    }
}

/// Merge overlapping ranges into a minimal sorted set.
///
/// Touching ranges coalesce (`next.start <= cur.end`). Merging ranges of
/// different colors degrades the result color to the neutral fallback.
/// Idempotent: merging a merged set returns it unchanged.
pub fn merge_ranges(ranges: &[CellRange]) -> Vec<CellRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<CellRange> = Vec::new();
    for next in sorted {
        match merged.last_mut() {
            Some(cur) if next.start <= cur.end => {
                cur.end = cur.end.max(next.end);
                if cur.color != next.color {
                    cur.color = theme::RANGE_FALLBACK;
                }
            }
            _ => merged.push(next),
        }
    }
    merged
}

/// Classified state of one grid cell. `EndK`/`StartK` cover K eighths
/// touching the cell's top/bottom edge respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Full,
    End1,
    End2,
    End3,
    End4,
    End5,
    End6,
    End7,
    Start1,
    Start2,
    Start3,
    Start4,
    Start5,
    Start6,
    Start7,
    /// Single span strictly inside the cell, roughly centered
    Middle,
    /// More than one disjoint range; not representable by one glyph
    Fuzzy,
}

impl CellState {
    /// Fraction of the cell covered up to (End) or from (Start) the
    /// variant's eighth boundary
    fn range_position(self) -> f64 {
        match self {
            Self::Empty => 0.0,
            Self::Full => 1.0,
            Self::End1 => 1.0 / 8.0,
            Self::End2 => 2.0 / 8.0,
            Self::End3 => 3.0 / 8.0,
            Self::End4 => 4.0 / 8.0,
            Self::End5 => 5.0 / 8.0,
            Self::End6 => 6.0 / 8.0,
            Self::End7 => 7.0 / 8.0,
            Self::Start1 => 7.0 / 8.0,
            Self::Start2 => 6.0 / 8.0,
            Self::Start3 => 5.0 / 8.0,
            Self::Start4 => 4.0 / 8.0,
            Self::Start5 => 3.0 / 8.0,
            Self::Start6 => 2.0 / 8.0,
            Self::Start7 => 1.0 / 8.0,
            Self::Middle => 0.5,
            Self::Fuzzy => 0.5,
        }
    }

    /// Classify the ranges intersecting one cell. Merges first, then
    /// snaps the single remaining range to the closest glyph boundary.
    pub fn from_ranges(ranges: &[CellRange]) -> (Self, Color) {
        let merged = merge_ranges(ranges);

        let range = match merged.as_slice() {
            [] => return (Self::Empty, theme::RANGE_FALLBACK),
            [only] => *only,
            _ => return (Self::Fuzzy, theme::RANGE_FALLBACK),
        };

        let CellRange { start, end, color } = range;

        if start < HALF_STEP && end >= 1.0 - HALF_STEP {
            return (Self::Full, color);
        }

        if start < HALF_STEP {
            // Ending overlap: largest eighth that the range still reaches
            for state in [
                Self::End7,
                Self::End6,
                Self::End5,
                Self::End4,
                Self::End3,
                Self::End2,
                Self::End1,
            ] {
                if end >= state.range_position() - HALF_STEP {
                    return (state, color);
                }
            }
            return (Self::Empty, color);
        }

        if end >= 1.0 - HALF_STEP {
            // Starting overlap: symmetric scan from the boundary nearest 0
            for state in [
                Self::Start7,
                Self::Start6,
                Self::Start5,
                Self::Start4,
                Self::Start3,
                Self::Start2,
                Self::Start1,
            ] {
                if start < state.range_position() + HALF_STEP {
                    return (state, color);
                }
            }
            return (Self::Empty, color);
        }

        if start >= HALF_STEP
            && start < Self::Start4.range_position() + HALF_STEP
            && end >= Self::End4.range_position() - HALF_STEP
            && end < 1.0 - HALF_STEP
        {
            return (Self::Middle, color);
        }

        (Self::Fuzzy, color)
    }

    /// Glyph for this state. The calendar grid grows downward while the
    /// block glyphs fill upward, so some ending overlaps are drawn as the
    /// reversed lower-block of the complement.
    pub fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Full => '█',
            Self::End1 => '▔',
            Self::End2 => '▂',
            Self::End3 => '▄',
            Self::End4 => '▀',
            Self::End5 => '▅',
            Self::End6 => '▆',
            Self::End7 => '▇',
            Self::Start1 => '▁',
            Self::Start2 => '▂',
            Self::Start3 => '▃',
            Self::Start4 => '▄',
            Self::Start5 => '▅',
            Self::Start6 => '▆',
            Self::Start7 => '▇',
            Self::Middle => '━',
            Self::Fuzzy => '░',
        }
    }

    /// Whether the glyph is drawn with reversed foreground/background
    pub fn inverted(self) -> bool {
        matches!(
            self,
            Self::End2 | Self::End3 | Self::End5 | Self::End6 | Self::End7
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: Color = Color::Rgb(0, 45, 112);
    const D: Color = Color::Rgb(22, 90, 90);

    fn r(start: f64, end: f64) -> CellRange {
        CellRange::new(start, end, C)
    }

    // ========== merge_ranges tests ==========

    #[test]
    fn test_merge_empty() {
        assert_eq!(merge_ranges(&[]), vec![]);
    }

    #[test]
    fn test_merge_disjoint_kept_sorted() {
        let merged = merge_ranges(&[r(0.6, 0.8), r(0.1, 0.3)]);
        assert_eq!(merged, vec![r(0.1, 0.3), r(0.6, 0.8)]);
    }

    #[test]
    fn test_merge_overlapping() {
        let merged = merge_ranges(&[r(0.0, 0.5), r(0.4, 0.9)]);
        assert_eq!(merged, vec![r(0.0, 0.9)]);
    }

    #[test]
    fn test_merge_touching_coalesce() {
        let merged = merge_ranges(&[r(0.0, 0.3), r(0.3, 1.0)]);
        assert_eq!(merged, vec![r(0.0, 1.0)]);
    }

    #[test]
    fn test_merge_contained_range_absorbed() {
        let merged = merge_ranges(&[r(0.0, 1.0), r(0.2, 0.4)]);
        assert_eq!(merged, vec![r(0.0, 1.0)]);
    }

    #[test]
    fn test_merge_idempotent() {
        let input = [r(0.0, 0.2), r(0.1, 0.5), r(0.7, 0.8)];
        let once = merge_ranges(&input);
        let twice = merge_ranges(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_result_non_overlapping() {
        let merged = merge_ranges(&[r(0.0, 0.2), r(0.1, 0.4), r(0.5, 0.6), r(0.55, 0.9)]);
        for pair in merged.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn test_merge_color_conflict_degrades_to_fallback() {
        let merged = merge_ranges(&[CellRange::new(0.0, 0.5, C), CellRange::new(0.4, 1.0, D)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].color, theme::RANGE_FALLBACK);
    }

    #[test]
    fn test_merge_same_color_preserved() {
        let merged = merge_ranges(&[r(0.0, 0.5), r(0.4, 1.0)]);
        assert_eq!(merged[0].color, C);
    }

    // ========== classification tests ==========

    #[test]
    fn test_classify_empty() {
        let (state, _) = CellState::from_ranges(&[]);
        assert_eq!(state, CellState::Empty);
    }

    #[test]
    fn test_classify_full() {
        let (state, color) = CellState::from_ranges(&[r(0.0, 1.0)]);
        assert_eq!(state, CellState::Full);
        assert_eq!(color, C);
    }

    #[test]
    fn test_classify_end_half() {
        let (state, _) = CellState::from_ranges(&[r(0.0, 0.5)]);
        assert_eq!(state, CellState::End4);
    }

    #[test]
    fn test_classify_start_half_symmetric() {
        let (state, _) = CellState::from_ranges(&[r(0.5, 1.0)]);
        assert_eq!(state, CellState::Start4);
    }

    #[test]
    fn test_classify_touching_ranges_merge_to_full() {
        let (state, _) = CellState::from_ranges(&[r(0.0, 0.3), r(0.3, 1.0)]);
        assert_eq!(state, CellState::Full);
    }

    #[test]
    fn test_classify_disjoint_is_fuzzy() {
        let (state, color) = CellState::from_ranges(&[r(0.1, 0.3), r(0.6, 0.8)]);
        assert_eq!(state, CellState::Fuzzy);
        assert_eq!(color, theme::RANGE_FALLBACK);
    }

    #[test]
    fn test_classify_snaps_within_tolerance() {
        // 0.49 is within 1/16 of the 4/8 boundary
        let (state, _) = CellState::from_ranges(&[r(0.0, 0.49)]);
        assert_eq!(state, CellState::End4);
        let (state, _) = CellState::from_ranges(&[r(0.51, 1.0)]);
        assert_eq!(state, CellState::Start4);
    }

    #[test]
    fn test_classify_end_boundaries() {
        let (state, _) = CellState::from_ranges(&[r(0.0, 7.0 / 8.0)]);
        assert_eq!(state, CellState::End7);
        let (state, _) = CellState::from_ranges(&[r(0.0, 1.0 / 8.0)]);
        assert_eq!(state, CellState::End1);
    }

    #[test]
    fn test_classify_start_boundaries() {
        let (state, _) = CellState::from_ranges(&[r(1.0 / 8.0, 1.0)]);
        assert_eq!(state, CellState::Start7);
        let (state, _) = CellState::from_ranges(&[r(7.0 / 8.0, 1.0)]);
        assert_eq!(state, CellState::Start1);
    }

    #[test]
    fn test_classify_sliver_at_start_is_empty() {
        // Touches the top edge but reaches no eighth boundary
        let (state, _) = CellState::from_ranges(&[r(0.0, 0.01)]);
        assert_eq!(state, CellState::Empty);
    }

    #[test]
    fn test_classify_middle() {
        let (state, _) = CellState::from_ranges(&[r(0.25, 0.75)]);
        assert_eq!(state, CellState::Middle);
    }

    #[test]
    fn test_classify_short_interior_range_is_fuzzy() {
        // Entirely within the left half: no single glyph represents it
        let (state, _) = CellState::from_ranges(&[r(0.2, 0.35)]);
        assert_eq!(state, CellState::Fuzzy);
    }

    #[test]
    fn test_classify_is_pure() {
        let input = [r(0.1, 0.3), r(0.6, 0.8)];
        assert_eq!(CellState::from_ranges(&input), CellState::from_ranges(&input));
    }

    // ========== glyph tests ==========

    #[test]
    fn test_glyphs_distinct_modulo_inversion() {
        // Same char may appear twice only when the inverted flag differs
        let states = [
            CellState::Empty,
            CellState::Full,
            CellState::End1,
            CellState::End2,
            CellState::End3,
            CellState::End4,
            CellState::End5,
            CellState::End6,
            CellState::End7,
            CellState::Start1,
            CellState::Start2,
            CellState::Start3,
            CellState::Start4,
            CellState::Start5,
            CellState::Start6,
            CellState::Start7,
            CellState::Middle,
            CellState::Fuzzy,
        ];
        let mut seen = Vec::new();
        for state in states {
            let key = (state.glyph(), state.inverted());
            assert!(!seen.contains(&key), "duplicate rendering {:?}", key);
            seen.push(key);
        }
    }

    #[test]
    fn test_full_not_inverted() {
        assert_eq!(CellState::Full.glyph(), '█');
        assert!(!CellState::Full.inverted());
    }

    #[test]
    fn test_reversed_lower_blocks() {
        assert!(CellState::End2.inverted());
        assert!(CellState::End7.inverted());
        assert!(!CellState::End4.inverted());
        assert!(!CellState::Start7.inverted());
    }
}
