//! One-line activity bar for a log's recorded intervals
//!
//! Fractions of the log's overall span are painted into character cells
//! with half-cell rounding, then each cell picks a glyph based on its
//! neighbors so the background rule visually opens around highlighted
//! segments.

/// Coverage state of one bar cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarSegment {
    Empty,
    Full,
    /// Only the right half of the cell is covered
    Left,
    /// Only the left half of the cell is covered
    Right,
}

impl BarSegment {
    /// Combine overlapping coverage within one cell. The two half
    /// coverages close into a full cell.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Empty, seg) => seg,
            (Self::Full, _) => Self::Full,
            (_, Self::Full) => Self::Full,
            (Self::Left, Self::Right) | (Self::Right, Self::Left) => Self::Full,
            (seg, _) => seg,
        }
    }
}

/// Paint fractional ranges into `width` cells with half-cell rounding.
/// A range edge past the midpoint of a cell claims that cell's half.
pub fn layout_segments(ranges: &[(f64, f64)], width: usize) -> Vec<BarSegment> {
    let mut content = vec![BarSegment::Empty; width];

    for &(start, end) in ranges {
        let start = (start * width as f64).max(0.0);
        let end = (end * width as f64).min(width as f64);
        if end <= start {
            continue;
        }

        let mut istart = start.floor() as usize;
        if start.fract() >= 0.5 {
            if istart < width {
                content[istart] = content[istart].merge(BarSegment::Left);
            }
            istart += 1;
        }

        let iend = end.floor() as usize;
        if end.fract() >= 0.5 && iend < width {
            content[iend] = content[iend].merge(BarSegment::Right);
        }

        for cell in content.iter_mut().take(iend.min(width)).skip(istart) {
            *cell = cell.merge(BarSegment::Full);
        }
    }

    content
}

/// Choose a glyph per cell. Returns `(char, highlighted)` pairs; the
/// second element distinguishes activity from the background rule.
/// An empty cell bends its rule away from adjacent coverage; the cell
/// squeezed between coverage on both sides has no joining glyph and
/// degrades to a space.
pub fn bar_glyphs(content: &[BarSegment]) -> Vec<(char, bool)> {
    (0..content.len())
        .map(|i| {
            let prev = if i > 0 { Some(content[i - 1]) } else { None };
            let next = content.get(i + 1).copied();
            match content[i] {
                BarSegment::Left => ('╺', true),
                BarSegment::Right => ('╸', true),
                BarSegment::Full => ('━', true),
                BarSegment::Empty => {
                    let covered_left =
                        matches!(prev, Some(BarSegment::Left) | Some(BarSegment::Full));
                    let covered_right =
                        matches!(next, Some(BarSegment::Right) | Some(BarSegment::Full));
                    match (covered_left, covered_right) {
                        (false, false) => ('━', false),
                        (true, false) => ('╺', false),
                        (false, true) => ('╸', false),
                        (true, true) => (' ', false),
                    }
                }
            }
        })
        .collect()
}

/// Lay out and pick glyphs in one step
pub fn render_bar(ranges: &[(f64, f64)], width: usize) -> Vec<(char, bool)> {
    bar_glyphs(&layout_segments(ranges, width))
}
