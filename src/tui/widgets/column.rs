//! Day column: range ingestion and grid rendering
//!
//! A column owns the ranges for one calendar day plus the pagination
//! cursor that fills them. Rendering is a pure function of the ranges and
//! the grid height, so it is safe to re-run on every resize or refresh.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, TimeZone, Utc};
use ratatui::style::Color;

use super::cell::{CellRange, CellState};
use crate::services::PageLoader;
use crate::tui::theme;
use crate::types::LogEntry;

/// Grid rows per day: 15-minute resolution over 24 hours
pub const GRID_HEIGHT: usize = 96;

/// Page size for day-window fetches
pub const DAY_PAGE_LIMIT: usize = 20;

const DAY_MILLIS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Hour number for rows that fall on a whole hour
pub fn hour_marker(row: usize, height: usize) -> Option<u32> {
    (0..24u32).find(|h| *h as usize * height / 24 == row)
}

/// A recorded interval as a fraction of the day window
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

/// Label assigned to one grid row
#[derive(Debug, Clone, PartialEq)]
pub struct LineLabel {
    pub text: String,
    pub color: Color,
    /// True when the label was displaced below the row its range starts at
    pub moved: bool,
}

/// One rendered grid row of a day column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLine {
    pub state: CellState,
    pub color: Color,
    pub label: Option<LineLabel>,
    pub hour: Option<u32>,
}

/// Ranges and pagination state for one visible day
#[derive(Debug, Clone)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub ranges: Vec<TimeRange>,
    pub loader: PageLoader,
}

impl DayColumn {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ranges: Vec::new(),
            loader: PageLoader::new(DAY_PAGE_LIMIT),
        }
    }

    /// Point the column at a new date: ranges are cleared and pagination
    /// starts over. Any in-flight fetch becomes stale.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.ranges.clear();
        self.loader.reset();
    }

    /// Clear data for an explicit reload, keeping the date
    pub fn clear(&mut self) {
        self.ranges.clear();
        self.loader.reset();
    }

    /// The day's [midnight, midnight+24h) window in UTC
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let midnight = self.date.and_hms_opt(0, 0, 0).unwrap();
        let since = match Local.from_local_datetime(&midnight) {
            LocalResult::Single(dt) => dt.to_utc(),
            LocalResult::Ambiguous(earlier, _) => earlier.to_utc(),
            LocalResult::None => {
                // DST spring-forward: midnight doesn't exist, use 01:00
                let fallback = self.date.and_hms_opt(1, 0, 0).unwrap();
                Local
                    .from_local_datetime(&fallback)
                    .earliest()
                    .expect("01:00 should always exist after spring-forward")
                    .to_utc()
            }
        };
        (since, since + Duration::days(1))
    }

    /// Append the fractional ranges of these logs' records, clamped to
    /// this day. Open records run to `now`; records outside the window
    /// and records that collapse to `end < start` are discarded.
    pub fn ingest(&mut self, logs: &[LogEntry], now: DateTime<Utc>) {
        let (since, until) = self.window();
        for log in logs {
            let label = log.range_label();
            for record in &log.records {
                let start_time = record.start;
                let end_time = record.end.unwrap_or(now);
                if start_time > until || end_time < since {
                    continue;
                }
                let start_time = start_time.max(since);
                let end_time = end_time.min(until);
                if end_time < start_time {
                    continue;
                }
                let start = (start_time - since).num_milliseconds() as f64 / DAY_MILLIS;
                let end = (end_time - since).num_milliseconds() as f64 / DAY_MILLIS;
                self.ranges.push(TimeRange {
                    start,
                    end,
                    label: label.clone(),
                });
            }
        }
    }
}

/// Render a day's ranges into `height` grid rows.
///
/// Each range is scaled to real-valued rows, split into a fractional head
/// cell, full interior rows, and a fractional tail cell, and every row is
/// classified independently. Labels land on the first free row at or
/// below where their range begins; a label displaced past an occupied row
/// is flagged moved, and one that finds no free row is dropped.
pub fn render_lines(ranges: &[TimeRange], height: usize) -> Vec<ColumnLine> {
    let mut row_ranges: Vec<Vec<CellRange>> = vec![Vec::new(); height];
    let mut labels: Vec<Option<LineLabel>> = vec![None; height];

    for range in ranges {
        let color = theme::label_color(&range.label);

        let rstart = (range.start * height as f64).clamp(0.0, height as f64);
        let rend = (range.end * height as f64).clamp(0.0, height as f64);

        let mut slot = rstart.ceil() as usize;
        let mut moved = false;
        while slot < height {
            if labels[slot].is_none() {
                labels[slot] = Some(LineLabel {
                    text: range.label.clone(),
                    color,
                    moved,
                });
                break;
            }
            slot += 1;
            moved = true;
        }

        let head = rstart.fract();
        let tail = rend.fract();

        if head != 0.0 && tail != 0.0 && rstart.floor() == rend.floor() {
            row_ranges[rstart.floor() as usize].push(CellRange::new(head, tail, color));
            continue;
        }
        if head != 0.0 {
            row_ranges[rstart.floor() as usize].push(CellRange::new(head, 1.0, color));
        }
        if tail != 0.0 {
            row_ranges[rend.floor() as usize].push(CellRange::new(0.0, tail, color));
        }
        for row in rstart.ceil() as usize..rend.floor() as usize {
            row_ranges[row].push(CellRange::new(0.0, 1.0, color));
        }
    }

    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let (state, color) = CellState::from_ranges(&row_ranges[row]);
        lines.push(ColumnLine {
            state,
            color,
            label: labels[row].take(),
            hour: hour_marker(row, height),
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogRecord;

    fn range(start: f64, end: f64, label: &str) -> TimeRange {
        TimeRange {
            start,
            end,
            label: label.into(),
        }
    }

    fn log(name: &str, records: Vec<LogRecord>) -> LogEntry {
        LogEntry {
            id: 1,
            name: name.into(),
            description: None,
            category: None,
            task: None,
            flags: vec![],
            stopped: false,
            records,
        }
    }

    // ========== hour_marker tests ==========

    #[test]
    fn test_hour_marker_rows() {
        assert_eq!(hour_marker(0, GRID_HEIGHT), Some(0));
        assert_eq!(hour_marker(4, GRID_HEIGHT), Some(1));
        assert_eq!(hour_marker(92, GRID_HEIGHT), Some(23));
        assert_eq!(hour_marker(1, GRID_HEIGHT), None);
        assert_eq!(hour_marker(95, GRID_HEIGHT), None);
    }

    // ========== render_lines tests ==========

    #[test]
    fn test_render_single_range_fills_rows() {
        let ranges = vec![range(10.0 / 96.0, 50.0 / 96.0, "deep work")];
        let lines = render_lines(&ranges, GRID_HEIGHT);

        for (row, line) in lines.iter().enumerate() {
            if (10..50).contains(&row) {
                assert_eq!(line.state, CellState::Full, "row {}", row);
            } else {
                assert_eq!(line.state, CellState::Empty, "row {}", row);
            }
        }

        let label = lines[10].label.as_ref().unwrap();
        assert_eq!(label.text, "deep work");
        assert!(!label.moved);
        assert!(lines.iter().enumerate().all(|(i, l)| i == 10 || l.label.is_none()));
    }

    #[test]
    fn test_render_colliding_label_moves_down() {
        let ranges = vec![
            range(10.0 / 96.0, 20.0 / 96.0, "first"),
            range(10.0 / 96.0, 30.0 / 96.0, "second"),
        ];
        let lines = render_lines(&ranges, GRID_HEIGHT);

        let first = lines[10].label.as_ref().unwrap();
        assert_eq!(first.text, "first");
        assert!(!first.moved);

        let second = lines[11].label.as_ref().unwrap();
        assert_eq!(second.text, "second");
        assert!(second.moved);
    }

    #[test]
    fn test_render_no_row_holds_two_labels() {
        let ranges: Vec<TimeRange> = (0..5)
            .map(|i| range(0.0, (i + 1) as f64 / 96.0, &format!("log-{}", i)))
            .collect();
        let lines = render_lines(&ranges, GRID_HEIGHT);
        for line in &lines {
            // Option holds at most one by construction; check distribution
            if let Some(label) = &line.label {
                assert!(label.text.starts_with("log-"));
            }
        }
        let placed: Vec<_> = lines.iter().filter_map(|l| l.label.as_ref()).collect();
        assert_eq!(placed.len(), 5);
    }

    #[test]
    fn test_render_label_dropped_at_grid_bottom() {
        // Three ranges near the bottom of a tiny grid: only two free rows
        let ranges = vec![
            range(2.0 / 4.0, 1.0, "a"),
            range(2.0 / 4.0, 1.0, "b"),
            range(2.0 / 4.0, 1.0, "c"),
        ];
        let lines = render_lines(&ranges, 4);
        let placed: Vec<_> = lines.iter().filter_map(|l| l.label.as_ref()).collect();
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].text, "a");
        assert_eq!(placed[1].text, "b");
        assert!(placed[1].moved);
    }

    #[test]
    fn test_render_fractional_head_and_tail() {
        // Rows 10.5..12.25: head covers the lower half of row 10,
        // row 11 is full, tail covers the top quarter of row 12
        let ranges = vec![range(10.5 / 96.0, 12.25 / 96.0, "split")];
        let lines = render_lines(&ranges, GRID_HEIGHT);
        assert_eq!(lines[10].state, CellState::Start4);
        assert_eq!(lines[11].state, CellState::Full);
        assert_eq!(lines[12].state, CellState::End2);
        assert_eq!(lines[13].state, CellState::Empty);
    }

    #[test]
    fn test_render_subcell_range() {
        // Entirely inside row 10, centered
        let ranges = vec![range(10.25 / 96.0, 10.75 / 96.0, "blip")];
        let lines = render_lines(&ranges, GRID_HEIGHT);
        assert_eq!(lines[10].state, CellState::Middle);
        // Label still lands on the next whole row down
        assert!(lines[11].label.is_some());
    }

    #[test]
    fn test_render_is_idempotent() {
        let ranges = vec![
            range(0.1, 0.4, "one"),
            range(0.35, 0.6, "two"),
            range(0.9, 1.0, "three"),
        ];
        assert_eq!(
            render_lines(&ranges, GRID_HEIGHT),
            render_lines(&ranges, GRID_HEIGHT)
        );
    }

    #[test]
    fn test_render_clamps_out_of_bounds_ranges() {
        let ranges = vec![range(-0.5, 1.5, "overflow")];
        let lines = render_lines(&ranges, GRID_HEIGHT);
        assert!(lines.iter().all(|l| l.state == CellState::Full));
    }

    #[test]
    fn test_render_hour_rows_marked() {
        let lines = render_lines(&[], GRID_HEIGHT);
        assert_eq!(lines[0].hour, Some(0));
        assert_eq!(lines[48].hour, Some(12));
        assert_eq!(lines[3].hour, None);
    }

    // ========== DayColumn tests ==========

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    #[test]
    fn test_column_window_spans_24h() {
        let column = DayColumn::new(test_date());
        let (since, until) = column.window();
        assert_eq!(until - since, Duration::days(1));
    }

    #[test]
    fn test_ingest_fractions_of_day() {
        let mut column = DayColumn::new(test_date());
        let (since, _) = column.window();
        let entry = log(
            "work",
            vec![LogRecord {
                id: None,
                start: since + Duration::hours(6),
                end: Some(since + Duration::hours(12)),
            }],
        );
        column.ingest(&[entry], since + Duration::hours(13));
        assert_eq!(column.ranges.len(), 1);
        assert!((column.ranges[0].start - 0.25).abs() < 1e-9);
        assert!((column.ranges[0].end - 0.5).abs() < 1e-9);
        assert_eq!(column.ranges[0].label, "work: ");
    }

    #[test]
    fn test_ingest_open_record_runs_to_now() {
        let mut column = DayColumn::new(test_date());
        let (since, _) = column.window();
        let entry = log(
            "ongoing",
            vec![LogRecord {
                id: None,
                start: since + Duration::hours(6),
                end: None,
            }],
        );
        column.ingest(&[entry], since + Duration::hours(18));
        assert!((column.ranges[0].end - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_ingest_open_record_clamped_to_window_on_past_days() {
        let mut column = DayColumn::new(test_date());
        let (since, _) = column.window();
        let entry = log(
            "overnight",
            vec![LogRecord {
                id: None,
                start: since + Duration::hours(20),
                end: None,
            }],
        );
        // "now" is two days later; the range must stop at midnight
        column.ingest(&[entry], since + Duration::days(2));
        assert!((column.ranges[0].end - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ingest_skips_records_outside_window() {
        let mut column = DayColumn::new(test_date());
        let (since, until) = column.window();
        let entry = log(
            "elsewhere",
            vec![
                LogRecord {
                    id: None,
                    start: since - Duration::hours(5),
                    end: Some(since - Duration::hours(4)),
                },
                LogRecord {
                    id: None,
                    start: until + Duration::hours(1),
                    end: Some(until + Duration::hours(2)),
                },
            ],
        );
        column.ingest(&[entry], until + Duration::hours(3));
        assert!(column.ranges.is_empty());
    }

    #[test]
    fn test_ingest_discards_inverted_range() {
        let mut column = DayColumn::new(test_date());
        let (since, _) = column.window();
        // Open record that starts after "now"
        let entry = log(
            "future",
            vec![LogRecord {
                id: None,
                start: since + Duration::hours(10),
                end: None,
            }],
        );
        column.ingest(&[entry], since + Duration::hours(9));
        assert!(column.ranges.is_empty());
    }

    #[test]
    fn test_ingest_appends_across_pages() {
        let mut column = DayColumn::new(test_date());
        let (since, _) = column.window();
        let make = |h: i64| {
            log(
                "page",
                vec![LogRecord {
                    id: None,
                    start: since + Duration::hours(h),
                    end: Some(since + Duration::hours(h + 1)),
                }],
            )
        };
        column.ingest(&[make(1)], since + Duration::hours(23));
        column.ingest(&[make(3)], since + Duration::hours(23));
        assert_eq!(column.ranges.len(), 2);
    }

    #[test]
    fn test_set_date_resets_column() {
        let mut column = DayColumn::new(test_date());
        column.ranges.push(range(0.0, 0.5, "old"));
        let ticket = column.loader.request().unwrap();
        column.loader.accept_page(ticket.offset, DAY_PAGE_LIMIT);
        assert_eq!(column.loader.offset(), DAY_PAGE_LIMIT);

        column.set_date(test_date() + Duration::days(1));
        assert!(column.ranges.is_empty());
        assert_eq!(column.loader.offset(), 0);
        assert!(!column.loader.reached_end());
    }
}
