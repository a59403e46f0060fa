//! Week calendar view: hour gutter plus seven day columns

use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::column::{render_lines, DayColumn, GRID_HEIGHT};
use crate::tui::theme::Theme;

/// Days shown side by side
pub const WEEK_DAYS: usize = 7;

/// Width of the hour gutter
const GUTTER_WIDTH: u16 = 4;

/// Heading line plus day-number line
pub const HEADER_ROWS: u16 = 2;

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Largest useful grid scroll for a viewport of `height` total rows
pub fn max_scroll(height: u16) -> usize {
    GRID_HEIGHT.saturating_sub(height.saturating_sub(HEADER_ROWS) as usize)
}

/// Week timeline widget
pub struct CalendarView<'a> {
    columns: &'a [DayColumn],
    scroll: usize,
    today: NaiveDate,
    theme: Theme,
}

impl<'a> CalendarView<'a> {
    pub fn new(columns: &'a [DayColumn], scroll: usize, today: NaiveDate, theme: Theme) -> Self {
        Self {
            columns,
            scroll,
            today,
            theme,
        }
    }

    fn render_heading(&self, area: Rect, buf: &mut Buffer) {
        let (Some(first), Some(last)) = (self.columns.first(), self.columns.last()) else {
            return;
        };
        let heading = format!("{} - {}", first.date.format("%Y-%m-%d"), last.date.format("%Y-%m-%d"));
        let x = area.x + (area.width.saturating_sub(heading.len() as u16)) / 2;
        buf.set_string(
            x,
            area.y,
            &heading,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );
    }

    fn render_day_headers(&self, area: Rect, buf: &mut Buffer, col_width: u16) {
        for (i, column) in self.columns.iter().enumerate() {
            let x = area.x + GUTTER_WIDTH + i as u16 * col_width;
            let mut header = format!("{} {:02}", column.date.format("%a"), column.date.day());
            if column.loader.is_fetching() {
                header.push('…');
            }
            let style = if column.date == self.today {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD)
            };
            let pad = (col_width.saturating_sub(header.chars().count() as u16)) / 2;
            buf.set_string(x + pad, area.y + 1, &header, style);
        }
    }
}

impl Widget for CalendarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width <= GUTTER_WIDTH || area.height <= HEADER_ROWS || self.columns.is_empty() {
            return;
        }

        let col_width = (area.width - GUTTER_WIDTH) / self.columns.len() as u16;
        if col_width < 3 {
            return;
        }

        self.render_heading(area, buf);
        self.render_day_headers(area, buf, col_width);

        let grid_top = area.y + HEADER_ROWS;
        let grid_height = (area.height - HEADER_ROWS) as usize;
        let scroll = self.scroll.min(max_scroll(area.height));

        // Hour gutter
        for view_row in 0..grid_height {
            let row = scroll + view_row;
            if row >= GRID_HEIGHT {
                break;
            }
            if let Some(hour) = super::column::hour_marker(row, GRID_HEIGHT) {
                buf.set_string(
                    area.x,
                    grid_top + view_row as u16,
                    format!("{:>2}", hour),
                    Style::default()
                        .fg(self.theme.date())
                        .add_modifier(Modifier::BOLD),
                );
            }
        }

        for (i, column) in self.columns.iter().enumerate() {
            let lines = render_lines(&column.ranges, GRID_HEIGHT);
            let x0 = area.x + GUTTER_WIDTH + i as u16 * col_width;
            // Text area after the glyph and label prefix cells
            let text_width = col_width.saturating_sub(2) as usize;

            for view_row in 0..grid_height {
                let row = scroll + view_row;
                if row >= GRID_HEIGHT {
                    break;
                }
                let line = &lines[row];
                let y = grid_top + view_row as u16;

                let mut glyph_style = Style::default().fg(line.color);
                if line.state.inverted() {
                    glyph_style = glyph_style.add_modifier(Modifier::REVERSED);
                }
                buf.set_string(x0, y, line.state.glyph().to_string(), glyph_style);

                let fill_style = if line.state == super::cell::CellState::Full {
                    Style::default().bg(line.color)
                } else {
                    Style::default()
                };

                match &line.label {
                    Some(label) => {
                        let prefix = if label.moved { '^' } else { '=' };
                        buf.set_string(
                            x0 + 1,
                            y,
                            prefix.to_string(),
                            Style::default().bg(label.color),
                        );
                        let mut text: String = label.text.chars().take(text_width).collect();
                        while text.chars().count() < text_width {
                            text.push(' ');
                        }
                        buf.set_string(x0 + 2, y, &text, fill_style.fg(self.theme.text()));
                    }
                    None => {
                        let filler = if line.hour.is_some() {
                            "─".repeat(col_width.saturating_sub(1) as usize)
                        } else {
                            " ".repeat(col_width.saturating_sub(1) as usize)
                        };
                        buf.set_string(
                            x0 + 1,
                            y,
                            &filler,
                            fill_style.fg(self.theme.muted()),
                        );
                    }
                }
            }
        }
    }
}
