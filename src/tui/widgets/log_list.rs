//! Log list feeds and the scrolling list view
//!
//! Three feeds back the Logs tab: the active log, running logs, stopped
//! logs. The stopped feed is the only one that keeps paginating; scrolling
//! within `LOAD_MARGIN` rows of the bottom asks it for another page.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::range_bar::render_bar;
use crate::services::{Delivery, PageLoader};
use crate::tui::theme::Theme;
use crate::types::{LogEntry, LogQuery};

/// Page size for list fetches
pub const LIST_PAGE_LIMIT: usize = 20;

/// Rows from the bottom at which the next page is requested
pub const LOAD_MARGIN: usize = 5;

/// Rows one log entry occupies in the list
const ENTRY_ROWS: usize = 4;

/// Rows a feed heading occupies (title + underline)
const HEADING_ROWS: usize = 2;

/// Rows shown for a feed with no entries
const PLACEHOLDER_ROWS: usize = 2;

/// The three feeds of the Logs tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Active,
    Running,
    Stopped,
}

impl FeedKind {
    pub fn all() -> [Self; 3] {
        [Self::Active, Self::Running, Self::Stopped]
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Active => "Active log",
            Self::Running => "Running logs",
            Self::Stopped => "Stopped logs",
        }
    }

    /// Page query for this feed. The active feed has no list query; it
    /// is served by the dedicated active-log endpoint.
    pub fn query(self, offset: usize, limit: usize) -> Option<LogQuery> {
        let stopped = match self {
            Self::Active => return None,
            Self::Running => false,
            Self::Stopped => true,
        };
        let mut query = LogQuery::page(offset, limit);
        query.stopped = Some(stopped);
        Some(query)
    }
}

/// One feed's entries plus its pagination cursor
#[derive(Debug, Clone)]
pub struct LogFeed {
    pub kind: FeedKind,
    pub entries: Vec<LogEntry>,
    pub loader: PageLoader,
}

impl LogFeed {
    pub fn new(kind: FeedKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            loader: PageLoader::new(LIST_PAGE_LIMIT),
        }
    }

    /// Drop entries and start pagination over. An in-flight fetch
    /// becomes stale.
    pub fn reload(&mut self) {
        self.entries.clear();
        self.loader.reset();
    }

    /// Deliver a fetched page. Returns false when the page was stale
    /// and discarded.
    pub fn accept(&mut self, ticket_offset: usize, page: Vec<LogEntry>) -> bool {
        match self.loader.accept_page(ticket_offset, page.len()) {
            Delivery::Append { at } => {
                self.entries.truncate(at);
                self.entries.extend(page);
                true
            }
            Delivery::Stale => false,
        }
    }
}

/// State of the Logs tab: the three feeds
#[derive(Debug, Clone)]
pub struct LogListData {
    pub active: LogFeed,
    pub running: LogFeed,
    pub stopped: LogFeed,
}

impl LogListData {
    pub fn new() -> Self {
        Self {
            active: LogFeed::new(FeedKind::Active),
            running: LogFeed::new(FeedKind::Running),
            stopped: LogFeed::new(FeedKind::Stopped),
        }
    }

    pub fn feed(&self, kind: FeedKind) -> &LogFeed {
        match kind {
            FeedKind::Active => &self.active,
            FeedKind::Running => &self.running,
            FeedKind::Stopped => &self.stopped,
        }
    }

    pub fn feed_mut(&mut self, kind: FeedKind) -> &mut LogFeed {
        match kind {
            FeedKind::Active => &mut self.active,
            FeedKind::Running => &mut self.running,
            FeedKind::Stopped => &mut self.stopped,
        }
    }

    pub fn reload_all(&mut self) {
        self.active.reload();
        self.running.reload();
        self.stopped.reload();
    }

    fn feed_rows(feed: &LogFeed) -> usize {
        let body = if feed.entries.is_empty() {
            PLACEHOLDER_ROWS
        } else {
            feed.entries.len() * ENTRY_ROWS
        };
        HEADING_ROWS + body
    }

    /// Total virtual rows of the rendered list
    pub fn total_rows(&self) -> usize {
        FeedKind::all()
            .iter()
            .map(|&k| Self::feed_rows(self.feed(k)))
            .sum()
    }

    /// Largest useful scroll offset for a viewport of `height` rows
    pub fn max_scroll(&self, height: usize) -> usize {
        self.total_rows().saturating_sub(height)
    }

    /// Whether the scroll position sits within the load margin of the
    /// bottom, meaning the stopped feed should fetch its next page
    pub fn near_bottom(&self, scroll: usize, height: usize) -> bool {
        scroll + height + LOAD_MARGIN >= self.total_rows()
    }
}

impl Default for LogListData {
    fn default() -> Self {
        Self::new()
    }
}

/// Scrolling list over all three feeds
pub struct LogListView<'a> {
    data: &'a LogListData,
    scroll: usize,
    now: DateTime<Utc>,
    theme: Theme,
}

impl<'a> LogListView<'a> {
    pub fn new(data: &'a LogListData, scroll: usize, now: DateTime<Utc>, theme: Theme) -> Self {
        Self {
            data,
            scroll,
            now,
            theme,
        }
    }

    fn entry_lines(&self, log: &LogEntry, width: usize) -> Vec<Line<'static>> {
        let mut head = vec![Span::styled(
            format!("#{} ", log.id),
            Style::default().fg(self.theme.muted()),
        )];
        let name_style = if log.is_active() {
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD)
        };
        head.push(Span::styled(log.name.clone(), name_style));
        if let Some(category) = &log.category {
            head.push(Span::styled(
                format!(" [{}]", category.name),
                Style::default().fg(self.theme.accent()),
            ));
        }
        if let Some(task) = &log.task {
            head.push(Span::styled(
                format!(" ({})", task.name),
                Style::default().fg(self.theme.date()),
            ));
        }
        if !log.flags.is_empty() {
            head.push(Span::styled(
                format!(" {{{}}}", log.flags.join(",")),
                Style::default().fg(self.theme.muted()),
            ));
        }
        if let Some(desc) = log.description.as_deref() {
            if !desc.is_empty() {
                head.push(Span::styled(
                    format!(" - {}", desc),
                    Style::default().fg(self.theme.muted()),
                ));
            }
        }

        let times = match log.span(self.now) {
            Some((start, end)) => {
                let start_local = start.with_timezone(&Local);
                let end_local = end.with_timezone(&Local);
                let duration = log.total_duration(self.now);
                let minutes = duration.num_minutes();
                format!(
                    "  {} {} - {}  ({}h{:02}m)",
                    start_local.format("%Y-%m-%d"),
                    start_local.format("%H:%M"),
                    end_local.format("%H:%M"),
                    minutes / 60,
                    minutes % 60,
                )
            }
            None => "  No records".to_string(),
        };

        let bar_width = width.saturating_sub(2);
        let mut bar_spans = vec![Span::raw("  ")];
        for (glyph, highlighted) in render_bar(&log.activity_ranges(self.now), bar_width) {
            let style = if highlighted {
                Style::default().fg(self.theme.accent())
            } else {
                Style::default().fg(self.theme.muted())
            };
            bar_spans.push(Span::styled(glyph.to_string(), style));
        }

        vec![
            Line::from(head),
            Line::from(Span::styled(times, Style::default().fg(self.theme.date()))),
            Line::from(bar_spans),
            Line::default(),
        ]
    }

    /// All virtual lines of the list; the render pass shows a window of
    /// them
    fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for kind in FeedKind::all() {
            let feed = self.data.feed(kind);
            lines.push(Line::from(Span::styled(
                kind.title().to_string(),
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                "─".repeat(width),
                Style::default().fg(self.theme.muted()),
            )));
            if feed.entries.is_empty() {
                let placeholder = if feed.loader.is_fetching() {
                    "  loading..."
                } else {
                    "  No logs"
                };
                lines.push(Line::from(Span::styled(
                    placeholder.to_string(),
                    Style::default().fg(self.theme.muted()),
                )));
                lines.push(Line::default());
            } else {
                for log in &feed.entries {
                    lines.extend(self.entry_lines(log, width));
                }
            }
        }
        lines
    }
}

impl Widget for LogListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let lines = self.lines(area.width as usize);
        for (row, line) in lines
            .iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .enumerate()
        {
            buf.set_line(area.x, area.y + row as u16, line, area.width);
        }
    }
}
