//! Application state and event loop
//!
//! The event-loop thread owns every piece of mutable view state. Fetches
//! run on background threads and hand their result back over an mpsc
//! channel together with the offset they were launched for; the owning
//! loader decides on arrival whether the result is still current.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{Local, Months, NaiveDate, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Widget,
    DefaultTerminal, Frame,
};

use super::theme::Theme;
use super::widgets::{
    calendar::{self, CalendarView, WEEK_DAYS},
    column::{DayColumn, GRID_HEIGHT},
    help::HelpPopup,
    log_list::{FeedKind, LogListData, LogListView},
    spinner::Spinner,
    tabs::{Tab, TabBar},
};
use crate::services::{ApiClient, Delivery, FetchTicket};
use crate::types::{LogEntry, LogQuery, Result};

/// Which consumer a fetch result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    /// Day column by index into the visible week
    Day(usize),
    /// One of the Logs tab feeds
    Feed(FeedKind),
}

/// A completed background fetch, delivered on the event-loop thread
pub struct FetchDone {
    target: FetchTarget,
    offset: usize,
    result: Result<Vec<LogEntry>>,
}

/// Main application
pub struct App {
    client: ApiClient,
    tx: mpsc::Sender<FetchDone>,
    theme: Theme,
    current_tab: Tab,
    should_quit: bool,
    show_help: bool,
    spinner_frame: usize,
    /// True once any page has been accepted; gates the splash spinner
    loaded: bool,
    /// Last fetch failure, shown on the status line until the next reload
    status: Option<String>,

    list: LogListData,
    list_scroll: usize,

    columns: Vec<DayColumn>,
    week_start: NaiveDate,
    calendar_scroll: usize,

    /// Content viewport height from the last draw, for scroll clamping
    /// and the load-more edge check
    content_height: u16,
}

impl App {
    pub fn new(client: ApiClient, tx: mpsc::Sender<FetchDone>, theme: Theme, week: NaiveDate) -> Self {
        let week_start = calendar::week_start(week);
        let columns = (0..WEEK_DAYS)
            .map(|i| DayColumn::new(week_start + chrono::Duration::days(i as i64)))
            .collect();
        Self {
            client,
            tx,
            theme,
            current_tab: Tab::default(),
            should_quit: false,
            show_help: false,
            spinner_frame: 0,
            loaded: false,
            status: None,
            list: LogListData::new(),
            list_scroll: 0,
            columns,
            week_start,
            // Open the viewport at working hours rather than midnight
            calendar_scroll: GRID_HEIGHT / 4,
            content_height: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Reset every feed and column and start fresh fetches. In-flight
    /// results become stale and will be discarded on arrival.
    pub fn reload_all(&mut self) {
        self.status = None;
        self.list.reload_all();
        for column in &mut self.columns {
            column.clear();
        }
        for kind in FeedKind::all() {
            self.kick_feed(kind);
        }
        for i in 0..self.columns.len() {
            self.kick_day(i);
        }
    }

    /// Point the calendar at a new week and refill its columns
    fn set_week(&mut self, week: NaiveDate) {
        let week_start = calendar::week_start(week);
        if week_start == self.week_start {
            return;
        }
        self.week_start = week_start;
        for (i, column) in self.columns.iter_mut().enumerate() {
            column.set_date(week_start + chrono::Duration::days(i as i64));
        }
        for i in 0..self.columns.len() {
            self.kick_day(i);
        }
    }

    fn shift_week(&mut self, weeks: i64) {
        self.set_week(self.week_start + chrono::Duration::days(7 * weeks));
    }

    fn shift_month(&mut self, forward: bool) {
        let shifted = if forward {
            self.week_start.checked_add_months(Months::new(1))
        } else {
            self.week_start.checked_sub_months(Months::new(1))
        };
        if let Some(date) = shifted {
            self.set_week(date);
        }
    }

    /// Start a fetch for a day column if its loader is idle
    fn kick_day(&mut self, index: usize) {
        let Some(ticket) = self.columns.get_mut(index).and_then(|c| c.loader.request()) else {
            return;
        };
        self.spawn_fetch(FetchTarget::Day(index), ticket);
    }

    /// Start a fetch for a list feed if its loader is idle
    fn kick_feed(&mut self, kind: FeedKind) {
        let Some(ticket) = self.list.feed_mut(kind).loader.request() else {
            return;
        };
        self.spawn_fetch(FetchTarget::Feed(kind), ticket);
    }

    /// Run the fetch on a background thread. The thread only computes a
    /// result and sends it back; all state mutation happens on delivery.
    fn spawn_fetch(&self, target: FetchTarget, ticket: FetchTicket) {
        let query = match target {
            FetchTarget::Day(index) => {
                let Some(column) = self.columns.get(index) else {
                    return;
                };
                let (since, until) = column.window();
                let mut query = LogQuery::page(ticket.offset, ticket.limit);
                query.since = Some(since);
                query.until = Some(until);
                Some(query)
            }
            FetchTarget::Feed(kind) => kind.query(ticket.offset, ticket.limit),
        };

        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = match query {
                Some(query) => client.list_logs(&query),
                // Active feed: the dedicated endpoint returns at most one log
                None => client.active_log().map(|log| log.into_iter().collect()),
            };
            let _ = tx.send(FetchDone {
                target,
                offset: ticket.offset,
                result,
            });
        });
    }

    /// Deliver a completed fetch to its loader. Stale results are
    /// discarded; failures keep last-known-good data and surface on the
    /// status line.
    fn handle_fetch(&mut self, done: FetchDone) {
        match done.target {
            FetchTarget::Day(index) => {
                let Some(column) = self.columns.get_mut(index) else {
                    return;
                };
                match done.result {
                    Ok(page) => {
                        if let Delivery::Append { .. } =
                            column.loader.accept_page(done.offset, page.len())
                        {
                            column.ingest(&page, Utc::now());
                            self.loaded = true;
                            // Drain the day's remaining pages
                            if !self.columns[index].loader.reached_end() {
                                self.kick_day(index);
                            }
                        }
                    }
                    Err(e) => {
                        if column.loader.fetch_failed(done.offset) {
                            self.status = Some(format!("calendar fetch failed: {}", e));
                        }
                    }
                }
            }
            FetchTarget::Feed(kind) => {
                let feed = self.list.feed_mut(kind);
                match done.result {
                    Ok(page) => {
                        if feed.accept(done.offset, page) {
                            self.loaded = true;
                        }
                    }
                    Err(e) => {
                        if feed.loader.fetch_failed(done.offset) {
                            self.status = Some(format!("log fetch failed: {}", e));
                        }
                    }
                }
            }
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Tab => {
                        self.current_tab = self.current_tab.next();
                    }
                    KeyCode::BackTab => {
                        self.current_tab = self.current_tab.prev();
                    }
                    KeyCode::Char(c @ '1'..='2') => {
                        if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                            self.current_tab = tab;
                        }
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.scroll_up();
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.scroll_down();
                    }
                    KeyCode::Left | KeyCode::Char('h') if self.current_tab == Tab::Calendar => {
                        self.shift_week(-1);
                    }
                    KeyCode::Right | KeyCode::Char('l') if self.current_tab == Tab::Calendar => {
                        self.shift_week(1);
                    }
                    KeyCode::Char('[') if self.current_tab == Tab::Calendar => {
                        self.shift_month(false);
                    }
                    KeyCode::Char(']') if self.current_tab == Tab::Calendar => {
                        self.shift_month(true);
                    }
                    KeyCode::Char('t') if self.current_tab == Tab::Calendar => {
                        self.set_week(Local::now().date_naive());
                    }
                    KeyCode::Char('r') => {
                        self.reload_all();
                    }
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    _ => {}
                }
            }
        }
    }

    fn scroll_up(&mut self) {
        match self.current_tab {
            Tab::Logs => self.list_scroll = self.list_scroll.saturating_sub(1),
            Tab::Calendar => self.calendar_scroll = self.calendar_scroll.saturating_sub(1),
        }
    }

    fn scroll_down(&mut self) {
        match self.current_tab {
            Tab::Logs => {
                let max = self.list.max_scroll(self.content_height as usize);
                self.list_scroll = (self.list_scroll + 1).min(max);
                if self
                    .list
                    .near_bottom(self.list_scroll, self.content_height as usize)
                {
                    self.kick_feed(FeedKind::Stopped);
                }
            }
            Tab::Calendar => {
                let max = calendar::max_scroll(self.content_height);
                self.calendar_scroll = (self.calendar_scroll + 1).min(max);
            }
        }
    }

    fn anything_fetching(&self) -> bool {
        FeedKind::all()
            .iter()
            .any(|&k| self.list.feed(k).loader.is_fetching())
            || self.columns.iter().any(|c| c.loader.is_fetching())
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if !self.loaded {
            self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        }
    }

    /// Draw the application, clamping scroll offsets to the current
    /// viewport first
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.content_height = area.height.saturating_sub(2);
        self.list_scroll = self
            .list_scroll
            .min(self.list.max_scroll(self.content_height as usize));
        self.calendar_scroll = self
            .calendar_scroll
            .min(calendar::max_scroll(self.content_height));
        frame.render_widget(&*self, area);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [tabs_area, content, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        TabBar::new(self.current_tab, self.theme).render(tabs_area, buf);

        match self.current_tab {
            Tab::Logs => {
                if !self.loaded && self.anything_fetching() {
                    Spinner::new(self.spinner_frame).render(content, buf);
                } else {
                    LogListView::new(&self.list, self.list_scroll, Utc::now(), self.theme)
                        .render(content, buf);
                }
            }
            Tab::Calendar => {
                CalendarView::new(
                    &self.columns,
                    self.calendar_scroll,
                    Local::now().date_naive(),
                    self.theme,
                )
                .render(content, buf);
            }
        }

        if self.show_help {
            HelpPopup::new(self.theme).render(HelpPopup::centered_area(area), buf);
        }

        match &self.status {
            Some(message) => {
                buf.set_stringn(
                    status_area.x,
                    status_area.y,
                    message,
                    status_area.width as usize,
                    Style::default().fg(self.theme.error()),
                );
            }
            None => {
                buf.set_stringn(
                    status_area.x,
                    status_area.y,
                    " ? help   r reload   q quit",
                    status_area.width as usize,
                    Style::default().fg(self.theme.muted()),
                );
            }
        }
    }
}

/// Run the TUI application
pub fn run(server: &str, week: Option<NaiveDate>) -> anyhow::Result<()> {
    let client = ApiClient::new(server)?;
    // Theme detection talks to the terminal; do it before raw mode
    let theme = Theme::detect();
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, client, theme, week);
    ratatui::restore();
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    client: ApiClient,
    theme: Theme,
    week: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let week = week.unwrap_or_else(|| Local::now().date_naive());
    let mut app = App::new(client, tx, theme, week);
    app.reload_all();

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Deliver completed fetches (non-blocking)
        while let Ok(done) = rx.try_recv() {
            app.handle_fetch(done);
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}
