//! Loading spinner widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// App branding
const APP_NAME: &str = "timegrid";
const TAGLINE: &str = "Work-log calendar for your terminal";

/// Loading spinner widget, shown until the first pages arrive
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }
}

impl Widget for Spinner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 5 || area.width < 35 {
            return;
        }

        let center_y = area.y + area.height / 2;

        let name_y = center_y.saturating_sub(2);
        let name_x = area.x + (area.width.saturating_sub(APP_NAME.len() as u16)) / 2;
        buf.set_string(
            name_x,
            name_y,
            APP_NAME,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        let tag_y = name_y + 1;
        let tag_x = area.x + (area.width.saturating_sub(TAGLINE.len() as u16)) / 2;
        buf.set_string(tag_x, tag_y, TAGLINE, Style::default().fg(Color::DarkGray));

        let spinner_text = format!("{} Loading logs...", self.current_char());
        let spinner_y = tag_y + 2;
        let spinner_x = area.x + (area.width.saturating_sub(spinner_text.len() as u16)) / 2;
        buf.set_string(
            spinner_x,
            spinner_y,
            &spinner_text,
            Style::default().fg(Color::Cyan),
        );
    }
}
