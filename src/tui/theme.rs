//! Terminal theme detection and color definitions

use ratatui::style::Color;

/// Neutral color used when a cell mixes differently-colored ranges
/// and for empty cells
pub const RANGE_FALLBACK: Color = Color::Indexed(238);

/// Dark background palette for log ranges; one entry is picked per
/// label so a log keeps its color across cells and days
const RANGE_PALETTE: [Color; 6] = [
    Color::Rgb(0, 45, 112),
    Color::Rgb(22, 90, 90),
    Color::Rgb(0, 97, 60),
    Color::Rgb(72, 72, 0),
    Color::Rgb(97, 19, 0),
    Color::Rgb(56, 0, 112),
];

/// Stable palette color for a range label. FNV-1a so the assignment
/// survives restarts, unlike the default hasher.
pub fn label_color(label: &str) -> Color {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in label.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    RANGE_PALETTE[(hash % RANGE_PALETTE.len() as u64) as usize]
}

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected tab, keybinding keys, active log)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, inactive tabs, hour rules)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Date headings
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(250),
            Self::Light => Color::Indexed(240),
        }
    }

    /// Error text (status line)
    pub fn error(self) -> Color {
        Color::Red
    }
}
