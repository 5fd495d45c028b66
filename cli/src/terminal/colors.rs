use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const SECONDARY: Color = Color::Cyan;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const FINGERPRINT: Color = Color::BrightBlack;

// Status classes
pub const STATUS_SUCCESS: Color = Color::Green;
pub const STATUS_REDIRECT: Color = Color::Yellow;
pub const STATUS_ERROR: Color = Color::Red;
pub const STATUS_OTHER: Color = Color::BrightBlack;
