use std::fmt::Display;

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;
use vscout_common::models::{ProbeOutcome, StatusClass};

use crate::terminal::{banner, colors, logging::PRINT_TARGET};

pub const TOTAL_WIDTH: usize = 64;

#[macro_export]
macro_rules! vprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub trait WithDefaultColor {
    fn with_default(self, default_color: Color) -> ColoredString;
}

impl WithDefaultColor for &str {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for String {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for ColoredString {
    fn with_default(self, _default_color: Color) -> ColoredString {
        self
    }
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

/// Title bar, random art and a preview of what is about to be scanned.
pub fn banner(no_banner: bool, q_level: u8, targets: &[String], vhosts: &[String]) {
    if no_banner || q_level > 0 {
        return;
    }

    let text_content: String = format!("⟦ VSCOUT v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2).bright_black();
    print(&format!("{}{}{}", sep, text, sep));

    banner::print_art();
    banner::print_preview("Targets", targets, "targets");
    banner::print_preview("Vhosts", vhosts, "vhosts");
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

pub fn aligned_line<V>(key: &str, value: V, key_width: usize)
where
    V: Display + WithDefaultColor,
{
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.len()));
    let colon: String = format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    let value: ColoredString = value.with_default(colors::TEXT_DEFAULT);
    print_status(format!("{}{} {}", key.color(colors::PRIMARY), colon, value));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    let output: String = format!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
    print(&output);
}

pub fn as_tree_one_level(lines: &[ColoredString]) {
    for (i, line) in lines.iter().enumerate() {
        let last: bool = i + 1 == lines.len();
        let branch: ColoredString = if !last {
            "├─".bright_black()
        } else {
            "└─".bright_black()
        };
        print(&format!(" {} {}", branch, line));
    }
}

pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Success => colors::STATUS_SUCCESS,
        StatusClass::Redirect => colors::STATUS_REDIRECT,
        StatusClass::Error => colors::STATUS_ERROR,
        StatusClass::Informational => colors::STATUS_OTHER,
    }
}

/// `[200] admin.example.com` with the status colored by class.
pub fn vhost_line(outcome: &ProbeOutcome) -> ColoredString {
    let status: ColoredString = outcome
        .status_code
        .to_string()
        .color(status_color(outcome.status_class()))
        .bold();
    format!(
        "{}{}{} {} {}",
        "[".color(colors::SEPARATOR),
        status,
        "]".color(colors::SEPARATOR),
        outcome.vhost.color(colors::SECONDARY),
        outcome.spoofed_fingerprint.to_string().color(colors::FINGERPRINT)
    )
    .normal()
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

const NO_RESULTS_0: &str = r#"
         _   _  ___   __     ___   _  ___  ____ _____ ____
        | \ | |/ _ \  \ \   / / | | |/ _ \/ ___|_   _/ ___|
        |  \| | | | |  \ \ / /| |_| | | | \___ \ | | \___ \
        | |\  | |_| |   \ V / |  _  | |_| |___) || |  ___) |
        |_| \_|\___/     \_/  |_| |_|\___/|____/ |_| |____/
"#;

pub fn no_results() {
    print(&format!("{}", NO_RESULTS_0.red().bold()));
}

pub fn end_of_program() {
    print(&format!(
        "{}",
        "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)
    ));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
