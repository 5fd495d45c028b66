use colored::*;

use crate::terminal::{colors, print};

/// Entries shown per list before the rest is summarized.
pub const PREVIEW_LIMIT: usize = 10;

const BANNER_0: &str = r#"
                                      _
        __   _____  ___ ___  _   _| |_
        \ \ / / __|/ __/ _ \| | | | __|
         \ V /\__ \ (_| (_) | |_| | |_
          \_/ |___/\___\___/ \__,_|\__|
"#;

const BANNER_1: &str = r#"
   ██╗   ██╗███████╗ ██████╗ ██████╗ ██╗   ██╗████████╗
   ██║   ██║██╔════╝██╔════╝██╔═══██╗██║   ██║╚══██╔══╝
   ██║   ██║███████╗██║     ██║   ██║██║   ██║   ██║
   ╚██╗ ██╔╝╚════██║██║     ██║   ██║██║   ██║   ██║
    ╚████╔╝ ███████║╚██████╗╚██████╔╝╚██████╔╝   ██║
     ╚═══╝  ╚══════╝ ╚═════╝ ╚═════╝  ╚═════╝    ╚═╝
"#;

const BANNER_2: &str = r#"
          .-"""-.
         /  .-.  \        GET / HTTP/1.1
        |  (   )  |       Host: ????????.com
         \  '-'  /        Host: admin.????
          '-...-'\\       Host: staging.????
                  \\
                   \\     v s c o u t
"#;

pub fn print_art() {
    let id: u8 = rand::random_range(0..=2);
    let art = match id {
        0 => BANNER_0.green(),
        1 => BANNER_1.truecolor(255, 165, 0),
        _ => BANNER_2.blue(),
    };
    print::print(&format!("{art}"));
}

/// Prints the start of `items`, summarizing anything past [`PREVIEW_LIMIT`].
pub fn print_preview(title: &str, items: &[String], noun: &str) {
    print::print_status(format!(
        "{} {}",
        title.color(colors::PRIMARY),
        format!("({})", items.len()).color(colors::SEPARATOR)
    ));
    for line in preview_lines(items, noun) {
        print::print(&format!("    {}", line.color(colors::TEXT_DEFAULT)));
    }
}

pub fn preview_lines(items: &[String], noun: &str) -> Vec<String> {
    let mut lines: Vec<String> = items.iter().take(PREVIEW_LIMIT).cloned().collect();
    if items.len() > PREVIEW_LIMIT {
        lines.push(format!("... {} more {noun}", items.len() - PREVIEW_LIMIT));
    }
    lines
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
