//! Frame composition: chrome from the layout selector around a page body.

use crate::header;
use crate::layout::{resolve_layout, LayoutVariant};
use crate::sidebar;
use chrono::{DateTime, TimeZone};

const OPEN_SIDEBAR_WIDTH: usize = 52;
const COLLAPSED_SIDEBAR_WIDTH: usize = 8;

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

/// Render one full screen for `pathname`
pub fn frame<Tz: TimeZone>(
    pathname: &str,
    sidebar_open: bool,
    body: &[String],
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let layout = resolve_layout(pathname);
    let header_line = || {
        let view = header::header_view(pathname, &layout.page_config);
        header::render(&view, now)
    };

    let lines: Vec<String> = match layout.variant() {
        LayoutVariant::TwoPane => {
            let mut main = vec![header_line(), "─".repeat(40)];
            main.extend(body.iter().cloned());

            let side = sidebar::render(pathname, sidebar_open);
            let width = if sidebar_open {
                OPEN_SIDEBAR_WIDTH
            } else {
                COLLAPSED_SIDEBAR_WIDTH
            };
            let rows = side.len().max(main.len());
            (0..rows)
                .map(|i| {
                    let left = side.get(i).map(String::as_str).unwrap_or("");
                    let right = main.get(i).map(String::as_str).unwrap_or("");
                    format!("{}│ {}", pad(left, width), right)
                        .trim_end()
                        .to_string()
                })
                .collect()
        }
        LayoutVariant::HeaderOnly => {
            let mut lines = vec![header_line(), "─".repeat(40)];
            lines.extend(body.iter().cloned());
            lines
        }
        LayoutVariant::Bare => {
            let mut lines = vec!["· · · outsideplant. · · ·".to_string(), String::new()];
            lines.extend(body.iter().map(|l| format!("    {}", l)));
            lines
        }
    };

    lines.join("\n")
}
