//! Header bar.
//!
//! The header has its own per-path icon/title overrides applied on top of
//! the page config, and shows the clock on the five module pages even when
//! the page config leaves it off.

use crate::layout::{Icon, PageConfig};
use chrono::{DateTime, TimeZone};

/// Module pages that always show the clock
const CLOCK_ROUTES: &[&str] = &[
    "/dashboard",
    "/field-operations-tracking",
    "/photo-based-reporting",
    "/smart-cluster-security",
    "/integrated-payments",
];

/// What the header actually displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub icon: Option<Icon>,
    pub title: String,
    pub show_search: bool,
    pub show_date_time: bool,
    pub show_back_button: bool,
}

pub fn header_view(pathname: &str, config: &PageConfig) -> HeaderView {
    let (icon, title) = match pathname {
        "/dashboard" => (Some(Icon::Home), "Dashboard"),
        "/field-operations-tracking" => (Some(Icon::MapPin), "Field Operations Tracking"),
        "/photo-based-reporting" => (Some(Icon::Camera), "Photo-based Reporting"),
        "/smart-cluster-security" => (Some(Icon::Lock), "Smart Cluster Security"),
        "/integrated-payments" => (Some(Icon::CreditCard), "Integrated Payments"),
        "/profile" | "/edit-profile" => (Some(Icon::User), config.title),
        "/change-password" => (Some(Icon::Lock), config.title),
        _ => (None, config.title),
    };

    HeaderView {
        icon,
        title: title.to_string(),
        // The search box is part of every header
        show_search: true,
        show_date_time: config.show_date_time || CLOCK_ROUTES.contains(&pathname),
        show_back_button: config.show_back_button,
    }
}

/// e.g. "Friday, October 16, 2026"
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %-d, %Y").to_string()
}

/// e.g. "03:04 PM"
pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%I:%M %p").to_string()
}

pub fn render<Tz: TimeZone>(view: &HeaderView, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut left = String::new();
    if view.show_back_button {
        left.push_str("‹ ");
    }
    if let Some(icon) = view.icon {
        left.push_str(icon.glyph());
        left.push(' ');
    }
    left.push_str(&view.title);

    let mut right = Vec::new();
    if view.show_search {
        right.push("[ Search here ]".to_string());
    }
    if view.show_date_time {
        right.push(format!("({})", format_date(now)));
        right.push(format!("({})", format_time(now)));
    }
    right.push("🔔".to_string());

    format!("{}  |  {}", left, right.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::page_config;
    use chrono::Utc;

    #[test]
    fn test_module_titles_override_page_config() {
        let view = header_view(
            "/photo-based-reporting",
            &page_config("/photo-based-reporting"),
        );
        assert_eq!(view.title, "Photo-based Reporting");
        assert_eq!(view.icon, Some(Icon::Camera));
        assert!(view.show_date_time);
    }

    #[test]
    fn test_profile_pages_use_config_title() {
        let view = header_view("/edit-profile", &page_config("/edit-profile"));
        assert_eq!(view.title, "Edit Profile");
        assert_eq!(view.icon, Some(Icon::User));
        assert!(view.show_back_button);

        let view = header_view("/change-password", &page_config("/change-password"));
        assert_eq!(view.title, "Change Password");
        assert_eq!(view.icon, Some(Icon::Lock));
    }

    #[test]
    fn test_unknown_path_has_no_icon() {
        let view = header_view("/photo-reports", &page_config("/photo-reports"));
        assert_eq!(view.icon, None);
        assert_eq!(view.title, "Photo-Based Reporting");

        let view = header_view("/elsewhere", &PageConfig::default());
        assert_eq!(view.title, "App");
        assert!(!view.show_date_time);
        assert!(view.show_search);
    }

    #[test]
    fn test_date_time_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 15, 4, 0).unwrap();
        assert_eq!(format_date(&now), "Friday, October 16, 2026");
        assert_eq!(format_time(&now), "03:04 PM");
    }

    #[test]
    fn test_render_line() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let view = header_view("/dashboard", &page_config("/dashboard"));
        let line = render(&view, &now);
        assert!(line.starts_with("⌂ Dashboard"));
        assert!(line.contains("Search here"));
        assert!(line.contains("09:30 AM"));
    }
}
