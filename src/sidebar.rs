//! Sidebar navigation.

use crate::layout::Icon;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub icon: Icon,
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        path: "/dashboard",
        icon: Icon::Home,
        title: "Dashboard",
        subtitle: "overview and summary",
    },
    NavItem {
        path: "/field-operations-tracking",
        icon: Icon::MapPin,
        title: "Field Operation Tracking",
        subtitle: "real-time technician tracking",
    },
    NavItem {
        path: "/photo-based-reporting",
        icon: Icon::Camera,
        title: "Photo-Based Reporting",
        subtitle: "auto photo checks & reports",
    },
    NavItem {
        path: "/smart-cluster-security",
        icon: Icon::Lock,
        title: "Smart Cluster Security",
        subtitle: "face ID, gate control, alerts",
    },
    NavItem {
        path: "/integrated-payments",
        icon: Icon::CreditCard,
        title: "Integrated Payments",
        subtitle: "fast, unified payments",
    },
];

/// Render the sidebar as lines. Open shows labels, collapsed shows glyphs.
pub fn render(pathname: &str, open: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(NAV_ITEMS.len() + 1);
    lines.push(if open {
        "outsideplant.  [«]".to_string()
    } else {
        "op [»]".to_string()
    });

    for item in NAV_ITEMS {
        let marker = if item.path == pathname { "▌" } else { " " };
        if open {
            lines.push(format!(
                "{}{} {} - {}",
                marker,
                item.icon.glyph(),
                item.title,
                item.subtitle
            ));
        } else {
            lines.push(format!("{}{}", marker, item.icon.glyph()));
        }
    }
    lines
}
