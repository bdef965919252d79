//! Layout selection: which chrome wraps the page at a given path.
//!
//! Three tables drive this and they are deliberately kept apart: the header
//! route list, the sidebar route list and the page-config table. They do not
//! agree with each other (`/photo-reports` has a page config but no chrome,
//! `/photo-based-reporting` has chrome but falls back to the default config)
//! and the titles users see depend on that, so none is derived from another.

/// Symbolic display glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Home,
    MapPin,
    Camera,
    Lock,
    CreditCard,
    User,
}

impl Icon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Home => "⌂",
            Icon::MapPin => "⌖",
            Icon::Camera => "◉",
            Icon::Lock => "⚿",
            Icon::CreditCard => "▭",
            Icon::User => "☺",
        }
    }
}

/// Action wired to the header back button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// Step back one entry in navigation history
    HistoryBack,
}

/// Header configuration for a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub title: &'static str,
    pub icon: Icon,
    pub show_search: bool,
    pub show_date_time: bool,
    pub show_back_button: bool,
    pub on_back_click: Option<BackAction>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "App",
            icon: Icon::User,
            show_search: false,
            show_date_time: false,
            show_back_button: false,
            on_back_click: None,
        }
    }
}

/// Paths that get a header
pub const HEADER_ROUTES: &[&str] = &[
    "/profile",
    "/dashboard",
    "/field-operations-tracking",
    "/photo-based-reporting",
    "/integrated-payments",
    "/smart-cluster-security",
    "/edit-profile",
    "/change-password",
];

/// Paths that get a sidebar
pub const SIDEBAR_ROUTES: &[&str] = &[
    "/dashboard",
    "/field-operations-tracking",
    "/photo-based-reporting",
    "/integrated-payments",
    "/smart-cluster-security",
    "/profile",
    "/edit-profile",
    "/change-password",
];

/// Exact-match page-config table; anything else gets the default
pub fn page_config(pathname: &str) -> PageConfig {
    match pathname {
        "/dashboard" => PageConfig {
            title: "Dashboard",
            icon: Icon::Home,
            show_search: true,
            show_date_time: true,
            show_back_button: false,
            on_back_click: None,
        },
        "/profile" => PageConfig {
            title: "Profile",
            icon: Icon::User,
            show_search: true,
            show_date_time: true,
            show_back_button: false,
            on_back_click: None,
        },
        "/photo-reports" => PageConfig {
            title: "Photo-Based Reporting",
            icon: Icon::User,
            show_search: true,
            show_date_time: true,
            show_back_button: false,
            on_back_click: None,
        },
        "/edit-profile" => PageConfig {
            title: "Edit Profile",
            icon: Icon::User,
            show_search: false,
            show_date_time: true,
            show_back_button: true,
            on_back_click: Some(BackAction::HistoryBack),
        },
        "/change-password" => PageConfig {
            title: "Change Password",
            icon: Icon::User,
            show_search: false,
            show_date_time: true,
            show_back_button: true,
            on_back_click: Some(BackAction::HistoryBack),
        },
        _ => PageConfig::default(),
    }
}

/// How the chrome is arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutVariant {
    /// Collapsible sidebar beside a column of header + page
    TwoPane,
    /// Full-width header above the page
    HeaderOnly,
    /// Page alone on the decorative background
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub show_header: bool,
    pub show_sidebar: bool,
    pub page_config: PageConfig,
}

impl Layout {
    /// A sidebar without a header is not a layout; it renders bare.
    pub fn variant(&self) -> LayoutVariant {
        match (self.show_sidebar, self.show_header) {
            (true, true) => LayoutVariant::TwoPane,
            (false, true) => LayoutVariant::HeaderOnly,
            _ => LayoutVariant::Bare,
        }
    }
}

/// Resolve the chrome for a pathname (query string already stripped)
pub fn resolve_layout(pathname: &str) -> Layout {
    Layout {
        show_header: HEADER_ROUTES.contains(&pathname),
        show_sidebar: SIDEBAR_ROUTES.contains(&pathname),
        page_config: page_config(pathname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_layout() {
        let layout = resolve_layout("/dashboard");
        assert!(layout.show_header);
        assert!(layout.show_sidebar);
        assert_eq!(layout.variant(), LayoutVariant::TwoPane);
        assert_eq!(layout.page_config.title, "Dashboard");
        assert_eq!(layout.page_config.icon, Icon::Home);
        assert!(!layout.page_config.show_back_button);
    }

    #[test]
    fn test_auth_pages_are_bare() {
        for path in ["/", "/register", "/forgot-password"] {
            let layout = resolve_layout(path);
            assert!(!layout.show_header, "{}", path);
            assert!(!layout.show_sidebar, "{}", path);
            assert_eq!(layout.variant(), LayoutVariant::Bare);
        }
    }

    #[test]
    fn test_exact_membership_only() {
        assert!(!resolve_layout("/dashboard/").show_header);
        assert!(!resolve_layout("/profile?x=1").show_header);
        assert!(!resolve_layout("/DASHBOARD").show_sidebar);
    }

    #[test]
    fn test_module_pages_without_config_fall_back() {
        for path in [
            "/field-operations-tracking",
            "/integrated-payments",
            "/smart-cluster-security",
        ] {
            let layout = resolve_layout(path);
            assert_eq!(layout.variant(), LayoutVariant::TwoPane);
            assert_eq!(layout.page_config, PageConfig::default());
        }
        assert_eq!(resolve_layout("/nowhere").page_config.title, "App");
    }

    #[test]
    fn test_tables_diverge_on_photo_reporting() {
        let reports = resolve_layout("/photo-reports");
        assert!(!reports.show_header && !reports.show_sidebar);
        assert_eq!(reports.page_config.title, "Photo-Based Reporting");

        let reporting = resolve_layout("/photo-based-reporting");
        assert!(reporting.show_header && reporting.show_sidebar);
        assert_eq!(reporting.page_config.title, "App");
    }

    #[test]
    fn test_back_button_pages() {
        for (path, title) in [
            ("/edit-profile", "Edit Profile"),
            ("/change-password", "Change Password"),
        ] {
            let cfg = page_config(path);
            assert_eq!(cfg.title, title);
            assert!(cfg.show_back_button);
            assert!(!cfg.show_search);
            assert_eq!(cfg.on_back_click, Some(BackAction::HistoryBack));
        }

        let profile = page_config("/profile");
        assert!(profile.show_search && profile.show_date_time);
        assert!(profile.on_back_click.is_none());
    }

    #[test]
    fn test_header_only_variant() {
        let layout = Layout {
            show_header: true,
            show_sidebar: false,
            page_config: PageConfig::default(),
        };
        assert_eq!(layout.variant(), LayoutVariant::HeaderOnly);

        let sidebar_only = Layout {
            show_header: false,
            show_sidebar: true,
            page_config: PageConfig::default(),
        };
        assert_eq!(sidebar_only.variant(), LayoutVariant::Bare);
    }

    #[test]
    fn test_lists_are_independent() {
        // Same membership today, different order: they are maintained apart
        assert_ne!(HEADER_ROUTES, SIDEBAR_ROUTES);
        let mut h = HEADER_ROUTES.to_vec();
        let mut s = SIDEBAR_ROUTES.to_vec();
        h.sort();
        s.sort();
        assert_eq!(h, s);
    }
}
