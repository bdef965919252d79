//! Route table and navigation history.

use std::collections::BTreeMap;

/// Every page the shell can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// /
    Login,
    /// /register
    Register,
    /// /forgot-password
    ForgotPassword,
    /// /dashboard
    Dashboard,
    /// /field-operations-tracking
    FieldOperationsTracking,
    /// /photo-based-reporting
    PhotoBasedReporting,
    /// /integrated-payments
    IntegratedPayments,
    /// /smart-cluster-security
    SmartClusterSecurity,
    /// /profile
    Profile,
    /// /edit-profile
    EditProfile,
    /// /change-password
    ChangePassword,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Login,
        Route::Register,
        Route::ForgotPassword,
        Route::Dashboard,
        Route::FieldOperationsTracking,
        Route::PhotoBasedReporting,
        Route::IntegratedPayments,
        Route::SmartClusterSecurity,
        Route::Profile,
        Route::EditProfile,
        Route::ChangePassword,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Register => "/register",
            Route::ForgotPassword => "/forgot-password",
            Route::Dashboard => "/dashboard",
            Route::FieldOperationsTracking => "/field-operations-tracking",
            Route::PhotoBasedReporting => "/photo-based-reporting",
            Route::IntegratedPayments => "/integrated-payments",
            Route::SmartClusterSecurity => "/smart-cluster-security",
            Route::Profile => "/profile",
            Route::EditProfile => "/edit-profile",
            Route::ChangePassword => "/change-password",
        }
    }

    /// Exact pathname match, no prefixes or trailing-slash folding
    pub fn from_path(pathname: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == pathname)
    }
}

/// A parsed navigation target such as `/?success=1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub query: BTreeMap<String, String>,
}

impl Location {
    pub fn parse(target: &str) -> Self {
        let (pathname, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        let pathname = if pathname.is_empty() { "/" } else { pathname };
        Self {
            pathname: pathname.to_string(),
            query,
        }
    }

    pub fn route(&self) -> Option<Route> {
        Route::from_path(&self.pathname)
    }

    pub fn query_flag(&self, key: &str) -> bool {
        self.query.get(key).is_some_and(|v| v == "1")
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pathname)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, k, v)?;
        }
        Ok(())
    }
}

/// Browser-style history: navigate pushes, back pops
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Location>,
}

impl Router {
    pub fn new(start: &str) -> Self {
        Self {
            history: vec![Location::parse(start)],
        }
    }

    pub fn location(&self) -> &Location {
        // history is never empty: new() seeds it and back() keeps the first entry
        &self.history[self.history.len() - 1]
    }

    pub fn navigate(&mut self, target: &str) -> &Location {
        self.history.push(Location::parse(target));
        self.location()
    }

    /// Go back one entry. Returns false when already at the first entry.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/dashboard/"), None);
        assert_eq!(Route::from_path("/admin/dashboard"), None);
    }

    #[test]
    fn test_location_parse_query() {
        let loc = Location::parse("/?success=1&foo");
        assert_eq!(loc.pathname, "/");
        assert!(loc.query_flag("success"));
        assert!(!loc.query_flag("foo"));
        assert_eq!(loc.route(), Some(Route::Login));

        assert_eq!(Location::parse("?passwordReset=1").pathname, "/");
        assert_eq!(Location::parse("/?success=1").to_string(), "/?success=1");
    }

    #[test]
    fn test_router_history() {
        let mut router = Router::new("/");
        router.navigate("/profile");
        router.navigate("/edit-profile");
        assert_eq!(router.depth(), 3);

        assert!(router.back());
        assert_eq!(router.location().pathname, "/profile");
        assert!(router.back());
        assert!(!router.back());
        assert_eq!(router.location().pathname, "/");
    }
}
