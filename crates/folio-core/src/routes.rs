use crate::auth::{AuthGate, IdentityProvider};
use std::fmt;

/// Pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Projects,
    Contact,
    AdminLogin,
    Admin,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Home,
        Route::About,
        Route::Projects,
        Route::Contact,
        Route::AdminLogin,
        Route::Admin,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::About => "/sobre",
            Route::Projects => "/projetos",
            Route::Contact => "/contato",
            Route::AdminLogin => "/admin/login",
            Route::Admin => "/admin",
        }
    }

    /// Resolves a path. English aliases (`/about`, `/projects`, `/contact`)
    /// are accepted and a trailing slash is ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match normalized {
            "/" => Some(Route::Home),
            "/sobre" | "/about" => Some(Route::About),
            "/projetos" | "/projects" => Some(Route::Projects),
            "/contato" | "/contact" => Some(Route::Contact),
            "/admin/login" => Some(Route::AdminLogin),
            "/admin" => Some(Route::Admin),
            _ => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Admin)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Session still resolving; show nothing yet.
    Pending,
    Redirect(Route),
}

/// Decides what to show for `route`. Protected routes wait for the session
/// to resolve before redirecting to the login page.
pub fn guard<P: IdentityProvider>(gate: &AuthGate<P>, route: Route) -> GuardDecision {
    if !route.is_protected() {
        return GuardDecision::Render;
    }
    if gate.is_loading() {
        return GuardDecision::Pending;
    }
    if gate.is_authenticated() {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect(Route::AdminLogin)
    }
}
