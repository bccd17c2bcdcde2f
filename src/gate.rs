//! Auth gate: which view tree is reachable for the current session.
//!
//! The gate keeps no state of its own. It reads the session broadcast and
//! applies two redirects: protected routes send a signed-out user to
//! [`Route::Login`], and the auth views send a signed-in user to
//! [`Route::Dashboard`].

use tokio::sync::watch;
use tracing::debug;

use crate::session::{SessionStatus, SessionVault};

/// Dashboard sections plus the two auth views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Articles,
    Clients,
    Sales,
    Maintenance,
    Orders,
    Technicians,
}

impl Route {
    pub const SECTIONS: [Self; 7] = [
        Self::Dashboard,
        Self::Articles,
        Self::Clients,
        Self::Sales,
        Self::Maintenance,
        Self::Orders,
        Self::Technicians,
    ];

    /// Parse `/articulos`, `#articulos`, or `articulos/`. Unknown paths
    /// resolve to the dashboard.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let key = path.trim().trim_start_matches(['#', '/']).trim_end_matches('/');
        match key.to_ascii_lowercase().as_str() {
            "login" => Self::Login,
            "register" | "registro" => Self::Register,
            "articulos" => Self::Articles,
            "clientes" => Self::Clients,
            "ventas" => Self::Sales,
            "mantenimientos" => Self::Maintenance,
            "ordenes" => Self::Orders,
            "tecnicos" => Self::Technicians,
            _ => Self::Dashboard,
        }
    }

    #[must_use]
    pub fn to_path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/",
            Self::Articles => "/articulos",
            Self::Clients => "/clientes",
            Self::Sales => "/ventas",
            Self::Maintenance => "/mantenimientos",
            Self::Orders => "/ordenes",
            Self::Technicians => "/tecnicos",
        }
    }

    #[must_use]
    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// Auth views are pointless once signed in.
    #[must_use]
    pub fn redirects_when_authenticated(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// The two view trees a session can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTree {
    /// Login and registration.
    Public,
    /// Dashboard sections.
    Protected,
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    status: watch::Receiver<SessionStatus>,
}

impl AuthGate {
    #[must_use]
    pub fn new(vault: &SessionVault) -> Self {
        Self { status: vault.subscribe() }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status.borrow().session().is_some()
    }

    #[must_use]
    pub fn view(&self) -> ViewTree {
        if self.is_authenticated() { ViewTree::Protected } else { ViewTree::Public }
    }

    /// Whether the last session ended because the backend rejected it.
    #[must_use]
    pub fn session_expired(&self) -> bool {
        matches!(*self.status.borrow(), SessionStatus::Expired)
    }

    /// Route actually shown when `target` is requested.
    #[must_use]
    pub fn resolve(&self, target: Route) -> Route {
        let authenticated = self.is_authenticated();
        if target.requires_auth() && !authenticated {
            debug!(?target, "access denied; redirecting to login");
            return Route::Login;
        }
        if target.redirects_when_authenticated() && authenticated {
            debug!(?target, "already authenticated; redirecting to dashboard");
            return Route::Dashboard;
        }
        target
    }

    #[must_use]
    pub fn resolve_path(&self, path: &str) -> Route {
        self.resolve(Route::from_path(path))
    }

    /// Wait for the next session change and return the view tree it leads
    /// to. `None` once the vault is gone.
    pub async fn changed(&mut self) -> Option<ViewTree> {
        self.status.changed().await.ok()?;
        Some(self.view())
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
