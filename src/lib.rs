//! Client-side data access and auth session layer for the management
//! dashboard.
//!
//! ARCHITECTURE
//! ============
//! ```text
//!   view ──► ResourceBinding ──► HttpClient ──► REST backend
//!                 │                   │
//!                 │                   └── reads token / expires on 401
//!                 ▼                   ▼
//!            DemoDataset        SessionVault ◄── SessionManager
//!                                     │
//!                                     └──► AuthGate (public / protected)
//! ```
//!
//! [`app::AppContext`] wires these once per process. Record types for every
//! managed entity live in the [`records`] crate.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod gate;
pub mod http;
pub mod probe;
pub mod resource;
pub mod session;
pub mod storage;

#[cfg(test)]
mod test_helpers;

pub use records;

pub use app::{AppContext, BootstrapError};
pub use auth::{AuthError, AuthPhase, SessionManager};
pub use config::{ClientConfig, ConfigError, SessionStorage, Timeouts};
pub use error::{ApiError, ErrorCode, RequestOutcome};
pub use gate::{AuthGate, Route, ViewTree};
pub use http::{HttpClient, Method};
pub use resource::{DemoDataset, ResourceBinding, ResourceState, SourceMode};
pub use session::{Session, SessionStatus, SessionVault};
