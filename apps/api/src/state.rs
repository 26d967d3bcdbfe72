use crate::config::Config;
use crate::wizard::controller::Wizard;
use crate::wizard::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Owns the pluggable generator chosen at startup.
    pub wizard: Wizard,
    pub config: Config,
}
