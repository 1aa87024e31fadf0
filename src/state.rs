use crate::db::{DbPool, OrmConn};

/// Shared connections, created once at startup and injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}
