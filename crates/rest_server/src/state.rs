use sea_orm::DatabaseConnection;

/// Shared handler state. The pool hands each request its own connection;
/// nothing else is shared between requests.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}
