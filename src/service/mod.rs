//! The sample user service served behind the adapter.
//!
//! # Routes
//! ```text
//! GET /                   → {"status": 200, "message": "Hello Flask!"}
//! GET /users              → {"users": [...ids]}
//! GET /users/{user_id}    → {"user_id": id, "name": "User <id>"}
//! ```
//!
//! Data comes from an injected [`UserDirectory`]; the default is the
//! placeholder [`StaticUserDirectory`].

pub mod directory;
pub mod handlers;

use std::sync::Arc;

use crate::error::RouteError;
use crate::routing::RouteTable;

pub use directory::{DirectoryError, StaticUserDirectory, User, UserDirectory};

/// Build the service's route table over `directory`.
pub fn routes(directory: Arc<dyn UserDirectory>) -> Result<RouteTable, RouteError> {
    RouteTable::builder()
        .get("/", handlers::index)
        .get(
            "/users",
            handlers::with_directory(&directory, |dir, _ctx| handlers::list_users(dir)),
        )
        .get(
            "/users/{user_id}",
            handlers::with_directory(&directory, handlers::get_user),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_route_table_shape() {
        let table = routes(Arc::new(StaticUserDirectory::default())).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.resolve(&Method::GET, "/").is_some());
        assert!(table.resolve(&Method::GET, "/users").is_some());
        assert!(table.resolve(&Method::GET, "/users/42").is_some());
        assert!(table.resolve(&Method::DELETE, "/users/42").is_none());
    }
}
