//! Route handlers for the sample service.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use crate::error::HandlerError;
use crate::http::request::RequestContext;
use crate::http::response::{HandlerResult, Reply};
use crate::service::directory::UserDirectory;

/// `GET /`
pub fn index(_ctx: &RequestContext) -> HandlerResult {
    Ok(Reply::json(json!({ "status": 200, "message": "Hello Flask!" })))
}

/// `GET /users`
pub fn list_users(directory: &dyn UserDirectory) -> HandlerResult {
    let users = directory.list_user_ids()?;
    Ok(Reply::json(json!({ "users": users })))
}

/// `GET /users/{user_id}`
pub fn get_user(directory: &dyn UserDirectory, ctx: &RequestContext) -> HandlerResult {
    let user_id = ctx
        .param("user_id")
        .ok_or_else(|| HandlerError::new("missing path parameter 'user_id'"))?;

    match directory.find_user(user_id)? {
        Some(user) => Reply::to_json(&user),
        None => Ok(Reply::json(json!({ "error": format!("user '{}' not found", user_id) }))
            .with_status(StatusCode::NOT_FOUND)),
    }
}

/// Wrap a directory-backed handler into a route closure.
pub(crate) fn with_directory<F>(
    directory: &Arc<dyn UserDirectory>,
    handler: F,
) -> impl Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static
where
    F: Fn(&dyn UserDirectory, &RequestContext) -> HandlerResult + Send + Sync + 'static,
{
    let directory = Arc::clone(directory);
    move |ctx| handler(directory.as_ref(), ctx)
}
