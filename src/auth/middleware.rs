use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Caller identity as asserted by the upstream identity provider. This
/// service does not authenticate; it only requires the id to be present.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub display_name: Option<String>,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn require_identity(mut req: Request, next: Next) -> Result<Response, AppError> {
    let user_id = header_value(req.headers(), USER_ID_HEADER)
        .ok_or_else(|| AppError::Validation("User ID is required.".into()))?;
    let display_name = header_value(req.headers(), USER_NAME_HEADER);

    req.extensions_mut().insert(Identity { user_id, display_name });
    Ok(next.run(req).await)
}
