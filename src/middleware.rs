use axum::{extract::Request, http::Method, middleware::Next, response::Response};

use crate::error::AppError;

/// Method validation middleware
/// Content routes are read-only; anything but GET or HEAD is rejected with 405
pub async fn method_validator(req: Request, next: Next) -> Result<Response, AppError> {
    if !is_allowed_method(req.method()) {
        return Err(AppError::MethodNotAllowed(format!(
            "{} is not supported on {}",
            req.method(),
            req.uri().path()
        )));
    }

    Ok(next.run(req).await)
}

fn is_allowed_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}
