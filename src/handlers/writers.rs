//! Output writers for fetched content
//!
//! Both writers fetch the configured target on every request. The JSON writer
//! embeds the payload in an envelope; the HTML writer wraps it in a page.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use super::AppState;
use crate::{error::AppError, fetcher::Content};

/// Render fetched content as a JSON envelope
pub async fn json_writer(State(state): State<AppState>) -> Result<Response, AppError> {
    let content = state.fetch_content().await?;
    let payload = render_json(state.request.url().as_str(), &content)?;
    Ok(Json(payload).into_response())
}

/// Render fetched content as an HTML page
pub async fn html_writer(State(state): State<AppState>) -> Result<Response, AppError> {
    let content = state.fetch_content().await?;
    let page = render_html(state.request.url().as_str(), &content);
    Ok(Html(page).into_response())
}

fn render_json(source: &str, content: &Content) -> Result<Value, AppError> {
    let body = if is_json_token(&content.mime_type) {
        serde_json::from_slice::<Value>(&content.body).map_err(|e| {
            AppError::MalformedContent(format!("{} did not return valid JSON: {}", source, e))
        })?
    } else {
        Value::String(String::from_utf8_lossy(&content.body).into_owned())
    };

    Ok(json!({
        "source": source,
        "mime_type": content.mime_type,
        "content": body,
    }))
}

fn render_html(source: &str, content: &Content) -> String {
    let source = escape_html(source);
    let body = escape_html(&String::from_utf8_lossy(&content.body));

    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{source}</title></head>\n\
         <body>\n<h1>{source}</h1>\n<p>mime type: {mime}</p>\n<pre>{body}</pre>\n</body>\n</html>\n",
        source = source,
        mime = escape_html(&content.mime_type),
        body = body,
    )
}

fn is_json_token(token: &str) -> bool {
    token == "json" || token.ends_with("/json") || token.ends_with("+json")
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
