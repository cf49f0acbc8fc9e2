//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, and dispatching.

use crate::api::handlers;
use crate::api::response;
use crate::config::AppState;
use crate::handler::homepage;
use crate::logger::{self, AccessLogEntry};
use crate::proxy;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const PROXY_PREFIX: &str = "/proxy/";

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);

    // Capture request facts up front; dispatch consumes the request
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    // Reject oversized bodies before reading them
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return Ok(finish(resp, entry, started, access_log, &state));
    }

    let response = dispatch(req, &state).await?;
    Ok(finish(response, entry, started, access_log, &state))
}

/// Route request based on method and path
async fn dispatch(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (method, path.as_str()) {
        (Method::GET, "/") => Ok(homepage::serve_homepage(false)),
        (Method::HEAD, "/") => Ok(homepage::serve_homepage(true)),
        (Method::GET, "/get_data") => handlers::handle_get_data(state).await,
        (Method::POST, "/save_data") => handlers::handle_save_data(req, state).await,
        (Method::GET, p) if p.starts_with(PROXY_PREFIX) => {
            proxy::handle_proxy(state, &p[PROXY_PREFIX.len()..]).await
        }
        (Method::OPTIONS, _) => Ok(response::options_response()),
        (method, "/" | "/get_data" | "/save_data") => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            Ok(response::method_not_allowed())
        }
        (method, p) if p.starts_with(PROXY_PREFIX) => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            Ok(response::method_not_allowed())
        }
        _ => Ok(response::not_found()),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(response::payload_too_large())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Record the response on the access log entry and emit it
fn finish(
    response: Response<Full<Bytes>>,
    mut entry: AccessLogEntry,
    started: Instant,
    access_log: bool,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    if access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }
    response
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
