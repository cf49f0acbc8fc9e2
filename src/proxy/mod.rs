// Proxy module
// Fetches a target URL server-side and relays the rewritten response

mod rewrite;
mod target;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::convert::Infallible;
use std::sync::Arc;
use url::Url;

use crate::api::response::error_response;
use crate::config::AppState;
use crate::logger;

/// Why a proxy fetch did not produce a relayable response
enum FetchError {
    /// The upstream request itself failed (unreachable, timed out, ...)
    Network(reqwest::Error),
    /// Anything else on the proxy path
    Internal(String),
}

/// GET /proxy/<url> - fetch the target and relay the rewritten response.
///
/// Upstream statuses pass through unchanged, including non-2xx. Failures
/// collapse into a 500 with an `{"error": ...}` body; network failures
/// carry the underlying description, everything else a generic prefix.
pub async fn handle_proxy(
    state: &Arc<AppState>,
    raw_target: &str,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let target = match target::resolve_target(raw_target, state.config.proxy.localhost_port) {
        Ok(url) => url,
        Err(e) => {
            logger::log_proxy_error(&e);
            return Ok(error_response(&format!(
                "An unexpected error occurred: {e}"
            )));
        }
    };

    match fetch_passthrough(&state.http_client, target).await {
        Ok(resp) => Ok(resp),
        Err(FetchError::Network(e)) => {
            let message = e.to_string();
            logger::log_proxy_error(&message);
            Ok(error_response(&message))
        }
        Err(FetchError::Internal(message)) => {
            logger::log_proxy_error(&message);
            Ok(error_response(&format!(
                "An unexpected error occurred: {message}"
            )))
        }
    }
}

/// Single blocking-style GET against the resolved target, followed by the
/// link rewrite and header filtering.
async fn fetch_passthrough(
    client: &reqwest::Client,
    target: Url,
) -> Result<Response<Full<Bytes>>, FetchError> {
    let upstream = client
        .get(target)
        .send()
        .await
        .map_err(FetchError::Network)?;

    let status = upstream.status();
    // Redirects may have moved us; rewrite against where the body came from
    let final_url = upstream.url().clone();
    let headers = upstream.headers().clone();
    let body = upstream.bytes().await.map_err(FetchError::Network)?;

    let base = final_url.join("/").map_err(|e| {
        FetchError::Internal(format!("Cannot derive base URL from {final_url}: {e}"))
    })?;
    let rewritten = rewrite::rewrite_root_relative(&body, base.as_str());

    logger::log_proxy_fetch(final_url.as_str(), status.as_u16(), rewritten.len());

    let mut builder = Response::builder().status(status);
    for (name, value) in &headers {
        if !rewrite::is_stripped_header(name.as_str()) {
            builder = builder.header(name, value);
        }
    }

    builder
        .body(Full::new(Bytes::from(rewritten)))
        .map_err(|e| FetchError::Internal(format!("Failed to build proxied response: {e}")))
}
