// Proxy target resolution
// Turns the raw path-embedded target into a fetchable absolute URL

use url::Url;

/// Resolve the raw proxy target into an absolute URL.
///
/// A target with no `http://`/`https://` prefix gets `http://` prepended.
/// Localhost targets are rebuilt from scheme, host, port, and path only,
/// with `localhost_port` filling in when no port is given; the query string
/// does not survive the rebuild.
pub fn resolve_target(raw: &str, localhost_port: u16) -> Result<Url, String> {
    let absolute = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let parsed =
        Url::parse(&absolute).map_err(|e| format!("Invalid proxy target '{raw}': {e}"))?;

    match parsed.host_str() {
        Some(host @ ("localhost" | "127.0.0.1")) => {
            let port = parsed.port().unwrap_or(localhost_port);
            let pinned = format!("{}://{host}:{port}{}", parsed.scheme(), parsed.path());
            Url::parse(&pinned).map_err(|e| format!("Invalid proxy target '{raw}': {e}"))
        }
        Some(_) => Ok(parsed),
        None => Err(format!("Proxy target '{raw}' has no host")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_inference() {
        let url = resolve_target("example.com/page", 5000).unwrap();
        assert_eq!(url.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_explicit_scheme_preserved() {
        let url = resolve_target("https://example.com/page", 5000).unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_query_preserved_for_remote_host() {
        let url = resolve_target("example.com/search?q=cube", 5000).unwrap();
        assert_eq!(url.as_str(), "http://example.com/search?q=cube");
    }

    #[test]
    fn test_localhost_port_pinning() {
        let url = resolve_target("localhost/foo", 5000).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/foo");
    }

    #[test]
    fn test_loopback_ip_port_pinning() {
        let url = resolve_target("127.0.0.1/foo", 5000).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/foo");
    }

    #[test]
    fn test_localhost_explicit_port_kept() {
        let url = resolve_target("localhost:8080/foo", 5000).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/foo");
    }

    #[test]
    fn test_localhost_rebuild_drops_query() {
        let url = resolve_target("localhost:8080/foo?a=b", 5000).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/foo");
    }

    #[test]
    fn test_configured_pin_port() {
        let url = resolve_target("localhost/foo", 3000).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/foo");
    }

    #[test]
    fn test_invalid_target_is_an_error() {
        assert!(resolve_target("http://", 5000).is_err());
    }
}
