// Face data endpoint handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

use super::response::{bad_request, error_response, json_response};
use crate::config::AppState;
use crate::logger;
use crate::store::CubeData;

/// GET /get_data - return the persisted face document as JSON
pub async fn handle_get_data(state: &Arc<AppState>) -> Result<Response<Full<Bytes>>, Infallible> {
    match state.store.load() {
        Ok(data) => {
            logger::log_api_request("GET", "/get_data", 200);
            json_response(StatusCode::OK, &data)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to load face data: {e}"));
            logger::log_api_request("GET", "/get_data", 500);
            Ok(error_response(&e))
        }
    }
}

/// POST /save_data - replace the persisted face document in full
pub async fn handle_save_data(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    use http_body_util::BodyExt;

    // Read request body
    let whole_body = if let Ok(collected) = req.collect().await {
        collected.to_bytes()
    } else {
        logger::log_api_request("POST", "/save_data", 400);
        return Ok(bad_request("Failed to read request body"));
    };

    let data = match parse_cube_data(&whole_body) {
        Ok(d) => d,
        Err(e) => {
            logger::log_api_request("POST", "/save_data", 400);
            return Ok(bad_request(&e));
        }
    };

    match state.store.save(&data) {
        Ok(()) => {
            logger::log_api_request("POST", "/save_data", 200);
            json_response(StatusCode::OK, &serde_json::json!({"status": "success"}))
        }
        Err(e) => {
            logger::log_error(&format!("Failed to save face data: {e}"));
            logger::log_api_request("POST", "/save_data", 500);
            Ok(error_response(&e))
        }
    }
}

/// Parse and validate a request body as the face document.
///
/// Validation is structural: every value must be a `{color, url}` object
/// with string fields and nothing else. Face ids are not restricted to
/// "1".."6" since the store accepts any map.
fn parse_cube_data(body: &[u8]) -> Result<CubeData, String> {
    serde_json::from_slice(body).map_err(|e| format!("Invalid face data: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Face, FaceStore, MemoryStore};

    #[test]
    fn test_parse_valid_document() {
        let data =
            parse_cube_data(br#"{"1": {"color": "red", "url": "http://x"}}"#).unwrap();
        assert_eq!(data.0.len(), 1);
        assert_eq!(data.0["1"].color, "red");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let result = parse_cube_data(b"{not json");
        assert!(result.unwrap_err().starts_with("Invalid face data"));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(parse_cube_data(br#"{"1": "red"}"#).is_err());
        assert!(parse_cube_data(br#"{"1": {"color": "red"}}"#).is_err());
        assert!(parse_cube_data(br#"{"1": {"color": "red", "url": "", "x": 1}}"#).is_err());
        assert!(parse_cube_data(br#"[1, 2, 3]"#).is_err());
    }

    #[test]
    fn test_parse_then_save_round_trip() {
        let store = MemoryStore::new();
        let data =
            parse_cube_data(br#"{"1": {"color": "red", "url": "http://x"}}"#).unwrap();
        store.save(&data).unwrap();

        let mut expected = CubeData::default();
        expected.0.insert(
            "1".to_string(),
            Face {
                color: "red".to_string(),
                url: "http://x".to_string(),
            },
        );
        assert_eq!(store.load().unwrap(), expected);
    }
}
