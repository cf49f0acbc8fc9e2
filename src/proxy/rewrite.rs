// Proxied body rewriting and header filtering

/// Headers dropped from proxied responses: after rewriting, the body length
/// and encoding no longer match what the upstream declared
const STRIPPED_HEADERS: [&str; 4] = [
    "content-encoding",
    "content-length",
    "transfer-encoding",
    "connection",
];

/// Whether a response header must not be relayed to the client
pub fn is_stripped_header(name: &str) -> bool {
    STRIPPED_HEADERS
        .iter()
        .any(|stripped| name.eq_ignore_ascii_case(stripped))
}

/// Rewrite root-relative `src`/`href` attributes to absolute URLs.
///
/// `base` is the final response URL joined with root and ends with `/`, so
/// `src="/img.png` becomes `src="<base>img.png`.
///
/// This is a literal byte substitution, not an HTML-aware parse: any other
/// occurrence of the same byte sequences (script strings, comments) is
/// rewritten too. Accepted approximation.
pub fn rewrite_root_relative(body: &[u8], base: &str) -> Vec<u8> {
    let src_replacement = format!("src=\"{base}");
    let href_replacement = format!("href=\"{base}");

    let pass = replace_all(body, b"src=\"/", src_replacement.as_bytes());
    replace_all(&pass, b"href=\"/", href_replacement.as_bytes())
}

/// Replace every occurrence of `needle` in `haystack`
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    while let Some(pos) = find(rest, needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + needle.len()..];
    }
    out.extend_from_slice(rest);
    out
}

/// First occurrence of `needle` in `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_src_rewrite() {
        let body = br#"<img src="/img.png">"#;
        let rewritten = rewrite_root_relative(body, "http://example.com/");
        assert_eq!(
            rewritten,
            br#"<img src="http://example.com/img.png">"#.to_vec()
        );
    }

    #[test]
    fn test_href_rewrite() {
        let body = br#"<link href="/style.css">"#;
        let rewritten = rewrite_root_relative(body, "http://example.com/");
        assert_eq!(
            rewritten,
            br#"<link href="http://example.com/style.css">"#.to_vec()
        );
    }

    #[test]
    fn test_multiple_occurrences() {
        let body = br#"<img src="/a.png"><a href="/b"><img src="/c.png">"#;
        let rewritten = rewrite_root_relative(body, "http://h/");
        assert_eq!(
            rewritten,
            br#"<img src="http://h/a.png"><a href="http://h/b"><img src="http://h/c.png">"#
                .to_vec()
        );
    }

    #[test]
    fn test_relative_links_untouched() {
        let body = br#"<img src="img.png"><a href="page.html">"#;
        let rewritten = rewrite_root_relative(body, "http://example.com/");
        assert_eq!(rewritten, body.to_vec());
    }

    #[test]
    fn test_absolute_links_untouched() {
        let body = br#"<a href="https://other.com/x">"#;
        let rewritten = rewrite_root_relative(body, "http://example.com/");
        assert_eq!(rewritten, body.to_vec());
    }

    #[test]
    fn test_rewrites_inside_scripts_too() {
        // The substitution is not HTML-aware; script strings are rewritten
        // as well.
        let body = br#"<script>var s = 'src="/x"';</script>"#;
        let rewritten = rewrite_root_relative(body, "http://h/");
        assert_eq!(
            rewritten,
            br#"<script>var s = 'src="http://h/x"';</script>"#.to_vec()
        );
    }

    #[test]
    fn test_non_utf8_body_survives() {
        let mut body = vec![0xff, 0xfe];
        body.extend_from_slice(br#"<img src="/i">"#);
        let rewritten = rewrite_root_relative(&body, "http://h/");
        assert_eq!(&rewritten[..2], &[0xff, 0xfe]);
        assert!(rewritten
            .windows(b"http://h/i".len())
            .any(|w| w == b"http://h/i"));
    }

    #[test]
    fn test_stripped_headers_case_insensitive() {
        assert!(is_stripped_header("content-length"));
        assert!(is_stripped_header("Content-Length"));
        assert!(is_stripped_header("TRANSFER-ENCODING"));
        assert!(is_stripped_header("content-encoding"));
        assert!(is_stripped_header("Connection"));
        assert!(!is_stripped_header("content-type"));
        assert!(!is_stripped_header("set-cookie"));
    }
}
