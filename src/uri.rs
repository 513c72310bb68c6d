use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

type RewriteFn = dyn Fn(&str) -> String + Send + Sync;

/// Turns a content hash into a fetchable URL. Cheap to clone.
#[derive(Clone)]
pub struct UriRewriter(Arc<RewriteFn>);

impl UriRewriter {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        UriRewriter(Arc::new(handler))
    }

    /// Handler that appends the hash to a gateway base URL.
    pub fn gateway(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self::new(move |hash| format!("{base}{hash}"))
    }

    /// Applies the handler to the raw hash.
    pub fn rewrite_hash(&self, hash: &str) -> String {
        (self.0)(hash)
    }

    /// Rewrites content-addressed URIs and leaves everything else alone.
    pub fn resolve(&self, uri: &str) -> String {
        let uri = uri.trim();
        match content_hash(uri) {
            Some(hash) => self.rewrite_hash(hash),
            None => uri.to_string(),
        }
    }
}

impl Default for UriRewriter {
    fn default() -> Self {
        Self::gateway(DEFAULT_IPFS_GATEWAY)
    }
}

impl fmt::Debug for UriRewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UriRewriter").finish()
    }
}

/// Extracts the `<cid>[/path]` part of an IPFS reference, if `uri` is one.
fn content_hash(uri: &str) -> Option<&str> {
    if let Some(rest) = uri.strip_prefix("ipfs://") {
        return Some(rest.strip_prefix("ipfs/").unwrap_or(rest));
    }
    if let Some(rest) = uri.strip_prefix("/ipfs/") {
        return Some(rest);
    }
    if looks_like_cid(uri) {
        return Some(uri);
    }
    None
}

fn looks_like_cid(uri: &str) -> bool {
    let head = uri.split('/').next().unwrap_or_default();
    (head.starts_with("Qm") && head.len() == 46) || (head.starts_with("bafy") && head.len() > 50)
}

/// Decodes a `data:` URI carrying JSON, either base64 or plain text.
pub fn decode_data_uri(uri: &str) -> eyre::Result<String> {
    let body = uri
        .strip_prefix("data:")
        .ok_or_else(|| eyre::eyre!("Not a data URI"))?;
    let (header, payload) = body
        .split_once(',')
        .ok_or_else(|| eyre::eyre!("Malformed data URI"))?;

    if header.split(';').any(|part| part == "base64") {
        let bytes = STANDARD.decode(payload.trim())?;
        return Ok(String::from_utf8(bytes)?);
    }

    Ok(payload.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    const CID: &str = "QmYiudjqgZwma6siYmaMJELgPVjCJMzhu3cz3tsxaFUw8Q";

    #[test]
    fn test_default_gateway() {
        let rewriter = UriRewriter::default();
        assert_eq!(
            rewriter.resolve(&format!("ipfs://{CID}")),
            format!("https://ipfs.io/ipfs/{CID}")
        );
        assert_eq!(
            rewriter.resolve(&format!("ipfs://ipfs/{CID}/1.json")),
            format!("https://ipfs.io/ipfs/{CID}/1.json")
        );
        assert_eq!(
            rewriter.resolve(&format!("/ipfs/{CID}")),
            format!("https://ipfs.io/ipfs/{CID}")
        );
        assert_eq!(rewriter.resolve(CID), format!("https://ipfs.io/ipfs/{CID}"));
    }

    #[test]
    fn test_passthrough() {
        let rewriter = UriRewriter::default();
        assert_eq!(
            rewriter.resolve("https://example.com/1.png"),
            "https://example.com/1.png"
        );
        assert_eq!(
            rewriter.resolve("data:image/svg+xml;base64,PHN2Zz4="),
            "data:image/svg+xml;base64,PHN2Zz4="
        );
    }

    #[test]
    fn test_custom_handler() {
        let rewriter = UriRewriter::gateway("https://cloudflare-ipfs.com/ipfs");
        assert_eq!(
            rewriter.resolve(&format!("ipfs://{CID}")),
            format!("https://cloudflare-ipfs.com/ipfs/{CID}")
        );

        let rewriter = UriRewriter::new(|hash| format!("https://{hash}.ipfs.dweb.link"));
        assert_eq!(rewriter.rewrite_hash("abc"), "https://abc.ipfs.dweb.link");
    }

    #[test]
    fn test_decode_data_uri() {
        let json = decode_data_uri("data:application/json;base64,eyJuYW1lIjoidGVzdCJ9").unwrap();
        assert_eq!(json, r#"{"name":"test"}"#);

        let json = decode_data_uri(r#"data:application/json;utf8,{"name":"plain"}"#).unwrap();
        assert_eq!(json, r#"{"name":"plain"}"#);

        assert!(decode_data_uri("https://example.com").is_err());
        assert!(decode_data_uri("data:application/json;base64,***").is_err());
    }
}
