use crate::error::Result;
use async_trait::async_trait;

/// Transport seam for every page fetch. Adapters never talk to `reqwest`
/// directly, so tests can serve fixtures from memory.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let mut res = HttpGetResult {
            status: 200,
            bytes: b"<html></html>".to_vec(),
            content_type: "text/html".into(),
        };
        assert!(res.is_success());
        assert_eq!(res.text(), "<html></html>");
        res.status = 404;
        assert!(!res.is_success());
    }
}
