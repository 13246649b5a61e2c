use super::LoadRequest;
use crate::{Error, Result};
use log::debug;
use std::io::Read;
use std::time::Duration;

/// Fetches the raw bytes of one load attempt
///
/// Implementations run on the loader's worker thread.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, request: &LoadRequest) -> Result<Vec<u8>>;
}

/// Blocking HTTP transport with browser-like CORS and referrer handling
pub struct HttpFetcher {
    agent: ureq::Agent,
    page_origin: String,
    max_bytes: u64,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(timeout: Duration, page_origin: &str, max_bytes: u64) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            page_origin: page_origin.to_string(),
            max_bytes,
        }
    }

    fn fetch_http(&self, request: &LoadRequest) -> Result<Vec<u8>> {
        let mut call = self.agent.get(&request.url);
        if request.strategy.cross_origin {
            call = call.set("Origin", &self.page_origin);
        }
        if !request.strategy.no_referrer {
            call = call.set("Referer", &self.page_origin);
        }

        let response = call.call().map_err(|e| Error::Http(format!("{}: {e}", request.url)))?;

        if request.strategy.cross_origin {
            let allowed = response
                .header("Access-Control-Allow-Origin")
                .is_some_and(|value| value == "*" || value == self.page_origin);
            if !allowed {
                return Err(Error::CrossOrigin {
                    url: request.url.clone(),
                });
            }
        }

        let bytes = read_capped(response.into_reader(), &request.url, self.max_bytes)?;
        debug!("Fetched {} bytes from {}", bytes.len(), request.url);
        Ok(bytes)
    }
}

/// Read a whole body, failing instead of truncating past `max_bytes`
fn read_capped(reader: impl Read, url: &str, max_bytes: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(max_bytes.saturating_add(1)).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > max_bytes {
        return Err(Error::Http(format!("{url}: response exceeds byte limit of {max_bytes}")));
    }
    Ok(bytes)
}

/// Read a `file://` URL from disk, ignoring any query string
fn fetch_file(url: &str, max_bytes: u64) -> Result<Vec<u8>> {
    let path = url.trim_start_matches("file://");
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    read_capped(std::fs::File::open(path)?, url, max_bytes)
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, request: &LoadRequest) -> Result<Vec<u8>> {
        if request.url.starts_with("file://") {
            fetch_file(&request.url, self.max_bytes)
        } else {
            self.fetch_http(request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LoadStrategy;

    #[test]
    fn test_file_urls_ignore_query() {
        let path = std::env::temp_dir().join("accessory_overlay_fetch_test.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let url = format!("file://{}?v=1", path.display());
        let request = LoadRequest {
            asset_id: "x".into(),
            attempt: 0,
            strategy: LoadStrategy::new(&url, true, true),
            url,
        };
        let fetcher = HttpFetcher::new(Duration::from_secs(1), "http://localhost", 10);
        assert_eq!(fetcher.fetch(&request).unwrap(), b"0123456789".to_vec());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_oversized_body_is_rejected() {
        let err = read_capped(&b"0123456789"[..], "https://a/big.png", 4).unwrap_err();
        assert!(matches!(&err, Error::Http(message) if message.contains("exceeds byte limit of 4")));

        let path = std::env::temp_dir().join("accessory_overlay_fetch_cap_test.bin");
        std::fs::write(&path, b"0123456789").unwrap();
        let err = fetch_file(&format!("file://{}", path.display()), 9).unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = fetch_file("file:///nonexistent/accessory.png?v=3", 1024).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
