//! HTTP download of the exoplanet catalog.
//!
//! One GET per run, no retries. The response body is decoded as JSON
//! regardless of the advertised content type, since raw gist hosts serve
//! JSON as `text/plain`.

use crate::dataset::parse_payload;
use crate::models::PlanetRecord;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while downloading the catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection, TLS, timeout, or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with something other than 200.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    /// Body was not a catalog payload.
    #[error("failed to decode dataset from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Options for downloading the catalog.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while downloading.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Downloads catalog records from a URL.
pub struct DatasetFetcher {
    client: reqwest::Client,
    options: FetchOptions,
}

impl DatasetFetcher {
    /// Create a fetcher with a client honoring the configured timeout.
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(concat!("exocensus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self::with_client(client, options))
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(client: reqwest::Client, options: FetchOptions) -> Self {
        Self { client, options }
    }

    /// Download and decode the catalog.
    ///
    /// An empty URL yields `Ok(None)` without touching the network.
    pub async fn fetch(&self, url: &str) -> Result<Option<Vec<PlanetRecord>>, FetchError> {
        let url = url.trim();
        if url.is_empty() {
            debug!("No dataset URL given, skipping download");
            return Ok(None);
        }

        info!("Fetching dataset: {}", url);

        let spinner = self.options.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Downloading exoplanet catalog...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let result = self.download(url).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let records = result?;
        info!("Received {} records", records.len());
        Ok(Some(records))
    }

    async fn download(&self, url: &str) -> Result<Vec<PlanetRecord>, FetchError> {
        let transport = |source: reqwest::Error| {
            if source.is_timeout() {
                warn!(
                    "Request timed out after {}s",
                    self.options.timeout_seconds
                );
            } else if source.is_connect() {
                warn!("Cannot connect to {}", url);
            }
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        };

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!("Dataset response status: {}", status);
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        debug!("Dataset body is {} bytes", body.len());

        parse_payload(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn test_fetcher() -> DatasetFetcher {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        DatasetFetcher::with_client(
            client,
            FetchOptions {
                timeout_seconds: 5,
                show_progress: false,
            },
        )
    }

    /// Serve a single canned HTTP response and return the URL to hit.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/exoplanets", addr)
    }

    #[tokio::test]
    async fn test_fetch_empty_url_returns_none() {
        let fetcher = test_fetcher();
        assert!(fetcher.fetch("").await.unwrap().is_none());
        assert!(fetcher.fetch("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_bare_array() {
        let url = serve_once(
            "200 OK",
            r#"[{"PlanetIdentifier": "KOI-1843.03", "TypeFlag": 0, "RadiusJpt": 0.054, "DiscoveryYear": 2012, "HostStarTempK": 3584}]"#,
        )
        .await;

        let records = test_fetcher().fetch(&url).await.unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].planet_identifier, "KOI-1843.03");
        assert_eq!(records[0].host_star_temp_k, Some(3584.0));
    }

    #[tokio::test]
    async fn test_fetch_wrapped_payload() {
        let url = serve_once(
            "200 OK",
            r#"{"status": "success", "data": [{"PlanetIdentifier": "a"}, {"PlanetIdentifier": "b"}, {"PlanetIdentifier": "c"}]}"#,
        )
        .await;

        let records = test_fetcher().fetch(&url).await.unwrap().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].planet_identifier, "a");
    }

    #[tokio::test]
    async fn test_fetch_non_200_status() {
        let url = serve_once("404 Not Found", r#"{"error": "missing"}"#).await;

        let err = test_fetcher().fetch(&url).await.unwrap_err();
        match err {
            FetchError::UnexpectedStatus { status, .. } => {
                assert_eq!(status, StatusCode::NOT_FOUND)
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let url = serve_once("200 OK", "<html>not json</html>").await;

        let err = test_fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(err.to_string().contains("failed to decode dataset"));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = test_fetcher()
            .fetch(&format!("http://{}/exoplanets", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[test]
    fn test_fetch_options_default() {
        let opts = FetchOptions::default();
        assert_eq!(opts.timeout_seconds, 30);
        assert!(opts.show_progress);
    }
}
