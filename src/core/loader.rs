//! Document loading from local paths and HTTP(S) URLs
//!
//! The OpenAPI specification and the SDK definitions may live on disk or be
//! served from a URL (raw GitHub links in CI). Both are read whole and then
//! deserialized with serde.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Error types for document loading
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Failed to read {location}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {location}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching {location} returned HTTP status {status}")]
    Status { location: String, status: u16 },

    #[error("Failed to parse YAML from {location}")]
    Yaml {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON from {location}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Returns true when the location should be fetched over HTTP
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Loads documents by location
pub struct DocumentLoader {
    client: Client,
}

impl DocumentLoader {
    /// Create a loader whose HTTP requests time out after `timeout` seconds
    pub fn new(timeout: u64) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(LoadError::Client)?;

        Ok(Self { client })
    }

    /// Read the raw contents at a location
    pub async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        if !is_remote(location) {
            debug!("Reading {}", location);
            return tokio::fs::read_to_string(location)
                .await
                .map_err(|source| LoadError::Read {
                    location: location.to_string(),
                    source,
                });
        }

        info!("Fetching {}", location);
        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|source| LoadError::Http {
                location: location.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| LoadError::Http {
            location: location.to_string(),
            source,
        })
    }

    /// Load and deserialize a YAML document
    pub async fn load_yaml<T: DeserializeOwned>(&self, location: &str) -> Result<T, LoadError> {
        let content = self.fetch(location).await?;
        serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
            location: location.to_string(),
            source,
        })
    }

    /// Load and deserialize a JSON document
    pub async fn load_json<T: DeserializeOwned>(&self, location: &str) -> Result<T, LoadError> {
        let content = self.fetch(location).await?;
        serde_json::from_str(&content).map_err(|source| LoadError::Json {
            location: location.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://raw.githubusercontent.com/acme/sdk.json"));
        assert!(is_remote("HTTP://localhost/schema.yml"));
        assert!(!is_remote("schema.yml"));
        assert!(!is_remote("/srv/specs/https.yml"));
    }

    #[tokio::test]
    async fn test_load_yaml_from_file() {
        let file = write_temp("info:\n  title: Media Delivery\n  version: 1.0.0\n");
        let loader = DocumentLoader::new(5).unwrap();
        let doc: serde_yaml::Value = loader
            .load_yaml(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(doc["info"]["title"].as_str(), Some("Media Delivery"));
    }

    #[tokio::test]
    async fn test_load_json_from_file() {
        let file = write_temp(r#"{"SDKS": []}"#);
        let loader = DocumentLoader::new(5).unwrap();
        let doc: serde_json::Value = loader
            .load_json(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert!(doc["SDKS"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");
        let loader = DocumentLoader::new(5).unwrap();
        let err = loader
            .load_yaml::<serde_yaml::Value>(missing.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let file = write_temp("{ not json");
        let loader = DocumentLoader::new(5).unwrap();
        let err = loader
            .load_json::<serde_json::Value>(file.path().to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[tokio::test]
    async fn test_load_yaml_from_url() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schema.yml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("info:\n  title: Upload\n  version: 3.0.1\n"),
            )
            .mount(&mock_server)
            .await;

        let loader = DocumentLoader::new(5).unwrap();
        let url = format!("{}/schema.yml", mock_server.uri());
        let doc: serde_yaml::Value = loader.load_yaml(&url).await.unwrap();
        assert_eq!(doc["info"]["version"].as_str(), Some("3.0.1"));
    }

    #[tokio::test]
    async fn test_not_found_is_status_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sdk.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let loader = DocumentLoader::new(5).unwrap();
        let url = format!("{}/sdk.json", mock_server.uri());
        let err = loader
            .load_json::<serde_json::Value>(&url)
            .await
            .unwrap_err();

        match err {
            LoadError::Status { location, status } => {
                assert_eq!(location, url);
                assert_eq!(status, 404);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let mock_server = MockServer::start().await;
        let url = format!("{}/sdk.json", mock_server.uri());
        drop(mock_server);

        let loader = DocumentLoader::new(5).unwrap();
        let err = loader.fetch(&url).await.unwrap_err();
        assert!(matches!(err, LoadError::Http { .. }));
    }

    #[tokio::test]
    async fn test_invalid_yaml_from_url_is_parse_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("info: [unclosed"))
            .mount(&mock_server)
            .await;

        let loader = DocumentLoader::new(5).unwrap();
        let url = format!("{}/schema.yml", mock_server.uri());
        let err = loader
            .load_yaml::<serde_yaml::Value>(&url)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Yaml { .. }));
    }
}
