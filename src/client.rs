//! HTTP client for the AISHub vessel-tracking webservice.

use crate::codec::{self, CodecError};
use crate::parser::{self, ParseError};
use crate::query::{build_params, ApiConfig, BoundingBox, QueryError, VesselQuery};
use crate::types::ApiResponse;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Errors raised at the transport boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned error status: {status}")]
    ServerError { status: StatusCode },
}

/// Umbrella error for the request/decompress/parse pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("query error: {0}")]
    Query(#[from] QueryError),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Default endpoint of the AISHub webservice.
pub const DEFAULT_BASE_URL: &str = "http://data.aishub.net/ws.php";

/// Client for the AISHub webservice.
///
/// Holds an immutable [`ApiConfig`] reused across requests; concurrent
/// callers may share one client, nothing is mutated between calls.
/// Failed calls are never retried here; retry policy belongs to the
/// caller.
pub struct AisHubClient {
    client: Client,
    config: ApiConfig,
    base_url: String,
}

impl AisHubClient {
    /// Create a new client for the production endpoint.
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch the raw (possibly compressed) payload for one query.
    ///
    /// Query validation happens before the request goes out.
    pub async fn fetch_raw(&self, query: &VesselQuery) -> Result<Vec<u8>, ApiError> {
        let params = build_params(&self.config, query)?;

        tracing::debug!("fetching {} ({:?})", self.base_url, query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(ClientError::Request)?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes().await.map_err(ClientError::Request)?;
                Ok(bytes.to_vec())
            }
            status => Err(ClientError::ServerError { status }.into()),
        }
    }

    /// Run one query through the full pipeline: HTTP GET, decompress,
    /// parse into the normalized response.
    ///
    /// A provider-side rejection (bad credentials, rate limit) is a
    /// successful parse with `header.error` set, not an `Err`; check
    /// the header before consuming the records.
    pub async fn fetch(&self, query: &VesselQuery) -> Result<ApiResponse, ApiError> {
        let payload = self.fetch_raw(query).await?;
        let text = codec::decompress(self.config.compress, &payload)?;
        Ok(parser::parse_response(self.config.output, &text)?)
    }

    /// Fetch a single vessel by MMSI.
    pub async fn fetch_by_mmsi(&self, mmsi: u32) -> Result<ApiResponse, ApiError> {
        self.fetch(&VesselQuery::by_mmsi(mmsi)).await
    }

    /// Fetch a single vessel by IMO number.
    pub async fn fetch_by_imo(&self, imo: u32) -> Result<ApiResponse, ApiError> {
        self.fetch(&VesselQuery::by_imo(imo)).await
    }

    /// Fetch every vessel inside a bounding box.
    pub async fn fetch_area(&self, bbox: BoundingBox) -> Result<ApiResponse, ApiError> {
        self.fetch(&VesselQuery::Area(bbox)).await
    }

    /// Fetch every record visible to the account.
    pub async fn fetch_all(&self) -> Result<ApiResponse, ApiError> {
        self.fetch(&VesselQuery::All).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Compress, Format};
    use httpmock::prelude::*;
    use std::io::Write;

    const BODY: &str =
        r#"[{"ERROR":false,"USERNAME":"demo","FORMAT":"AIS","RECORDS":1},[{"MMSI":244660180}]]"#;

    fn test_config() -> ApiConfig {
        ApiConfig::new("demo".to_string()).with_format(Format::Ais)
    }

    fn test_client(server: &MockServer, config: ApiConfig) -> AisHubClient {
        AisHubClient::new(config)
            .unwrap()
            .with_base_url(format!("{}/ws.php", server.base_url()))
    }

    #[tokio::test]
    async fn test_fetch_sends_query_params() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::GET)
                .path("/ws.php")
                .query_param("username", "demo")
                .query_param("format", "0")
                .query_param("output", "json")
                .query_param("compress", "0")
                .query_param("mmsi", "244660180");
            then.status(200).body(BODY);
        });

        let client = test_client(&server, test_config());
        let response = client.fetch_by_mmsi(244660180).await.unwrap();

        mock.assert();
        assert_eq!(response.header.records, 1);
        assert_eq!(response.vessels.len(), 1);
        assert_eq!(response.vessels[0].mmsi(), Some(244660180));
    }

    #[tokio::test]
    async fn test_fetch_gzip_payload() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(BODY.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/ws.php").query_param("compress", "2");
            then.status(200).body(compressed);
        });

        let client = test_client(&server, test_config().with_compress(Compress::Gzip));
        let response = client.fetch_all().await.unwrap();

        assert_eq!(response.vessels.len(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_is_not_an_err() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/ws.php");
            then.status(200).body(
                r#"[{"ERROR":true,"USERNAME":"demo","FORMAT":"AIS","ERROR_MESSAGE":"Invalid username"}]"#,
            );
        });

        let client = test_client(&server, test_config());
        let response = client.fetch_all().await.unwrap();

        assert!(response.header.error);
        assert_eq!(response.header.error_message, "Invalid username");
        assert!(response.vessels.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::GET).path("/ws.php");
            then.status(500);
        });

        let client = test_client(&server, test_config());
        let result = client.fetch_all().await;

        assert!(matches!(
            result,
            Err(ApiError::Client(ClientError::ServerError { status }))
                if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_invalid_query_short_circuits() {
        // No mock server: the query must fail before any request.
        let client = AisHubClient::new(test_config()).unwrap();
        let query = VesselQuery::Vessel {
            mmsi: None,
            imo: None,
        };

        assert!(matches!(
            client.fetch(&query).await,
            Err(ApiError::Query(QueryError::MissingShipId))
        ));
    }
}
