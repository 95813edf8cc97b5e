//! Client library for the AISHub vessel-tracking webservice.
//!
//! This library provides functionality to:
//! - Build validated query parameter sets (single vessel, bounding box,
//!   or all records)
//! - Fetch the raw payload over HTTP
//! - Decompress zip/gzip/bzip2 payloads
//! - Normalize the JSON, XML and CSV wire formats into one response shape
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Client    │───▶│    Codec    │───▶│   Parser    │
//! │ (HTTP GET)  │    │ (zip/gz/bz2)│    │(json/xml/csv)│
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                                     │
//!        │                                     ▼
//! ┌─────────────┐                      ┌─────────────┐
//! │    Query    │                      │ ApiResponse │
//! │  (params)   │                      │ (normalized)│
//! └─────────────┘                      └─────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use aishub::{AisHubClient, ApiConfig, Compress, Output};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::new("my-username".to_string())
//!         .with_output(Output::Json)
//!         .with_compress(Compress::Gzip);
//!
//!     let client = AisHubClient::new(config)?;
//!     let response = client.fetch_by_mmsi(244660180).await?;
//!
//!     // Provider rejections arrive as data, not as errors.
//!     if response.header.error {
//!         eprintln!("request rejected: {}", response.header.error_message);
//!         return Ok(());
//!     }
//!
//!     for vessel in &response.vessels {
//!         println!("{:?} at {:?},{:?}", vessel.name(), vessel.latitude(), vessel.longitude());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod parser;
pub mod query;
pub mod types;

pub use client::{AisHubClient, ApiError, ClientError};
pub use codec::CodecError;
pub use parser::{parse_response, ParseError};
pub use query::{
    build_params, ApiConfig, BoundingBox, Compress, Format, Output, QueryError, VesselQuery,
};
pub use types::{ApiResponse, FieldMap, ResponseHeader, VesselRecord};
