//! Query configuration and request parameter assembly.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("exactly one of mmsi or imo must be set")]
    MissingShipId,
    #[error(
        "bounding box out of range: south={south}, north={north}, west={west}, east={east}"
    )]
    InvalidBoundingBox {
        south: f64,
        north: f64,
        west: f64,
        east: f64,
    },
    #[error("unknown {kind} selector: {value:?}")]
    UnknownSelector { kind: &'static str, value: String },
}

/// Field format of the returned vessel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Raw AIS field values.
    Ais,
    /// Values translated for human consumption.
    #[default]
    HumanReadable,
}

impl Format {
    /// Wire encoding of the `format` query parameter.
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::Ais => 0,
            Self::HumanReadable => 1,
        }
    }
}

impl FromStr for Format {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ais" | "raw" => Ok(Self::Ais),
            "human" | "human-readable" => Ok(Self::HumanReadable),
            _ => Err(QueryError::UnknownSelector {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Wire serialization of the response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Json,
    Xml,
    Csv,
}

impl Output {
    /// Wire encoding of the `output` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for Output {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "csv" => Ok(Self::Csv),
            _ => Err(QueryError::UnknownSelector {
                kind: "output",
                value: s.to_string(),
            }),
        }
    }
}

/// Compression applied to the response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compress {
    #[default]
    None,
    Zip,
    Gzip,
    Bzip2,
}

impl Compress {
    /// Wire encoding of the `compress` query parameter.
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Zip => 1,
            Self::Gzip => 2,
            Self::Bzip2 => 3,
        }
    }
}

impl FromStr for Compress {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "zip" => Ok(Self::Zip),
            "gzip" => Ok(Self::Gzip),
            "bzip2" => Ok(Self::Bzip2),
            _ => Err(QueryError::UnknownSelector {
                kind: "compress",
                value: s.to_string(),
            }),
        }
    }
}

/// Bounding box for geographic queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Global bounding box covering the entire world.
    pub const GLOBAL: Self = Self {
        south: -90.0,
        north: 90.0,
        west: -180.0,
        east: 180.0,
    };

    /// Create a bounding box from coordinates.
    pub const fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Check the box lies within valid latitude/longitude ranges and is
    /// correctly ordered.
    pub fn validate(&self) -> Result<(), QueryError> {
        let ordered = self.south <= self.north && self.west <= self.east;
        let in_range = self.south >= -90.0
            && self.north <= 90.0
            && self.west >= -180.0
            && self.east <= 180.0;

        if ordered && in_range {
            Ok(())
        } else {
            Err(QueryError::InvalidBoundingBox {
                south: self.south,
                north: self.north,
                west: self.west,
                east: self.east,
            })
        }
    }
}

/// Reusable configuration for AISHub requests.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Account username as issued by AISHub
    pub username: String,
    /// Field format of the returned data
    pub format: Format,
    /// Wire serialization of the response
    pub output: Output,
    /// Payload compression
    pub compress: Compress,
    /// Transport timeout
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(username: String) -> Self {
        Self {
            username,
            format: Format::default(),
            output: Output::default(),
            compress: Compress::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub fn with_compress(mut self, compress: Compress) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One query against the vessel database.
#[derive(Debug, Clone, PartialEq)]
pub enum VesselQuery {
    /// Single vessel by MMSI or IMO number; exactly one must be set.
    Vessel { mmsi: Option<u32>, imo: Option<u32> },
    /// Every vessel inside a geographic bounding box.
    Area(BoundingBox),
    /// Every record visible to the account.
    All,
}

impl VesselQuery {
    pub const fn by_mmsi(mmsi: u32) -> Self {
        Self::Vessel {
            mmsi: Some(mmsi),
            imo: None,
        }
    }

    pub const fn by_imo(imo: u32) -> Self {
        Self::Vessel {
            mmsi: None,
            imo: Some(imo),
        }
    }
}

/// Assemble the flat query parameter set for one request.
///
/// Validation happens here, before any network interaction; an invalid
/// query never produces a parameter set.
pub fn build_params(
    config: &ApiConfig,
    query: &VesselQuery,
) -> Result<Vec<(String, String)>, QueryError> {
    let mut params = vec![
        ("username".to_string(), config.username.clone()),
        ("format".to_string(), config.format.wire_value().to_string()),
        ("output".to_string(), config.output.as_str().to_string()),
        (
            "compress".to_string(),
            config.compress.wire_value().to_string(),
        ),
    ];

    match query {
        VesselQuery::Vessel { mmsi, imo } => match (mmsi, imo) {
            (Some(mmsi), None) => params.push(("mmsi".to_string(), mmsi.to_string())),
            (None, Some(imo)) => params.push(("imo".to_string(), imo.to_string())),
            _ => return Err(QueryError::MissingShipId),
        },
        VesselQuery::Area(bbox) => {
            bbox.validate()?;
            params.push(("latmin".to_string(), bbox.south.to_string()));
            params.push(("latmax".to_string(), bbox.north.to_string()));
            params.push(("lonmin".to_string(), bbox.west.to_string()));
            params.push(("lonmax".to_string(), bbox.east.to_string()));
        }
        VesselQuery::All => {}
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ApiConfig {
        ApiConfig::new("demo".to_string())
            .with_format(Format::Ais)
            .with_output(Output::Xml)
            .with_compress(Compress::Gzip)
    }

    fn keys(params: &[(String, String)]) -> Vec<&str> {
        params.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_all_records_params() {
        let params = build_params(&test_config(), &VesselQuery::All).unwrap();
        assert_eq!(keys(&params), ["username", "format", "output", "compress"]);
        assert_eq!(params[0].1, "demo");
        assert_eq!(params[1].1, "0");
        assert_eq!(params[2].1, "xml");
        assert_eq!(params[3].1, "2");
    }

    #[test]
    fn test_vessel_by_mmsi_params() {
        let params = build_params(&test_config(), &VesselQuery::by_mmsi(244_660_180)).unwrap();
        assert_eq!(
            keys(&params),
            ["username", "format", "output", "compress", "mmsi"]
        );
        assert_eq!(params[4].1, "244660180");
    }

    #[test]
    fn test_vessel_by_imo_params() {
        let params = build_params(&test_config(), &VesselQuery::by_imo(9_074_729)).unwrap();
        assert_eq!(params[4], ("imo".to_string(), "9074729".to_string()));
    }

    #[test]
    fn test_vessel_without_id_rejected() {
        let query = VesselQuery::Vessel {
            mmsi: None,
            imo: None,
        };
        assert!(matches!(
            build_params(&test_config(), &query),
            Err(QueryError::MissingShipId)
        ));
    }

    #[test]
    fn test_vessel_with_both_ids_rejected() {
        let query = VesselQuery::Vessel {
            mmsi: Some(244_660_180),
            imo: Some(9_074_729),
        };
        assert!(matches!(
            build_params(&test_config(), &query),
            Err(QueryError::MissingShipId)
        ));
    }

    #[test]
    fn test_global_area_params() {
        let params =
            build_params(&test_config(), &VesselQuery::Area(BoundingBox::GLOBAL)).unwrap();
        assert_eq!(
            keys(&params),
            ["username", "format", "output", "compress", "latmin", "latmax", "lonmin", "lonmax"]
        );
        assert_eq!(params[4].1, "-90");
        assert_eq!(params[5].1, "90");
        assert_eq!(params[6].1, "-180");
        assert_eq!(params[7].1, "180");
    }

    #[test]
    fn test_out_of_range_box_rejected() {
        let bbox = BoundingBox::new(95.0, 95.0, 0.0, 10.0);
        assert!(matches!(
            build_params(&test_config(), &VesselQuery::Area(bbox)),
            Err(QueryError::InvalidBoundingBox { south, .. }) if south == 95.0
        ));
    }

    #[test]
    fn test_inverted_box_rejected() {
        let bbox = BoundingBox::new(10.0, -10.0, 0.0, 10.0);
        assert!(bbox.validate().is_err());
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("ais".parse::<Format>().unwrap(), Format::Ais);
        assert_eq!("human".parse::<Format>().unwrap(), Format::HumanReadable);
        assert_eq!("csv".parse::<Output>().unwrap(), Output::Csv);
        assert_eq!("bzip2".parse::<Compress>().unwrap(), Compress::Bzip2);
        assert!(matches!(
            "brotli".parse::<Compress>(),
            Err(QueryError::UnknownSelector { kind: "compress", .. })
        ));
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(Format::Ais.wire_value(), 0);
        assert_eq!(Format::HumanReadable.wire_value(), 1);
        assert_eq!(Output::Json.as_str(), "json");
        assert_eq!(Compress::None.wire_value(), 0);
        assert_eq!(Compress::Bzip2.wire_value(), 3);
    }
}
