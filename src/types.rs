//! Normalized response model shared by all three wire formats.

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered field map backing one vessel record.
pub type FieldMap = Map<String, Value>;

/// Response status header.
///
/// The CSV format carries no native header; `username` and `format` are
/// synthesized empty there.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseHeader {
    /// True when the provider rejected the request (bad credentials,
    /// rate limit, malformed query).
    pub error: bool,
    /// Username echoed back by the provider.
    pub username: String,
    /// Declared field format of the payload.
    pub format: String,
    /// Number of vessel records in the payload. Meaningless when
    /// `error` is true.
    pub records: u64,
    /// Provider-supplied failure description; empty unless `error`.
    pub error_message: String,
}

/// One vessel's provider-defined fields, in wire order.
///
/// The column set varies by output format and field format, so records
/// are dynamic maps rather than a fixed struct. Accessors for the
/// well-known columns tolerate both numeric and string cell values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VesselRecord {
    pub fields: FieldMap,
}

impl VesselRecord {
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }

    /// Look up a field by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn mmsi(&self) -> Option<u32> {
        self.get_f64("MMSI").map(|v| v as u32)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("NAME")
    }

    pub fn callsign(&self) -> Option<&str> {
        self.get_str("CALLSIGN")
    }

    /// Latitude as reported: decimal degrees in human-readable format,
    /// raw AIS units otherwise.
    pub fn latitude(&self) -> Option<f64> {
        self.get_f64("LATITUDE")
    }

    /// Longitude as reported; see [`VesselRecord::latitude`].
    pub fn longitude(&self) -> Option<f64> {
        self.get_f64("LONGITUDE")
    }

    pub fn destination(&self) -> Option<&str> {
        self.get_str("DEST")
    }
}

/// A fully parsed provider response: status header plus zero or more
/// vessel records.
///
/// The vessel list is empty whenever `header.error` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiResponse {
    pub header: ResponseHeader,
    pub vessels: Vec<VesselRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> VesselRecord {
        match value {
            Value::Object(fields) => VesselRecord::new(fields),
            _ => panic!("record fixture must be an object"),
        }
    }

    #[test]
    fn test_accessors_accept_numbers_and_strings() {
        let numeric = record(json!({"MMSI": 244660180, "LATITUDE": 52.37, "NAME": "ALPHA"}));
        assert_eq!(numeric.mmsi(), Some(244660180));
        assert_eq!(numeric.latitude(), Some(52.37));
        assert_eq!(numeric.name(), Some("ALPHA"));

        let stringly = record(json!({"MMSI": "244660180", "LATITUDE": "52.37"}));
        assert_eq!(stringly.mmsi(), Some(244660180));
        assert_eq!(stringly.latitude(), Some(52.37));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let rec = record(json!({"MMSI": 1}));
        assert_eq!(rec.name(), None);
        assert_eq!(rec.longitude(), None);
        assert_eq!(rec.destination(), None);
    }

    #[test]
    fn test_field_order_preserved() {
        let rec = record(json!({"MMSI": 1, "NAME": "A", "DEST": "ROTTERDAM"}));
        let columns: Vec<&str> = rec.fields.keys().map(String::as_str).collect();
        assert_eq!(columns, ["MMSI", "NAME", "DEST"]);
    }
}
