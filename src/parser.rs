//! Response decoders for the three AISHub wire formats.
//!
//! JSON, XML and CSV payloads carry the same information in different
//! shapes; each decoder normalizes its format into one [`ApiResponse`]
//! so callers never branch on the wire encoding.

use crate::query::Output;
use crate::types::{ApiResponse, FieldMap, ResponseHeader, VesselRecord};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed XML payload: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed XML attribute: {0}")]
    XmlAttr(#[from] AttrError),
    #[error("malformed CSV payload: {0}")]
    Csv(#[from] csv::Error),
    #[error("response header is missing required field {0:?}")]
    MissingField(&'static str),
    #[error("malformed response structure: {0}")]
    MalformedStructure(&'static str),
}

/// Decode a response payload according to its declared output format.
///
/// Stateless; the selector picks one of three pure decoders, so parsing
/// the same text twice yields structurally equal responses.
pub fn parse_response(output: Output, text: &str) -> Result<ApiResponse, ParseError> {
    tracing::debug!("parsing {} bytes ({:?})", text.len(), output);

    match output {
        Output::Json => parse_json(text),
        Output::Xml => parse_xml(text),
        Output::Csv => parse_csv(text),
    }
}

/// JSON payloads are a two-element array: the header object, then an
/// optional array of record objects.
fn parse_json(text: &str) -> Result<ApiResponse, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(elements) = value else {
        return Err(ParseError::MalformedStructure(
            "top-level value is not an array",
        ));
    };
    if elements.len() > 2 {
        return Err(ParseError::MalformedStructure(
            "top-level array has more than two elements",
        ));
    }

    let head = elements
        .first()
        .and_then(Value::as_object)
        .ok_or(ParseError::MalformedStructure(
            "first element is not a header object",
        ))?;

    let error = head
        .get("ERROR")
        .and_then(Value::as_bool)
        .ok_or(ParseError::MissingField("ERROR"))?;
    let username = head
        .get("USERNAME")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingField("USERNAME"))?
        .to_string();
    let format = head
        .get("FORMAT")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingField("FORMAT"))?
        .to_string();
    let records = match head.get("RECORDS") {
        Some(value) => record_count(value).ok_or(ParseError::MalformedStructure(
            "RECORDS is not a non-negative integer",
        ))?,
        None => 0,
    };
    let error_message = if error {
        head.get("ERROR_MESSAGE")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingField("ERROR_MESSAGE"))?
            .to_string()
    } else {
        String::new()
    };

    let mut vessels = Vec::new();
    if !error {
        if let Some(body) = elements.get(1) {
            let rows = body.as_array().ok_or(ParseError::MalformedStructure(
                "second element is not a record array",
            ))?;
            for row in rows {
                let fields = row.as_object().ok_or(ParseError::MalformedStructure(
                    "record entry is not an object",
                ))?;
                vessels.push(VesselRecord::new(fields.clone()));
            }
        }
    }

    Ok(ApiResponse {
        header: ResponseHeader {
            error,
            username,
            format,
            records,
            error_message,
        },
        vessels,
    })
}

/// RECORDS arrives as a JSON number or as a numeric string depending on
/// the provider path.
fn record_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// XML payloads carry the header as root attributes. On error the
/// message is the text of the root's first child; otherwise every
/// `vessel` element contributes one record from its attribute set.
fn parse_xml(text: &str) -> Result<ApiResponse, ParseError> {
    let mut reader = Reader::from_str(text);

    let (root, root_is_empty) = loop {
        match reader.read_event()? {
            Event::Start(e) => break (e, false),
            Event::Empty(e) => break (e, true),
            Event::Eof => {
                return Err(ParseError::MalformedStructure(
                    "document has no root element",
                ))
            }
            _ => continue,
        }
    };

    let mut error_attr = None;
    let mut username = String::new();
    let mut format = String::new();
    let mut records = 0u64;

    for attr in root.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"ERROR" => error_attr = Some(value),
            b"USERNAME" => username = value,
            b"FORMAT" => format = value,
            b"RECORDS" => {
                records = value.trim().parse().map_err(|_| {
                    ParseError::MalformedStructure("RECORDS attribute is not a non-negative integer")
                })?;
            }
            _ => {}
        }
    }

    // The provider emits "true"/"false"; anything else reads as no error.
    let error = match error_attr {
        Some(value) => value == "true",
        None => return Err(ParseError::MissingField("ERROR")),
    };

    let mut error_message = String::new();
    let mut vessels = Vec::new();

    if error {
        if root_is_empty {
            return Err(ParseError::MalformedStructure(
                "error response has no message element",
            ));
        }
        error_message = loop {
            match reader.read_event()? {
                Event::Start(child) => {
                    break reader.read_text(child.name())?.trim().to_string()
                }
                Event::Empty(_) => break String::new(),
                Event::End(_) | Event::Eof => {
                    return Err(ParseError::MalformedStructure(
                        "error response has no message element",
                    ))
                }
                _ => continue,
            }
        };
    } else if !root_is_empty {
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"vessel" => {
                    vessels.push(vessel_record(&e)?);
                }
                Event::Eof => break,
                _ => continue,
            }
        }
    }

    Ok(ApiResponse {
        header: ResponseHeader {
            error,
            username,
            format,
            records,
            error_message,
        },
        vessels,
    })
}

fn vessel_record(element: &BytesStart<'_>) -> Result<VesselRecord, ParseError> {
    let mut fields = FieldMap::new();
    for attr in element.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        fields.insert(key, Value::String(value));
    }
    Ok(VesselRecord::new(fields))
}

/// CSV payloads have no native header record; the status header is
/// synthesized. A single data row is the provider's error convention:
/// the lone row carries a human-readable message instead of vessel
/// data. A genuine single-vessel result is indistinguishable from an
/// error under this convention; callers wanting certainty should
/// request JSON or XML output.
fn parse_csv(text: &str) -> Result<ApiResponse, ParseError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for row in reader.records() {
        rows.push(row?);
    }

    if rows.len() == 1 {
        let message = rows[0].iter().collect::<Vec<_>>().join(",");
        return Ok(ApiResponse {
            header: ResponseHeader {
                error: true,
                error_message: message,
                ..ResponseHeader::default()
            },
            vessels: Vec::new(),
        });
    }

    let vessels: Vec<VesselRecord> = rows
        .iter()
        .map(|row| {
            let mut fields = FieldMap::new();
            for (column, cell) in columns.iter().zip(row.iter()) {
                fields.insert(column.clone(), Value::String(cell.to_string()));
            }
            VesselRecord::new(fields)
        })
        .collect();

    Ok(ApiResponse {
        header: ResponseHeader {
            records: vessels.len() as u64,
            ..ResponseHeader::default()
        },
        vessels,
    })
}
