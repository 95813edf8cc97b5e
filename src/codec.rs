//! Payload decompression for the supported compression modes.

use crate::query::Compress;
use std::io::{Cursor, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed zip archive: {0}")]
    MalformedArchive(#[from] zip::result::ZipError),
    #[error("decompression failed: {0}")]
    DecompressionFailed(#[from] std::io::Error),
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Decompress a raw response payload into text.
///
/// Pure function of the selector and the input bytes. Zip payloads are
/// single-entry archives; the first entry is extracted. An archive that
/// cannot be opened or contains no entries is [`CodecError::MalformedArchive`].
pub fn decompress(compress: Compress, bytes: &[u8]) -> Result<String, CodecError> {
    tracing::debug!("decompressing {} bytes ({:?})", bytes.len(), compress);

    match compress {
        Compress::None => Ok(String::from_utf8(bytes.to_vec())?),
        Compress::Zip => {
            let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
            let mut entry = archive.by_index(0)?;
            let mut text = String::new();
            entry.read_to_string(&mut text)?;
            Ok(text)
        }
        Compress::Gzip => {
            let mut text = String::new();
            flate2::read::GzDecoder::new(bytes).read_to_string(&mut text)?;
            Ok(text)
        }
        Compress::Bzip2 => {
            let mut text = String::new();
            bzip2::read::BzDecoder::new(bytes).read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
