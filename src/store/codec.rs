//! Versioned binary envelope for trained models.
//!
//! Layout (little-endian):
//!
//! ```text
//! magic     4 bytes  "SCTM"
//! version   u16      format version
//! kind      u8       classifier tag
//! saved_at  i64      milliseconds since the Unix epoch
//! length    u64      payload length
//! checksum  u32      CRC-32 of the payload
//! payload   bincode-encoded classifier
//! ```
//!
//! The payload is the concrete classifier, not the [`Model`] wrapper; the
//! kind byte selects how it is decoded.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};

use crate::classifier::{ClassifierKind, Model, NaiveBayes, PassiveAggressive};
use crate::error::{Result, ScutumError};

/// Envelope magic bytes.
pub const MAGIC: &[u8; 4] = b"SCTM";

/// Current envelope format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the fixed header preceding the payload.
pub const HEADER_LEN: usize = 4 + 2 + 1 + 8 + 8 + 4;

/// Decoded envelope header.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvelopeHeader {
    pub version: u16,
    pub kind: ClassifierKind,
    pub saved_at: DateTime<Utc>,
    pub length: u64,
    pub checksum: u32,
}

/// Encode a model into an envelope stamped with the current time.
pub fn encode(model: &Model) -> Result<Vec<u8>> {
    encode_at(model, Utc::now())
}

/// Encode a model into an envelope stamped with `saved_at`.
pub fn encode_at(model: &Model, saved_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let (kind, payload) = match model {
        Model::NaiveBayes(classifier) => (ClassifierKind::NaiveBayes, bincode::serialize(classifier)?),
        Model::PassiveAggressive(classifier) => {
            (ClassifierKind::PassiveAggressive, bincode::serialize(classifier)?)
        }
    };

    let mut buffer = Vec::with_capacity(HEADER_LEN + payload.len());
    buffer.write_all(MAGIC)?;
    buffer.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    buffer.write_u8(kind.tag())?;
    buffer.write_i64::<LittleEndian>(saved_at.timestamp_millis())?;
    buffer.write_u64::<LittleEndian>(payload.len() as u64)?;
    buffer.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    buffer.write_all(&payload)?;

    Ok(buffer)
}

/// Read and check the fixed header.
pub fn read_header(bytes: &[u8]) -> Result<EnvelopeHeader> {
    if bytes.len() < HEADER_LEN {
        return Err(ScutumError::serialization(format!(
            "model envelope too short: {} bytes",
            bytes.len()
        )));
    }

    let mut cursor = Cursor::new(bytes);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(ScutumError::serialization("not a model envelope: bad magic"));
    }

    let version = cursor.read_u16::<LittleEndian>()?;
    if version == 0 || version > FORMAT_VERSION {
        return Err(ScutumError::serialization(format!(
            "unsupported model format version {version}"
        )));
    }

    let kind = ClassifierKind::from_tag(cursor.read_u8()?)?;
    let millis = cursor.read_i64::<LittleEndian>()?;
    let saved_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        ScutumError::serialization(format!("invalid envelope timestamp {millis}"))
    })?;
    let length = cursor.read_u64::<LittleEndian>()?;
    let checksum = cursor.read_u32::<LittleEndian>()?;

    Ok(EnvelopeHeader {
        version,
        kind,
        saved_at,
        length,
        checksum,
    })
}

/// Decode an envelope back into a model.
pub fn decode(bytes: &[u8]) -> Result<Model> {
    let header = read_header(bytes)?;
    let payload = &bytes[HEADER_LEN..];

    if payload.len() as u64 != header.length {
        return Err(ScutumError::serialization(format!(
            "payload length {} does not match header length {}",
            payload.len(),
            header.length
        )));
    }
    if crc32fast::hash(payload) != header.checksum {
        return Err(ScutumError::serialization("model payload checksum mismatch"));
    }

    let model = match header.kind {
        ClassifierKind::NaiveBayes => {
            Model::NaiveBayes(bincode::deserialize::<NaiveBayes>(payload)?)
        }
        ClassifierKind::PassiveAggressive => {
            Model::PassiveAggressive(bincode::deserialize::<PassiveAggressive>(payload)?)
        }
    };
    Ok(model)
}
