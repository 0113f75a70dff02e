use lazy_static::lazy_static;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

lazy_static! {
    static ref COUNTER: AtomicU32 = AtomicU32::new(rand::random::<u32>());
}

const OBJECT_ID_HEX_LEN: usize = 24;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordIdError {
    #[error("Record id is empty")]
    Empty,
    #[error("Invalid record id format: {0}")]
    Malformed(String),
}

/// Key of a persisted document. Ids minted here are 12-byte object ids
/// (timestamp, random, counter); ids coming back from callers may also be
/// arbitrary strings, which are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    ObjectId([u8; 12]),
    Raw(String),
}

impl RecordId {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        let seconds = chrono::Utc::now().timestamp() as u32;
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&rand::random::<[u8; 5]>());
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
        RecordId::ObjectId(bytes)
    }

    /// 24 hex characters decode as an object id. 24 characters that are not
    /// hex are rejected. Anything else is taken as-is, whitespace included.
    pub fn parse(raw: &str) -> Result<Self, RecordIdError> {
        if raw.trim().is_empty() {
            return Err(RecordIdError::Empty);
        }
        if raw.chars().count() != OBJECT_ID_HEX_LEN {
            return Ok(RecordId::Raw(raw.to_string()));
        }

        let decoded = hex::decode(raw).map_err(|_| RecordIdError::Malformed(raw.to_string()))?;
        let mut bytes = [0u8; 12];
        bytes.copy_from_slice(&decoded);
        Ok(RecordId::ObjectId(bytes))
    }

    pub fn is_object_id(&self) -> bool {
        matches!(self, RecordId::ObjectId(_))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::ObjectId(bytes) => write!(f, "{}", hex::encode(bytes)),
            RecordId::Raw(raw) => write!(f, "{}", raw),
        }
    }
}
