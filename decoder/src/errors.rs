use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed input at offset {offset}: {reason}")]
    MalformedInput { offset: usize, reason: String },

    #[error("unsupported map version {version}")]
    UnsupportedMapVersion { version: u8 },

    #[error("unsupported map kind {kind}")]
    UnsupportedMapKind { kind: u8 },

    #[error("could not decompress payload (bound {bound} bytes): {reason}")]
    DecompressionFailure { bound: usize, reason: String },

    #[error("room record {index} truncated reading {field} at offset {offset} (need {need} bytes, have {have})")]
    TruncatedRoomRecord {
        index: usize,
        field: &'static str,
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("invalid coordinate: {reason}")]
    InvalidCoordinate { reason: String },
}

impl Error {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            offset,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
