use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("truncated input at byte {at}, need {needed} more bytes")]
    Truncated { at: u64, needed: usize },

    #[error("bit width {0} out of range 1..=32")]
    InvalidBitWidth(u32),

    #[error("missing required header field: {0}")]
    MissingKey(&'static str),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid offset/length for {field}")]
    InvalidRange { field: &'static str },

    #[error("ASCII header has no end marker")]
    UnterminatedHeader,

    #[error("unknown station record type: {0}")]
    UnknownRecordType(u32),

    #[error("station records are not decodable in format revision {major}.{minor}")]
    UnsupportedRevision { major: u32, minor: u32 },
}
