use std::{
    error::Error,
    fmt::{self, Display},
};

/// Raised when loading a persisted snapshot payload that is structurally
/// invalid. Live in-memory snapshot restore never fails.
#[derive(Debug)]
pub enum SnapshotError {
    MalformedPayload(String),
}

impl Error for SnapshotError {}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::MalformedPayload(msg) => {
                write!(f, "Malformed snapshot payload: {}", msg)
            }
        }
    }
}

#[derive(Debug)]
pub enum SvgExportError {
    EmptyDocument,
}

impl Error for SvgExportError {}

impl Display for SvgExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgExportError::EmptyDocument => write!(f, "Nothing visible to export"),
        }
    }
}
