use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::assemble::AssemblerState;

pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("malformed assignment: {line}")]
    MalformedAssignment { line: String },

    #[error("malformed array literal ({reason}): {literal}")]
    MalformedArrayLiteral { literal: String, reason: String },

    #[error("invalid number for {field}: '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("{field} appeared before {requires} was set")]
    OutOfOrderInput {
        field: String,
        requires: &'static str,
    },

    #[error("could not resolve include '{name}'")]
    UnresolvedInclude {
        name: String,
        line: String,
        #[source]
        source: io::Error,
    },

    #[error("metrics ended before required field {field} was set")]
    IncompleteRecord { field: &'static str },

    #[error("cannot feed a session in state {state:?}")]
    SessionClosed { state: AssemblerState },

    #[error("failed to open metrics file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read metrics source")]
    Io(#[from] io::Error),
}

impl MetricsError {
    pub(crate) fn malformed_array(literal: &str, reason: impl Into<String>) -> Self {
        MetricsError::MalformedArrayLiteral {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }
}
