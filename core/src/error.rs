use hyper::StatusCode;
use thiserror::Error;

use crate::field::FieldType;

/// Failure of a single bind operation. Always caused by the client's input,
/// so it is mapped to `400 Bad Request` by the response layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("required parameter '{field}' is not present")]
    MissingParameter { field: String },

    #[error("parameter '{field}' could not be converted to {expected}: {raw:?}")]
    TypeConversion {
        field: String,
        raw: String,
        expected: FieldType,
    },
}

impl BindingError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            BindingError::MissingParameter { field } => field,
            BindingError::TypeConversion { field, .. } => field,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
