use thiserror::Error;

use crate::WireType;

/// Errors that can occur while encoding or decoding wire values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The buffer ended before the value was complete
    #[error("Unexpected end of buffer: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A bool was encoded as something other than 0 or 1
    #[error("Invalid bool byte {byte}, expected 0 or 1")]
    InvalidBool { byte: u8 },

    /// A string payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// A type tag outside the registered wire type set
    #[error("Unsupported wire type tag {tag}. Only the built-in wire types can be encoded")]
    UnsupportedType { tag: u8 },

    /// A value did not match the type it was declared as
    #[error("Wire type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: WireType, actual: WireType },

    /// A string or array is too long for a 32-bit length prefix
    #[error("Length {length} does not fit in a 32-bit length prefix")]
    LengthOverflow { length: usize },
}
