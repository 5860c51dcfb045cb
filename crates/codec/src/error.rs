use thiserror::Error;

/// Errors raised while converting node responses or decoding transactions.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A hex encoded field could not be decoded
    #[error("invalid hex in `{field}`: {source}")]
    Hex {
        /// Field name
        field: &'static str,
        /// Underlying error
        source: hex::FromHexError,
    },
    /// A base64 encoded field could not be decoded
    #[error("invalid base64 in `{field}`: {source}")]
    Base64 {
        /// Field name
        field: &'static str,
        /// Underlying error
        source: base64::DecodeError,
    },
    /// An enum discriminant is not known
    #[error("unknown {kind} value {value}")]
    UnknownEnum {
        /// Enum name
        kind: &'static str,
        /// Offending value
        value: i32,
    },
    /// An evidence or public key type tag is not supported
    #[error("unsupported {kind} type {type_tag:?}")]
    UnsupportedType {
        /// What was being decoded
        kind: &'static str,
        /// Type tag found in the JSON
        type_tag: String,
    },
    /// A required message field is absent
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A fee amount is not a valid unsigned integer
    #[error("invalid fee amount {0:?}")]
    InvalidAmount(String),
    /// Protobuf decoding failed
    #[error(transparent)]
    Decode(#[from] prost::DecodeError),
}
