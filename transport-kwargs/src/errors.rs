//! Error types for signature inspection and transport resolution.

use thiserror::Error;

/// Errors that can occur while building or inspecting a signature.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// A parameter name was declared twice.
    #[error("duplicate parameter name: {0}")]
    DuplicateParameter(String),

    /// A parameter was declared with an empty name.
    #[error("parameter name must not be empty")]
    EmptyParameterName,

    /// More than one `*args` or more than one `**kwargs` parameter was declared.
    #[error("signature declares more than one {0} parameter")]
    DuplicateVariadic(&'static str),

    /// A variadic parameter was given a default value.
    #[error("variadic parameter '{0}' cannot have a default value")]
    VariadicDefault(String),

    /// A legacy argument spec carries more defaults than arguments.
    #[error("argument spec has {defaults} defaults but only {args} arguments")]
    TooManyDefaults { args: usize, defaults: usize },

    /// An options schema did not serialize to a JSON object.
    #[error("options schema for {type_name} must serialize to an object, got {found}")]
    NotAnObject {
        type_name: &'static str,
        found: &'static str,
    },

    /// An options schema failed to serialize.
    #[error("failed to serialize options schema: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that can occur while resolving a URI to a transport backend.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No backend is registered for the URI's scheme.
    #[error("no transport registered for scheme '{scheme}' (uri: {uri})")]
    UnknownScheme { scheme: String, uri: String },

    /// The URI could not be parsed.
    #[error("invalid uri '{uri}': {source}")]
    InvalidUri {
        uri: String,
        source: url::ParseError,
    },

    /// The resolved backend's signature could not be inspected.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Result type alias for signature operations.
pub type Result<T, E = SignatureError> = std::result::Result<T, E>;
