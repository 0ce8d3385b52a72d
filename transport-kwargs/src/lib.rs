//! Keyword filtering for transport backends.
//!
//! A calling layer that talks to many backends (local files, HTTP, S3, ...)
//! wants to pass one uniform set of options and let each backend take only
//! what it understands. This crate provides that:
//!
//! - [`inspect_kwargs`]: the keywords a [`Callable`] declares, with defaults
//! - [`check_kwargs`]: the subset of a keyword mapping a callable supports,
//!   warning once about everything dropped
//! - [`TransportRegistry`]: resolves a URI to its backend and filters the
//!   transport parameters for it
//!
//! Backends declare their parameters explicitly, either as a [`Signature`],
//! a legacy [`ArgSpec`], or a typed options struct via [`OptionsSchema`].

mod errors;
mod kwargs;
mod logger;
mod registry;
mod schema;
mod signature;
pub mod transports;

/// String-keyed mapping of keyword arguments to arbitrary values
pub type Kwargs = serde_json::Map<String, serde_json::Value>;

pub use errors::{RegistryError, Result, SignatureError};
pub use kwargs::{check_kwargs, inspect_kwargs, partition_kwargs, Partition};
pub use logger::{LogTarget, Logger};
pub use registry::{Resolved, TransportRegistry, FILE_SCHEME};
pub use schema::{Declared, OptionsSchema};
pub use signature::{ArgSpec, Callable, Parameter, ParameterKind, Signature, SignatureBuilder};
