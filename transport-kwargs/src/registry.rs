//! URI scheme to transport backend resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use url::Url;

use crate::errors::RegistryError;
use crate::kwargs::check_kwargs;
use crate::logger::Logger;
use crate::schema::OptionsSchema;
use crate::signature::{Callable, Signature};
use crate::transports::{HttpOptions, S3Options, WebHdfsOptions};
use crate::Kwargs;

/// Scheme used for paths that carry no scheme of their own
pub const FILE_SCHEME: &str = "file";

/// A backend resolved from a URI
#[derive(Clone)]
pub struct Resolved {
    pub scheme: String,
    pub backend: Arc<dyn Callable>,
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

/// Maps URI schemes to the backends that handle them.
///
/// Callers hand the registry one uniform set of transport parameters; the
/// registry narrows it to whatever the resolved backend declares.
#[derive(Clone, Default)]
pub struct TransportRegistry {
    backends: HashMap<String, Arc<dyn Callable>>,
}

impl TransportRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in transports.
    ///
    /// | scheme                    | backend               |
    /// |---------------------------|-----------------------|
    /// | `file`                    | no keyword parameters |
    /// | `http`, `https`           | [`HttpOptions`]       |
    /// | `s3`, `s3a`, `s3n`, `s3u` | [`S3Options`]         |
    /// | `webhdfs`                 | [`WebHdfsOptions`]    |
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FILE_SCHEME, Signature::empty());

        let http = Arc::new(OptionsSchema::<HttpOptions>::new());
        registry.register_shared("http", http.clone());
        registry.register_shared("https", http);

        let s3 = Arc::new(OptionsSchema::<S3Options>::new());
        for scheme in ["s3", "s3a", "s3n", "s3u"] {
            registry.register_shared(scheme, s3.clone());
        }

        registry.register("webhdfs", OptionsSchema::<WebHdfsOptions>::new());
        registry
    }

    /// Register `backend` for `scheme`, replacing any previous backend
    pub fn register<C>(&mut self, scheme: &str, backend: C)
    where
        C: Callable + 'static,
    {
        self.register_shared(scheme, Arc::new(backend));
    }

    /// Register an already shared backend for `scheme`
    pub fn register_shared(&mut self, scheme: &str, backend: Arc<dyn Callable>) {
        let scheme = scheme.to_ascii_lowercase();
        if self.backends.insert(scheme.clone(), backend).is_some() {
            debug!("Replaced transport backend for scheme '{}'", scheme);
        } else {
            debug!("Registered transport backend for scheme '{}'", scheme);
        }
    }

    /// Registered schemes, sorted
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Look up the backend for a bare scheme name
    pub fn get(&self, scheme: &str) -> Option<Arc<dyn Callable>> {
        self.backends.get(&scheme.to_ascii_lowercase()).cloned()
    }

    /// Resolve `uri` to the backend registered for its scheme.
    ///
    /// Paths without a scheme and Windows drive paths (`C:\...`) resolve to
    /// [`FILE_SCHEME`].
    pub fn resolve(&self, uri: &str) -> Result<Resolved, RegistryError> {
        let scheme = uri_scheme(uri)?;
        let backend = self
            .backends
            .get(&scheme)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownScheme {
                scheme: scheme.clone(),
                uri: uri.to_string(),
            })?;
        debug!("Resolved '{}' to transport scheme '{}'", uri, scheme);
        Ok(Resolved { scheme, backend })
    }

    /// Narrow `params` to the keywords the backend for `uri` declares.
    ///
    /// Dropped keywords are reported once on `logger`.
    pub fn transport_params<L>(
        &self,
        uri: &str,
        params: &Kwargs,
        logger: &L,
    ) -> Result<Kwargs, RegistryError>
    where
        L: Logger + ?Sized,
    {
        let resolved = self.resolve(uri)?;
        Ok(check_kwargs(resolved.backend.as_ref(), params, logger)?)
    }
}

impl fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

fn uri_scheme(uri: &str) -> Result<String, RegistryError> {
    match Url::parse(uri) {
        // Drive letters parse as one-character schemes.
        Ok(url) if url.scheme().len() == 1 => Ok(FILE_SCHEME.to_string()),
        Ok(url) => Ok(url.scheme().to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(FILE_SCHEME.to_string()),
        Err(err) => Err(RegistryError::InvalidUri {
            uri: uri.to_string(),
            source: err,
        }),
    }
}
