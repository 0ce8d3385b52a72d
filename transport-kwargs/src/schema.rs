//! Signatures derived from typed option structs and declared closures.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{Result, SignatureError};
use crate::kwargs::check_kwargs;
use crate::logger::Logger;
use crate::signature::{Callable, Parameter, ParameterKind, Signature};
use crate::Kwargs;

/// Exposes an options struct as a keyword-only signature.
///
/// Every field that `T::default()` serializes becomes a keyword parameter whose
/// default is the serialized field value. Fields marked `#[serde(skip)]` are not
/// part of the signature, and `#[serde(rename)]` controls the keyword name.
pub struct OptionsSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> OptionsSchema<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for OptionsSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for OptionsSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OptionsSchema").field(&type_name::<T>()).finish()
    }
}

impl<T> Clone for OptionsSchema<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Callable for OptionsSchema<T>
where
    T: Default + Serialize,
{
    fn signature(&self) -> Result<Signature> {
        match serde_json::to_value(T::default())? {
            Value::Object(fields) => Signature::from_parameters(fields.into_iter().map(
                |(name, default)| {
                    Parameter::new(name, ParameterKind::KeywordOnly).with_default(default)
                },
            )),
            other => Err(SignatureError::NotAnObject {
                type_name: type_name::<T>(),
                found: json_kind(&other),
            }),
        }
    }
}

impl<T> OptionsSchema<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    /// Filter `kwargs` to the fields of `T` and build `T` from them.
    ///
    /// Keywords `T` does not declare are dropped with a warning on `logger`;
    /// fields that were not supplied keep their default values.
    pub fn bind<L>(&self, kwargs: &Kwargs, logger: &L) -> Result<T>
    where
        L: Logger + ?Sized,
    {
        let signature = self.signature()?;
        let mut merged = signature.defaults();
        merged.extend(check_kwargs(&signature, kwargs, logger)?);
        Ok(serde_json::from_value(Value::Object(merged))?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A closure paired with the signature it declares.
///
/// The closure receives the already-filtered keyword mapping, so it only ever
/// sees keywords its signature declares.
pub struct Declared<F> {
    signature: Signature,
    function: F,
}

impl<F> Declared<F> {
    pub fn new(signature: Signature, function: F) -> Self {
        Self {
            signature,
            function,
        }
    }

    /// Filter `kwargs` against the declared signature, then invoke the closure
    pub fn call_filtered<R, L>(&self, kwargs: &Kwargs, logger: &L) -> Result<R>
    where
        F: Fn(&Kwargs) -> R + Send + Sync,
        L: Logger + ?Sized,
    {
        let supported = check_kwargs(self, kwargs, logger)?;
        Ok((self.function)(&supported))
    }
}

impl<F> fmt::Debug for Declared<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declared")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl<F: Send + Sync> Callable for Declared<F> {
    fn signature(&self) -> Result<Signature> {
        Ok(self.signature.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kwargs::inspect_kwargs;
    use crate::logger::test_utils::RecordingLogger;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct HttpLikeOptions {
        user: Option<String>,
        timeout: Option<f64>,
        #[serde(rename = "verify")]
        verify_tls: bool,
        #[serde(skip)]
        internal_counter: u32,
    }

    #[test]
    fn test_options_schema_lists_serialized_fields() {
        let defaults = inspect_kwargs(&OptionsSchema::<HttpLikeOptions>::new()).unwrap();

        let mut names: Vec<&str> = defaults.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["timeout", "user", "verify"]);
        assert_eq!(defaults["user"], Value::Null);
        assert_eq!(defaults["verify"], json!(false));
    }

    #[test]
    fn test_options_schema_parameters_are_keyword_only() {
        let signature = OptionsSchema::<HttpLikeOptions>::new().signature().unwrap();
        assert!(signature
            .parameters()
            .iter()
            .all(|param| param.kind == ParameterKind::KeywordOnly));
    }

    #[test]
    fn test_non_object_schema_is_an_error() {
        let err = OptionsSchema::<u32>::new().signature().unwrap_err();
        assert!(matches!(
            err,
            SignatureError::NotAnObject {
                found: "a number",
                ..
            }
        ));
    }

    #[test]
    fn test_bind_merges_defaults_and_drops_unknown() {
        let logger = RecordingLogger::default();
        let kwargs = json!({"user": "alice", "region": "eu-west-1"});
        let Value::Object(kwargs) = kwargs else {
            unreachable!()
        };

        let options = OptionsSchema::<HttpLikeOptions>::new()
            .bind(&kwargs, &logger)
            .unwrap();

        assert_eq!(
            options,
            HttpLikeOptions {
                user: Some("alice".to_string()),
                ..HttpLikeOptions::default()
            }
        );
        assert_eq!(options.internal_counter, 0);
        assert_eq!(
            logger.warnings(),
            vec![r#"ignoring unsupported keyword arguments: ['region']"#.to_string()]
        );
    }

    #[test]
    fn test_bind_surfaces_type_mismatch() {
        let logger = RecordingLogger::default();
        let Value::Object(kwargs) = json!({"timeout": "soon"}) else {
            unreachable!()
        };

        let err = OptionsSchema::<HttpLikeOptions>::new()
            .bind(&kwargs, &logger)
            .unwrap_err();
        assert!(matches!(err, SignatureError::Serialization(_)));
    }

    #[test]
    fn test_bind_builds_default_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static DEFAULTS_BUILT: AtomicUsize = AtomicUsize::new(0);

        #[derive(Debug, Serialize, Deserialize)]
        struct CountedOptions {
            retries: u32,
        }

        impl Default for CountedOptions {
            fn default() -> Self {
                DEFAULTS_BUILT.fetch_add(1, Ordering::SeqCst);
                Self { retries: 3 }
            }
        }

        let logger = RecordingLogger::default();
        let Value::Object(kwargs) = json!({"retries": 5, "verbose": true}) else {
            unreachable!()
        };
        let options = OptionsSchema::<CountedOptions>::new()
            .bind(&kwargs, &logger)
            .unwrap();

        assert_eq!(options.retries, 5);
        assert_eq!(DEFAULTS_BUILT.load(Ordering::SeqCst), 1);
        assert_eq!(logger.warnings().len(), 1);
    }

    #[test]
    fn test_declared_closure_only_sees_supported_keywords() {
        let signature = Signature::builder()
            .required("uri")
            .optional("mode", "rb")
            .build()
            .unwrap();
        let open = Declared::new(signature, |kwargs: &Kwargs| {
            kwargs.keys().cloned().collect::<Vec<_>>()
        });

        let logger = RecordingLogger::default();
        let Value::Object(kwargs) = json!({"mode": "wb", "compression": "gzip"}) else {
            unreachable!()
        };
        let seen = open.call_filtered(&kwargs, &logger).unwrap();

        assert_eq!(seen, vec!["mode".to_string()]);
        assert_eq!(logger.warnings().len(), 1);
        assert!(logger.warnings()[0].contains("compression"));
    }
}
