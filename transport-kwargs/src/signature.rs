//! Declared parameter lists for callables.
//!
//! Rust has no runtime reflection over function parameters, so every backend
//! that wants to receive filtered keywords declares its parameter list up
//! front as a [`Signature`]. The [`Callable`] trait is the seam through which
//! the keyword filter reads that declaration.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, SignatureError};
use crate::Kwargs;

/// How a parameter binds to call arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Can only be passed by position.
    PositionalOnly,
    /// Can be passed by position or by name.
    PositionalOrKeyword,
    /// Collects surplus positional arguments (`*args`).
    VarPositional,
    /// Can only be passed by name.
    KeywordOnly,
    /// Collects surplus keyword arguments (`**kwargs`).
    VarKeyword,
}

impl ParameterKind {
    /// Whether this kind collects an arbitrary number of arguments
    pub fn is_variadic(self) -> bool {
        matches!(self, Self::VarPositional | Self::VarKeyword)
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// How the parameter binds
    pub kind: ParameterKind,
    /// Explicit default value, if one was declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Parameter {
    /// Create a parameter without a default
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Attach a default value to this parameter
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether the parameter declares an explicit default
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// An ordered, validated parameter list.
///
/// Parameter names are unique and non-empty, there is at most one parameter of
/// each variadic kind, and variadic parameters never carry defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    /// A signature with no parameters
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a signature
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::default()
    }

    /// Build a signature from parameters, validating the invariants above.
    pub fn from_parameters(parameters: impl IntoIterator<Item = Parameter>) -> Result<Self> {
        let parameters: Vec<Parameter> = parameters.into_iter().collect();
        let mut seen = HashSet::with_capacity(parameters.len());
        let mut has_var_positional = false;
        let mut has_var_keyword = false;

        for param in &parameters {
            if param.name.is_empty() {
                return Err(SignatureError::EmptyParameterName);
            }
            if !seen.insert(param.name.as_str()) {
                return Err(SignatureError::DuplicateParameter(param.name.clone()));
            }
            if param.kind.is_variadic() && param.has_default() {
                return Err(SignatureError::VariadicDefault(param.name.clone()));
            }
            match param.kind {
                ParameterKind::VarPositional if has_var_positional => {
                    return Err(SignatureError::DuplicateVariadic("*args"));
                }
                ParameterKind::VarKeyword if has_var_keyword => {
                    return Err(SignatureError::DuplicateVariadic("**kwargs"));
                }
                ParameterKind::VarPositional => has_var_positional = true,
                ParameterKind::VarKeyword => has_var_keyword = true,
                _ => {}
            }
        }

        Ok(Self { parameters })
    }

    /// All parameters in declaration order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|param| param.name == name)
    }

    /// Names and default values of every parameter that declares a default.
    pub fn defaults(&self) -> Kwargs {
        self.parameters
            .iter()
            .filter_map(|param| {
                param
                    .default
                    .as_ref()
                    .map(|default| (param.name.clone(), default.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Incremental builder for [`Signature`]; validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct SignatureBuilder {
    parameters: Vec<Parameter>,
}

impl SignatureBuilder {
    /// Append an arbitrary parameter
    pub fn param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Append a required positional-or-keyword parameter
    pub fn required(self, name: impl Into<String>) -> Self {
        self.param(Parameter::new(name, ParameterKind::PositionalOrKeyword))
    }

    /// Append a positional-or-keyword parameter with a default
    pub fn optional(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.param(Parameter::new(name, ParameterKind::PositionalOrKeyword).with_default(default))
    }

    /// Append a positional-only parameter, with or without a default
    pub fn positional_only(self, name: impl Into<String>, default: Option<Value>) -> Self {
        let mut param = Parameter::new(name, ParameterKind::PositionalOnly);
        param.default = default;
        self.param(param)
    }

    /// Append a keyword-only parameter with a default
    pub fn keyword_only(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.param(Parameter::new(name, ParameterKind::KeywordOnly).with_default(default))
    }

    /// Append a `*args` parameter
    pub fn var_positional(self, name: impl Into<String>) -> Self {
        self.param(Parameter::new(name, ParameterKind::VarPositional))
    }

    /// Append a `**kwargs` parameter
    pub fn var_keyword(self, name: impl Into<String>) -> Self {
        self.param(Parameter::new(name, ParameterKind::VarKeyword))
    }

    pub fn build(self) -> Result<Signature> {
        Signature::from_parameters(self.parameters)
    }
}

/// Anything whose parameter list can be inspected.
///
/// Implementations must be cheap to call repeatedly: the keyword filter asks
/// for the signature on every call and never caches it.
pub trait Callable: Send + Sync {
    /// Return the declared parameter list
    fn signature(&self) -> Result<Signature>;
}

impl Callable for Signature {
    fn signature(&self) -> Result<Signature> {
        Ok(self.clone())
    }
}

impl<C: Callable + ?Sized> Callable for &C {
    fn signature(&self) -> Result<Signature> {
        (**self).signature()
    }
}

impl<C: Callable + ?Sized> Callable for Box<C> {
    fn signature(&self) -> Result<Signature> {
        (**self).signature()
    }
}

impl<C: Callable + ?Sized> Callable for Arc<C> {
    fn signature(&self) -> Result<Signature> {
        (**self).signature()
    }
}

/// A legacy argument spec: argument names plus a defaults list aligned with
/// the tail of `args`.
///
/// For `args = ["path", "mode", "buffering"]` and `defaults = ["r", -1]`,
/// `mode` defaults to `"r"` and `buffering` to `-1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgSpec {
    pub args: Vec<String>,
    #[serde(default)]
    pub varargs: Option<String>,
    #[serde(default)]
    pub varkw: Option<String>,
    #[serde(default)]
    pub defaults: Vec<Value>,
}

impl ArgSpec {
    /// Convert into a validated [`Signature`]
    pub fn to_signature(&self) -> Result<Signature> {
        if self.defaults.len() > self.args.len() {
            return Err(SignatureError::TooManyDefaults {
                args: self.args.len(),
                defaults: self.defaults.len(),
            });
        }

        let first_defaulted = self.args.len() - self.defaults.len();
        let mut builder = Signature::builder();
        for (index, name) in self.args.iter().enumerate() {
            builder = if index < first_defaulted {
                builder.required(name.as_str())
            } else {
                builder.optional(name.as_str(), self.defaults[index - first_defaulted].clone())
            };
        }
        if let Some(varargs) = &self.varargs {
            builder = builder.var_positional(varargs.as_str());
        }
        if let Some(varkw) = &self.varkw {
            builder = builder.var_keyword(varkw.as_str());
        }
        builder.build()
    }
}

impl Callable for ArgSpec {
    fn signature(&self) -> Result<Signature> {
        self.to_signature()
    }
}
