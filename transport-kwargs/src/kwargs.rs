//! Keyword inspection and filtering
//!
//! This module answers two questions about a [`Callable`]: which keywords
//! does it accept (those declared with a default), and which subset of a
//! proposed keyword mapping should actually be passed to it.

use log::trace;

use crate::errors::Result;
use crate::logger::Logger;
use crate::signature::Callable;
use crate::Kwargs;

/// Supported and unsupported parts of a proposed keyword mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Keywords the callable declares, with their original values
    pub supported: Kwargs,
    /// Keywords the callable does not declare, sorted
    pub unsupported: Vec<String>,
}

/// Map every parameter of `callable` that declares a default to that default.
///
/// Required, positional-without-default and variadic parameters are excluded.
/// The signature is read fresh on every call.
pub fn inspect_kwargs<C>(callable: &C) -> Result<Kwargs>
where
    C: Callable + ?Sized,
{
    Ok(callable.signature()?.defaults())
}

/// Split `kwargs` into the keywords `callable` supports and the ones it doesn't.
pub fn partition_kwargs<C>(callable: &C, kwargs: &Kwargs) -> Result<Partition>
where
    C: Callable + ?Sized,
{
    let supported_keywords = inspect_kwargs(callable)?;
    trace!(
        "Callable supports {} keyword(s): {:?}",
        supported_keywords.len(),
        supported_keywords.keys().collect::<Vec<_>>()
    );

    let mut partition = Partition::default();
    for (key, value) in kwargs {
        if supported_keywords.contains_key(key) {
            partition.supported.insert(key.clone(), value.clone());
        } else {
            partition.unsupported.push(key.clone());
        }
    }
    partition.unsupported.sort();

    Ok(partition)
}

/// Keep only the keywords `callable` supports, warning once about the rest.
///
/// Values are passed through untouched. When at least one keyword is dropped,
/// exactly one warning naming every dropped keyword (sorted) goes to `logger`.
/// Errors from inspecting the callable propagate and nothing is logged.
pub fn check_kwargs<C, L>(callable: &C, kwargs: &Kwargs, logger: &L) -> Result<Kwargs>
where
    C: Callable + ?Sized,
    L: Logger + ?Sized,
{
    let Partition {
        supported,
        unsupported,
    } = partition_kwargs(callable, kwargs)?;

    if !unsupported.is_empty() {
        logger.warn(format_args!(
            "ignoring unsupported keyword arguments: {}",
            quoted_list(&unsupported)
        ));
    }

    Ok(supported)
}

/// Render keys as a single-quoted list, e.g. `['a', 'b']`.
///
/// Keys containing a single quote but no double quote are wrapped in double
/// quotes instead; otherwise quotes and backslashes are escaped.
fn quoted_list(keys: &[String]) -> String {
    let quoted: Vec<String> = keys
        .iter()
        .map(|key| {
            if key.contains('\'') && !key.contains('"') {
                format!("\"{}\"", key.replace('\\', "\\\\"))
            } else {
                format!("'{}'", key.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}
