//! Warning sinks for the keyword filter.

use std::fmt;

/// A sink that accepts warning-level messages.
///
/// The filter never configures or owns the logger; callers pass whichever
/// sink they want dropped keywords reported to.
pub trait Logger {
    fn warn(&self, args: fmt::Arguments<'_>);
}

impl<L: Logger + ?Sized> Logger for &L {
    fn warn(&self, args: fmt::Arguments<'_>) {
        (**self).warn(args);
    }
}

/// Forwards warnings to the `log` facade under a named target.
///
/// The target plays the role of a logger name, so output can be routed or
/// silenced per backend with the usual `RUST_LOG` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTarget<'a>(pub &'a str);

impl LogTarget<'static> {
    /// The target used when the caller does not name one
    pub const DEFAULT: Self = Self(env!("CARGO_CRATE_NAME"));
}

impl Default for LogTarget<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Logger for LogTarget<'_> {
    fn warn(&self, args: fmt::Arguments<'_>) {
        log::warn!(target: self.0, "{}", args);
    }
}
