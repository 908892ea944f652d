#![doc = include_str!("../README.md")]

use std::{error::Error, sync::Arc};

mod chain;
pub use chain::*;

mod collector;
pub use collector::*;

mod format;

mod group;
pub use group::*;

mod merge;
pub use merge::*;

/// A reference-counted error, the currency of this crate.
///
/// Cloning a `SharedError` keeps pointing at the same error, which is what lets [`is`] recognize
/// an error again after it has been combined with others.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;
