use std::{
    error::Error,
    fmt::{self, Debug, Display, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, OnceLock,
    },
};

use tracing::trace;

use crate::{
    format::{Indented, GROUP_SEPARATOR, MULTILINE_INDENT, MULTILINE_PREFIX, MULTILINE_SEPARATOR},
    SharedError,
};

/// Append-only backing slots shared by every header grown from the same allocation.
///
/// A slot is written at most once. Headers only read slots below their own length, so a slot
/// written by the fast append path is invisible to the header it was grown from.
struct Storage {
    slots: Box<[OnceLock<SharedError>]>,
}

impl Storage {
    /// Fills new storage from `errors`, leaving room for at least `capacity` elements in total.
    fn filled(
        errors: impl IntoIterator<Item = SharedError>,
        capacity: usize,
    ) -> (Arc<Self>, usize) {
        let mut slots: Vec<OnceLock<SharedError>> = Vec::with_capacity(capacity);
        slots.extend(errors.into_iter().map(OnceLock::from));
        let len = slots.len();
        slots.resize_with(capacity.max(len), OnceLock::new);

        (Arc::new(Storage { slots: slots.into_boxed_slice() }), len)
    }
}

/// An error which holds one or more other errors.
///
/// A `MultiError` is always flat: none of its elements is itself a `MultiError`. They are only
/// ever produced by [`combine`] and [`append`], which return a single error unchanged rather than
/// wrapping it, so in practice a `MultiError` always holds at least two errors.
///
/// [`combine`]: crate::combine
/// [`append`]: crate::append
///
/// # Formatting
///
/// The [`Display`] implementation joins the elements with `"; "`. The alternate form (`{:#}`)
/// produces a more readable multi-line listing, rendering each element in its alternate form too.
///
/// ```
/// # use multierror::{combine, shared};
/// # use std::io;
/// let err = combine(&[
///     Some(shared(io::Error::other("disk full"))),
///     Some(shared(io::Error::other("connection reset"))),
/// ]).unwrap();
///
/// assert_eq!(err.to_string(), "disk full; connection reset");
/// assert_eq!(
///     format!("{err:#}"),
///     "the following errors occurred:\n -  disk full\n -  connection reset",
/// );
/// ```
#[derive(thiserror::Error)]
pub struct MultiError {
    /// Claimed by the first append which grows this header's storage in place.
    copy_needed: AtomicBool,
    storage: Arc<Storage>,
    len: usize,
}

impl MultiError {
    /// Builds a `MultiError` from errors which are already known to be present and flat.
    pub(crate) fn from_flat(errors: impl IntoIterator<Item = SharedError>, capacity: usize) -> Self {
        let (storage, len) = Storage::filled(errors, capacity);
        MultiError { copy_needed: AtomicBool::new(false), storage, len }
    }

    /// Returns `self` with `error` appended, as a new header.
    ///
    /// Only the first caller to claim this header's `copy_needed` flag may grow the storage in
    /// place. Returns `None` if the flag was already claimed, in which case the caller must fall
    /// back to copying.
    pub(crate) fn try_extend(&self, error: SharedError) -> Option<Self> {
        if self.copy_needed.swap(true, Ordering::AcqRel) {
            trace!(len = self.len, "aggregate already extended, falling back to copy");
            return None;
        }

        let error = match self.storage.slots.get(self.len) {
            Some(slot) => match slot.set(error) {
                Ok(()) => {
                    return Some(MultiError {
                        copy_needed: AtomicBool::new(false),
                        storage: Arc::clone(&self.storage),
                        len: self.len + 1,
                    });
                }
                // Unreachable: each (storage, len) pair has a single header, and only the winner
                // of that header's flag writes here. Copying keeps it safe regardless.
                Err(error) => error,
            },
            None => error,
        };

        let capacity = (self.len + 1) * 2;
        trace!(len = self.len, capacity, "aggregate storage exhausted, regrowing");
        Some(MultiError::from_flat(self.iter().cloned().chain([error]), capacity))
    }

    /// The number of errors in this `MultiError`.
    ///
    /// ```
    /// # use multierror::{combine, shared, MultiError};
    /// # use std::io;
    /// let err = combine(&[
    ///     Some(shared(io::Error::other("a"))),
    ///     None,
    ///     Some(shared(io::Error::other("b"))),
    /// ]).unwrap();
    ///
    /// let group = err.downcast_ref::<MultiError>().unwrap();
    /// assert_eq!(group.len(), 2);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if this `MultiError` holds no errors.
    ///
    /// This cannot happen for values produced by this crate, but is handled throughout anyway.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the errors in the order they were combined.
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: self.storage.slots[..self.len].iter() }
    }

    /// Copies the list of errors out of this `MultiError`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<SharedError> {
        self.iter().cloned().collect()
    }

    /// Returns `true` if any of the errors is `target`, or has `target` somewhere in its chain of
    /// sources. See [`is`](crate::is).
    #[must_use]
    pub fn contains<T: Error + 'static>(&self, target: &T) -> bool {
        self.iter().any(|error| crate::is(&**error, target))
    }

    /// Returns the first error of type `T` found in any of the errors or their chains of sources.
    /// See [`find`](crate::find).
    #[must_use]
    pub fn find<T: Error + 'static>(&self) -> Option<&T> {
        self.iter().find_map(|error| crate::find::<T>(&**error))
    }

    fn write_singleline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(GROUP_SEPARATOR)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }

    fn write_multiline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MULTILINE_PREFIX)?;
        for error in self {
            f.write_str(MULTILINE_SEPARATOR)?;
            write!(Indented::new(&mut *f, MULTILINE_INDENT), "{error:#}")?;
        }
        Ok(())
    }
}

impl Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.write_multiline(f)
        } else {
            self.write_singleline(f)
        }
    }
}

impl Debug for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a MultiError {
    type Item = &'a SharedError;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the errors of a [`MultiError`], created by [`MultiError::iter`].
pub struct Iter<'a> {
    slots: std::slice::Iter<'a, OnceLock<SharedError>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a SharedError;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next().and_then(OnceLock::get)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
