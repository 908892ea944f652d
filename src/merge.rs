use std::{error::Error, sync::Arc};

use crate::{MultiError, SharedError};

/// Wraps an error into a [`SharedError`], ready to be combined.
///
/// ```
/// # use multierror::shared;
/// # use std::io;
/// let err = shared(io::Error::other("oh no!"));
/// assert_eq!(err.to_string(), "oh no!");
/// ```
pub fn shared<E: Error + Send + Sync + 'static>(error: E) -> SharedError {
    Arc::new(error)
}

/// Combines a list of errors into a single error, skipping any which are `None`.
///
/// - If there are no errors, returns `None`.
/// - If there is exactly one error, it is returned unchanged, without being wrapped.
/// - Otherwise, returns a [`MultiError`] holding every error in order. Errors which are already a
///   `MultiError` contribute their own elements in place, so the result is never nested.
///
/// ```
/// # use multierror::{combine, shared, MultiError};
/// # use std::{io, sync::Arc};
/// let a = shared(io::Error::other("a"));
/// let b = shared(io::Error::other("b"));
/// let c = shared(io::Error::other("c"));
///
/// assert!(combine(&[]).is_none());
/// assert!(combine(&[None, None]).is_none());
///
/// // A single error is passed through as-is
/// let single = combine(&[None, Some(a.clone()), None]).unwrap();
/// assert!(Arc::ptr_eq(&single, &a));
///
/// // Aggregates are flattened
/// let ab = combine(&[Some(a), Some(b)]);
/// let abc = combine(&[ab, Some(c)]).unwrap();
/// let group = abc.downcast_ref::<MultiError>().unwrap();
/// assert_eq!(group.len(), 3);
/// assert_eq!(abc.to_string(), "a; b; c");
/// ```
#[must_use]
pub fn combine(errors: &[Option<SharedError>]) -> Option<SharedError> {
    let inspection = Inspection::of(errors);
    match inspection.count {
        0 => return None,
        1 => return errors[inspection.first].clone(),
        count if count == errors.len() && !inspection.contains_group => {
            // Already flat, nothing to splice.
            let flat = errors.iter().flatten().cloned();
            return Some(Arc::new(MultiError::from_flat(flat, inspection.capacity)));
        }
        _ => {}
    }

    let mut flat = Vec::with_capacity(inspection.capacity);
    for error in errors[inspection.first..].iter().flatten() {
        match error.downcast_ref::<MultiError>() {
            Some(group) => flat.extend(group.iter().cloned()),
            None => flat.push(Arc::clone(error)),
        }
    }

    Some(Arc::new(MultiError::from_flat(flat, inspection.capacity)))
}

/// Combines errors from an iterator. See [`combine`].
///
/// ```
/// # use multierror::{combine_iter, shared};
/// # use std::io;
/// let results = vec![
///     Ok(1),
///     Err(io::Error::other("first")),
///     Ok(2),
///     Err(io::Error::other("second")),
/// ];
///
/// let err = combine_iter(results.into_iter().map(|r| r.err().map(shared))).unwrap();
/// assert_eq!(err.to_string(), "first; second");
/// ```
#[must_use]
pub fn combine_iter(errors: impl IntoIterator<Item = Option<SharedError>>) -> Option<SharedError> {
    let mut count = 0;
    let mut first = None;
    let mut flat = Vec::new();
    for error in errors.into_iter().flatten() {
        count += 1;
        match error.downcast_ref::<MultiError>() {
            Some(group) => flat.extend(group.iter().cloned()),
            None => flat.push(Arc::clone(&error)),
        }
        if first.is_none() {
            first = Some(error);
        }
    }

    match count {
        0 | 1 => first,
        _ => {
            let capacity = flat.len();
            Some(Arc::new(MultiError::from_flat(flat, capacity)))
        }
    }
}

/// Combines any number of `Option<SharedError>` expressions. See [`combine`].
///
/// ```
/// # use multierror::{combine, shared};
/// # use std::io;
/// let err = combine!(
///     Some(shared(io::Error::other("a"))),
///     None,
///     Some(shared(io::Error::other("b"))),
/// );
/// assert_eq!(err.unwrap().to_string(), "a; b");
/// ```
#[macro_export]
macro_rules! combine {
    ($($error:expr),* $(,)?) => {
        $crate::combine(&[$($error),*])
    };
}

/// Appends two errors together. Either may be `None`.
///
/// This is a specialization of [`combine`] for the common case of two errors, and is optimized for
/// repeatedly folding new errors into a running accumulator:
///
/// ```
/// # use multierror::{append, shared, MultiError, SharedError};
/// # use std::io;
/// let mut acc: Option<SharedError> = None;
/// for i in 0..5 {
///     acc = append(acc, Some(shared(io::Error::other(format!("step {i} failed")))));
/// }
///
/// let acc = acc.unwrap();
/// assert_eq!(acc.downcast_ref::<MultiError>().unwrap().len(), 5);
/// ```
///
/// When the left side is a [`MultiError`] which nothing else has appended to yet, the new error is
/// written into spare capacity of the storage it already owns, so a loop like the one above costs
/// amortized O(1) per append. Any other shape, including a second append to the same left side,
/// takes the copying path of [`combine`]. Both paths produce the same elements.
#[must_use]
pub fn append(left: Option<SharedError>, right: Option<SharedError>) -> Option<SharedError> {
    let (left, right) = match (left, right) {
        (None, right) => return right,
        (left, None) => return left,
        (Some(left), Some(right)) => (left, right),
    };

    if right.downcast_ref::<MultiError>().is_none() {
        match left.downcast_ref::<MultiError>() {
            Some(group) => {
                if let Some(grown) = group.try_extend(Arc::clone(&right)) {
                    return Some(Arc::new(grown));
                }
            }
            None => return Some(Arc::new(MultiError::from_flat([left, right], 2))),
        }
    }

    combine(&[Some(left), Some(right)])
}

/// Returns the list of errors held in `error`.
///
/// The returned list is a copy, and is empty for `None`. Any error other than a [`MultiError`] is
/// returned as a list of just itself.
///
/// ```
/// # use multierror::{combine, errors, shared};
/// # use std::io;
/// assert!(errors(None).is_empty());
///
/// let single = shared(io::Error::other("a"));
/// assert_eq!(errors(Some(&single)).len(), 1);
///
/// let err = combine(&[Some(single), Some(shared(io::Error::other("b")))]).unwrap();
/// assert_eq!(errors(Some(&err)).len(), 2);
/// ```
#[must_use]
pub fn errors(error: Option<&SharedError>) -> Vec<SharedError> {
    match error {
        None => Vec::new(),
        Some(error) => match error.downcast_ref::<MultiError>() {
            Some(group) => group.to_vec(),
            None => vec![Arc::clone(error)],
        },
    }
}

/// What [`combine`] needs to know about its input before allocating.
#[derive(Debug, Default, PartialEq, Eq)]
struct Inspection {
    /// Number of top-level errors which are present.
    count: usize,

    /// Number of errors once aggregates are flattened.
    capacity: usize,

    /// Index of the first present error. Meaningless if `count` is zero.
    first: usize,

    /// Whether any present error is a [`MultiError`].
    contains_group: bool,
}

impl Inspection {
    fn of(errors: &[Option<SharedError>]) -> Self {
        let mut inspection = Inspection::default();
        for (i, error) in errors.iter().enumerate() {
            let Some(error) = error else { continue };

            if inspection.count == 0 {
                inspection.first = i;
            }
            inspection.count += 1;

            match error.downcast_ref::<MultiError>() {
                Some(group) => {
                    inspection.capacity += group.len();
                    inspection.contains_group = true;
                }
                None => inspection.capacity += 1,
            }
        }
        inspection
    }
}
