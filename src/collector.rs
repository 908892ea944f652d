use std::error::Error;

use crate::{append, errors, shared, SharedError};

/// Something which accumulates errors.
///
/// This generalizes the pattern of folding errors into a running accumulator with [`append`], so
/// that failures from many independent operations can be recorded as they happen and inspected
/// together later.
///
/// [`append`]: crate::append
///
/// The usual collector is an `Option<SharedError>`, which holds `None` until the first error is
/// pushed and a [`MultiError`](crate::MultiError) once there is more than one:
///
/// ```
/// # use multierror::{ErrorCollector, SharedError};
/// # use std::io;
/// fn close(name: &str) -> io::Result<()> {
///     if name.starts_with('b') {
///         Err(io::Error::other(format!("failed to close {name}")))
///     } else {
///         Ok(())
///     }
/// }
///
/// let mut errs: Option<SharedError> = None;
/// for name in ["alpha", "beta", "bravo", "charlie"] {
///     errs.push_result(close(name));
/// }
///
/// assert_eq!(
///     errs.unwrap().to_string(),
///     "failed to close beta; failed to close bravo",
/// );
/// ```
pub trait ErrorCollector {
    /// Add a new error to the collection of errors.
    fn push_error(&mut self, error: SharedError);

    /// Records the error of `result`, if there is one, and returns its value otherwise.
    ///
    /// ```
    /// # use multierror::{ErrorCollector, SharedError};
    /// let mut errs: Option<SharedError> = None;
    ///
    /// assert_eq!(errs.push_result("12".parse::<u32>()), Some(12));
    /// assert_eq!(errs.push_result("x".parse::<u32>()), None);
    /// assert!(errs.is_some());
    /// ```
    fn push_result<T, E>(&mut self, result: Result<T, E>) -> Option<T>
    where
        E: Error + Send + Sync + 'static,
    {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push_error(shared(error));
                None
            }
        }
    }

    /// Consumes this collector and pushes all of its errors into a different collector.
    fn propagate(self, other: &mut impl ErrorCollector)
    where
        Self: Sized;
}

impl ErrorCollector for Option<SharedError> {
    fn push_error(&mut self, error: SharedError) {
        *self = append(self.take(), Some(error));
    }

    /// ```
    /// # use multierror::{combine, shared, ErrorCollector, MultiError, SharedError};
    /// # use std::io;
    /// let source = combine(&[
    ///     Some(shared(io::Error::other("error 1"))),
    ///     Some(shared(io::Error::other("error 2"))),
    /// ]);
    /// let mut dest = Some(shared(io::Error::other("error 3")));
    ///
    /// source.propagate(&mut dest);
    ///
    /// let dest = dest.unwrap();
    /// assert_eq!(dest.downcast_ref::<MultiError>().unwrap().len(), 3);
    /// assert_eq!(dest.to_string(), "error 3; error 1; error 2");
    /// ```
    fn propagate(self, other: &mut impl ErrorCollector) {
        for error in errors(self.as_ref()) {
            other.push_error(error);
        }
    }
}

/// Collects errors into a plain list, flattening any [`MultiError`](crate::MultiError) pushed.
///
/// ```
/// # use multierror::{combine, shared, ErrorCollector, SharedError};
/// # use std::io;
/// let mut list: Vec<SharedError> = Vec::new();
/// list.push_error(shared(io::Error::other("a")));
/// list.push_error(combine(&[
///     Some(shared(io::Error::other("b"))),
///     Some(shared(io::Error::other("c"))),
/// ]).unwrap());
///
/// assert_eq!(list.len(), 3);
/// ```
impl ErrorCollector for Vec<SharedError> {
    fn push_error(&mut self, error: SharedError) {
        self.extend(errors(Some(&error)));
    }

    fn propagate(self, other: &mut impl ErrorCollector) {
        for error in self {
            other.push_error(error);
        }
    }
}
