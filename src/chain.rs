use std::error::Error;

use crate::MultiError;

/// Returns `true` if `error` is `target`, or if `target` appears anywhere in its chain of
/// [`source`](Error::source)s.
///
/// Errors are compared by identity, not by value: a node matches only if it is of type `T` and is
/// the very same value as `target`. A [`MultiError`] met along the way counts as a match if any of
/// its elements does.
///
/// To look for a [`SharedError`](crate::SharedError), downcast it to its concrete type first.
///
/// ```
/// # use multierror::{combine, is, shared, SharedError};
/// # use std::{io, sync::Arc};
/// let target = Arc::new(io::Error::other("target"));
/// let other = io::Error::other("target");
///
/// let err = combine(&[
///     Some(shared(io::Error::other("a"))),
///     Some(target.clone() as SharedError),
///     Some(shared(io::Error::other("b"))),
/// ]).unwrap();
///
/// assert!(is(&*err, &*target));
/// assert!(!is(&*err, &other));
/// ```
#[must_use]
pub fn is<T: Error + 'static>(error: &(dyn Error + 'static), target: &T) -> bool {
    find_map(error, &mut |e| {
        e.downcast_ref::<T>().is_some_and(|e| std::ptr::eq(e, target)).then_some(())
    })
    .is_some()
}

/// Returns `true` if any error of type `T` in the chain of `error` compares equal to `value`.
///
/// Like [`is`], but compares by value. Useful for error enums without any identity of their own.
///
/// ```
/// # use multierror::{append, is_eq, shared};
/// #[derive(Debug, PartialEq, thiserror::Error)]
/// enum Io {
///     #[error("closed")]
///     Closed,
///     #[error("timed out")]
///     TimedOut,
/// }
///
/// let err = append(Some(shared(Io::Closed)), Some(shared(Io::Closed))).unwrap();
/// assert!(is_eq(&*err, &Io::Closed));
/// assert!(!is_eq(&*err, &Io::TimedOut));
/// ```
#[must_use]
pub fn is_eq<T: Error + PartialEq + 'static>(error: &(dyn Error + 'static), value: &T) -> bool {
    find_map(error, &mut |e| e.downcast_ref::<T>().filter(|e| *e == value)).is_some()
}

/// Returns the first error of type `T` in the chain of `error`.
///
/// A [`MultiError`] met along the way is searched element by element, in order.
///
/// ```
/// # use multierror::{combine, find, shared};
/// # use std::{fmt, io};
/// let err = combine(&[
///     Some(shared(fmt::Error)),
///     Some(shared(io::Error::new(io::ErrorKind::NotFound, "missing"))),
/// ]).unwrap();
///
/// let io_err = find::<io::Error>(&*err).unwrap();
/// assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
/// ```
#[must_use]
pub fn find<'a, T: Error + 'static>(error: &'a (dyn Error + 'static)) -> Option<&'a T> {
    find_map(error, &mut |e| e.downcast_ref::<T>())
}

/// Walks the chain of `error`, returning the first value produced by `f`.
///
/// A [`MultiError`] has no source of its own. Reaching one ends the walk down this chain and
/// continues into each of its elements instead.
fn find_map<'a, R>(
    error: &'a (dyn Error + 'static),
    f: &mut impl FnMut(&'a (dyn Error + 'static)) -> Option<R>,
) -> Option<R> {
    let mut current = Some(error);
    while let Some(error) = current {
        if let Some(found) = f(error) {
            return Some(found);
        }

        if let Some(group) = error.downcast_ref::<MultiError>() {
            for member in group {
                if let Some(found) = find_map(&**member, f) {
                    return Some(found);
                }
            }
            return None;
        }

        current = error.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{combine, shared, SharedError};
    use std::sync::Arc;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("{0}")]
    struct Message(&'static str);

    #[derive(Debug, thiserror::Error)]
    #[error("{context}")]
    struct Context {
        context: &'static str,
        #[source]
        inner: Message,
    }

    #[test]
    fn plain_error_is_itself() {
        let a = Message("a");
        assert!(is(&a, &a));
        assert!(!is(&a, &Message("a")));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("payload {0}")]
    struct Payload(u32);

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    #[repr(C)]
    struct Outer {
        data: Payload,
        #[source]
        cause: Message,
    }

    #[test]
    fn field_sharing_an_address_is_not_a_member() {
        let outer = Arc::new(Outer { data: Payload(1), cause: Message("cause") });
        let err = combine(&[Some(shared(Message("a"))), Some(outer.clone() as SharedError)])
            .unwrap();

        // `data` lives at the same address as `outer`, but is neither an element nor a source.
        assert!(std::ptr::addr_eq(&*outer, &outer.data));
        assert!(!is(&*err, &outer.data));
        assert!(is(&*err, &outer.cause));
        assert!(is(&*err, &*outer));
    }

    #[test]
    fn reaches_through_sources_inside_group() {
        let wrapped = Arc::new(Context { context: "reading config", inner: Message("denied") });
        let err = combine(&[Some(shared(Message("a"))), Some(wrapped.clone() as SharedError)])
            .unwrap();

        assert!(is(&*err, &wrapped.inner));
        assert!(is_eq(&*err, &Message("denied")));
        assert_eq!(find::<Context>(&*err).map(|c| c.context), Some("reading config"));
    }

    #[test]
    fn find_returns_first_in_order() {
        let err = combine(&[
            Some(shared(Message("first"))),
            Some(shared(Message("second"))),
        ])
        .unwrap();

        assert_eq!(find::<Message>(&*err), Some(&Message("first")));
        assert!(find::<std::fmt::Error>(&*err).is_none());
    }

    #[test]
    fn group_methods_delegate() {
        let target = Arc::new(Message("t"));
        let err = combine(&[Some(shared(Message("a"))), Some(target.clone() as SharedError)])
            .unwrap();
        let group = err.downcast_ref::<MultiError>().unwrap();

        assert!(group.contains(&*target));
        assert!(!group.contains(&Message("t")));
        assert_eq!(group.find::<Message>(), Some(&Message("a")));
    }
}
