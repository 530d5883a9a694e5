//! Cache-miss handlers

use crate::error::LoadResult;
use std::fmt;
use std::sync::Arc;

/// Produces the bytes for a key that is not in the cache.
///
/// A namespace does not serialize calls into its loader: different keys are
/// loaded in parallel, and two concurrent misses on the same key may both
/// reach the loader. Implementations that keep internal state must
/// synchronize it themselves.
pub trait Loader: Send + Sync {
    fn load(&self, key: &str) -> LoadResult<Vec<u8>>;
}

/// Lifts a plain function or closure into a [`Loader`].
///
/// ```rust,ignore
/// let loader = LoaderFn::new(|key: &str| match db.get(key) {
///     Some(v) => Ok(v.as_bytes().to_vec()),
///     None => Err(LoadError::not_found(key)),
/// });
/// ```
pub struct LoaderFn<F> {
    f: F,
}

impl<F> LoaderFn<F>
where
    F: Fn(&str) -> LoadResult<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> LoadResult<Vec<u8>> + Send + Sync,
{
    fn load(&self, key: &str) -> LoadResult<Vec<u8>> {
        (self.f)(key)
    }
}

impl<F> fmt::Debug for LoaderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderFn").finish_non_exhaustive()
    }
}

/// Shorthand for [`LoaderFn::new`]
pub fn loader_fn<F>(f: F) -> LoaderFn<F>
where
    F: Fn(&str) -> LoadResult<Vec<u8>> + Send + Sync,
{
    LoaderFn::new(f)
}

impl<L: Loader + ?Sized> Loader for Arc<L> {
    fn load(&self, key: &str) -> LoadResult<Vec<u8>> {
        (**self).load(key)
    }
}

impl<L: Loader + ?Sized> Loader for Box<L> {
    fn load(&self, key: &str) -> LoadResult<Vec<u8>> {
        (**self).load(key)
    }
}
