/*!
 * Process Traits
 * The unit of work a process runs once per burst
 */

use super::types::WorkError;

/// A unit of work invoked once per scheduling burst
///
/// A burst runs synchronously to completion; long-running work stalls the
/// whole scheduler. Returning `Err` (or panicking) terminates the owning
/// process without affecting any other.
///
/// Closures of the shape `FnMut() -> Result<(), WorkError>` implement this
/// trait directly; use [`from_fn`] for closures that cannot fail.
pub trait Work: Send {
    fn invoke(&mut self) -> Result<(), WorkError>;
}

impl<F> Work for F
where
    F: FnMut() -> Result<(), WorkError> + Send,
{
    #[inline]
    fn invoke(&mut self) -> Result<(), WorkError> {
        self()
    }
}

/// Work that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWork;

impl Work for NoopWork {
    #[inline]
    fn invoke(&mut self) -> Result<(), WorkError> {
        Ok(())
    }
}

/// Adapter for infallible closures, see [`from_fn`]
#[derive(Debug, Clone)]
pub struct FnWork<F>(F);

impl<F> Work for FnWork<F>
where
    F: FnMut() + Send,
{
    #[inline]
    fn invoke(&mut self) -> Result<(), WorkError> {
        (self.0)();
        Ok(())
    }
}

/// Wrap an infallible closure as [`Work`]
pub fn from_fn<F>(f: F) -> FnWork<F>
where
    F: FnMut() + Send,
{
    FnWork(f)
}
