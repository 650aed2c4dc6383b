use thiserror::Error;

/// Errors shared by every Strata crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("failed to allocate {bytes} bytes for {what}")]
    AllocationFailed { what: &'static str, bytes: usize },
}

/// Allocate a boxed slice filled with `fill`, reporting OOM instead of aborting.
pub fn try_alloc_slice<T: Clone>(
    what: &'static str,
    len: usize,
    fill: T,
) -> Result<Box<[T]>, CoreError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| CoreError::AllocationFailed {
            what,
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    v.resize(len, fill);
    Ok(v.into_boxed_slice())
}
