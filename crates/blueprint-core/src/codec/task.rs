//! Awaitable wrappers that keep compression work off the async executor.
//!
//! Inflating and deflating a large blueprint is CPU-bound.  Running it inside
//! an async task would stall every other task on that worker thread, so each
//! wrapper moves the call onto tokio's blocking pool and resolves once it is
//! done.  Calls are independent; there is no ordering between them and no
//! cancellation once started.

use tokio::task;

use crate::codec::decode::{decode, decode_envelope, inspect, Inspection};
use crate::codec::encode::{encode_envelope, encode_with, EncodeOptions};
use crate::codec::error::CodecError;
use crate::compression::CompressionLevel;
use crate::envelope::{Entity, Envelope};

/// [`decode`] on the blocking pool.
///
/// # Errors
///
/// Any [`decode`] error, or [`CodecError::Interrupted`] if the task panicked
/// or the runtime shut down first.
pub async fn decode_async(exchange: String) -> Result<Vec<Entity>, CodecError> {
    run_blocking(move || decode(&exchange)).await
}

/// [`decode_envelope`] on the blocking pool.
///
/// # Errors
///
/// Same as [`decode_async`].
pub async fn decode_envelope_async(exchange: String) -> Result<Envelope, CodecError> {
    run_blocking(move || decode_envelope(&exchange)).await
}

/// [`inspect`] on the blocking pool.
///
/// # Errors
///
/// Same as [`decode_async`].
pub async fn inspect_async(exchange: String) -> Result<Inspection, CodecError> {
    run_blocking(move || inspect(&exchange)).await
}

/// [`encode_with`] on the blocking pool.
///
/// # Errors
///
/// Any [`encode_with`] error, or [`CodecError::Interrupted`].
pub async fn encode_async(
    entities: Vec<Entity>,
    options: EncodeOptions,
) -> Result<String, CodecError> {
    run_blocking(move || encode_with(&entities, &options)).await
}

/// [`encode_envelope`] on the blocking pool.
pub async fn encode_envelope_async(
    envelope: Envelope,
    level: CompressionLevel,
) -> Result<String, CodecError> {
    run_blocking(move || encode_envelope(&envelope, level)).await
}

async fn run_blocking<T, F>(job: F) -> Result<T, CodecError>
where
    F: FnOnce() -> Result<T, CodecError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(job)
        .await
        .map_err(CodecError::Interrupted)?
}
