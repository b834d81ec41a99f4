use anyhow::Result;

/// Everything in keyrace is I/O bound and serialized through a single event loop, so one
/// thread is all the daemon needs.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
