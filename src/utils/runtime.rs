use anyhow::Result;

/// Everything in learntime runs on one thread: the tick loop, persistence and event processing.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
