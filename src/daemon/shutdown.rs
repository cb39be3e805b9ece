use tokio::select;
use tokio_util::sync::CancellationToken;

/// Detects signals sent to the process. Returns early if something else cancels `cancelation`,
/// for example the tick loop failing.
///
/// On Windows detached processes can't detect signals sent to them, there the daemon is stopped
/// by terminating the process.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}
