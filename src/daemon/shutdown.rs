use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Waits for Ctrl-C or, on unix, SIGTERM and cancels `cancelation`. Also returns once somebody
/// else cancels it, e.g. the collector after its key source ran dry.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
            cancelation.cancel();
        },
        _ = terminate() => {
            info!("Received SIGTERM, shutting down");
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::warn!("Can't listen for SIGTERM {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
