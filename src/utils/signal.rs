use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Cancels `token` on Ctrl+C so outstanding requests are dropped instead of
/// applied.
pub async fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("unable to listen for Ctrl+C: {e}");
                return;
            }
            #[cfg(not(windows))]
            eprintln!();
            tracing::info!("Ctrl+C received, cancelling pending requests.");
            token.cancel();
        }
        _ = token.cancelled() => {}
    }
}
