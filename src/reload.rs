use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::sync::mpsc::Sender;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

/// Watches the deployed binary for replacement.
///
/// Records the artifact's modification time at startup and polls it on a
/// fixed cadence. When the file changes, one notice is sent and the task
/// ends; the process exits on that notice so the supervising process
/// manager restarts the new binary. No in-process re-exec. Shares nothing
/// with the tick path and never blocks it.
pub async fn watch_artifact(path: PathBuf, poll: Duration, notice: Sender<()>) {
    let baseline = match modified(&path).await {
        Ok(ts) => ts,
        Err(e) => {
            warn!(error = ?e, path = %path.display(), "cannot stat binary; artifact watch disabled");
            return;
        }
    };

    info!(
        path = %path.display(),
        every_ms = poll.as_millis() as u64,
        "artifact watch started"
    );

    let mut ticker = interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match modified(&path).await {
            Ok(ts) if ts != baseline => break,
            Ok(_) => {}
            Err(e) => warn!(error = ?e, "artifact stat failed; will retry"),
        }
    }

    info!(path = %path.display(), "binary artifact replaced");
    let _ = notice.send(()).await;
}

async fn modified(path: &Path) -> std::io::Result<SystemTime> {
    tokio::fs::metadata(path).await?.modified()
}
