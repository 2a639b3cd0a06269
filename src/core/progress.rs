use std::io::Write;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawns a consumer that renders percentages for one stream on stderr.
/// The task ends when the sender side is dropped.
pub fn spawn_reporter(label: &'static str) -> (mpsc::Sender<f64>, JoinHandle<Option<f64>>) {
    let (tx, mut rx) = mpsc::channel::<f64>(32);
    let handle = tokio::spawn(async move {
        let mut last: Option<f64> = None;
        while let Some(percent) = rx.recv().await {
            tracing::trace!(label, percent, "progress");
            if last.is_some_and(|prev| format_percent(prev) == format_percent(percent)) {
                continue;
            }
            {
                let mut stderr = std::io::stderr().lock();
                let _ = write!(stderr, "\rDownloading {}: {}", label, format_percent(percent));
                let _ = stderr.flush();
            }
            last = Some(percent);
        }
        if last.is_some() {
            eprintln!();
        }
        last
    });
    (tx, handle)
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent.clamp(0.0, 100.0))
}
