use crate::domain::model::LogLine;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Opening a log file is fatal: without a sink the pipeline must not start.
pub async fn open_log_file(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .await?;
    Ok(file)
}

/// Single writer for the normal log. Drains status and ok lines until the
/// channel closes, counts the ok entries, appends the final ok-count line,
/// then flushes and releases the handle. The returned handle resolving is
/// the sink's done signal; its value is the final ok count.
pub fn spawn_main_sink(
    mut file: File,
    mut messages: UnboundedReceiver<LogLine>,
    path: PathBuf,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut ok_count: u64 = 0;

        while let Some(line) = messages.recv().await {
            if matches!(line, LogLine::DomainOk(_)) {
                ok_count += 1;
            }
            write_line(&mut file, line.text(), &path).await;
        }

        let summary = format!("\t\t    --> Ok:\t  {}", ok_count);
        write_line(&mut file, &summary, &path).await;
        finish(file, &path).await;
        ok_count
    })
}

/// Single writer for the error log, the normal sink's mirror without the
/// trailing summary. Resolves to the number of error messages written.
pub fn spawn_error_sink(
    mut file: File,
    mut messages: UnboundedReceiver<String>,
    path: PathBuf,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut error_count: u64 = 0;

        while let Some(line) = messages.recv().await {
            write_line(&mut file, &line, &path).await;
            error_count += 1;
        }

        finish(file, &path).await;
        error_count
    })
}

/// A failed write is reported and skipped; log output is best effort and
/// must never abort the run.
async fn write_line(file: &mut File, line: &str, path: &Path) {
    let mut buf = Vec::with_capacity(line.len() + 1);
    buf.extend_from_slice(line.as_bytes());
    buf.push(b'\n');

    if let Err(e) = file.write_all(&buf).await {
        tracing::error!("Error writing to log file {}: {}", path.display(), e);
    }
}

async fn finish(mut file: File, path: &Path) {
    if let Err(e) = file.flush().await {
        tracing::error!("Error flushing log file {}: {}", path.display(), e);
    }
    // dropping the handle closes it; nothing else ever writes to this file
}
