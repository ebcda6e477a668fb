//! The worker protocol over newline-delimited JSON
//!
//! Every input line is a task object (`{"path": ..., "url": ...}`) or `null`
//! to shut down. Every output line is a worker message: `[true, <record>]`
//! per record and `[null, 0|1]` to finish the task.

use crate::error::Result;
use crate::worker::{Task, Worker, WorkerError, WorkerMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Serve tasks read from `reader`, writing messages to `writer`.
///
/// Returns the number of tasks handled. Stops at `null` or end of input.
/// Lines that are not valid task messages are logged and skipped.
pub async fn serve_stdio<R, W>(worker: &Worker, reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message: Option<Task> = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping malformed task message: {}", e);
                continue;
            }
        };
        let Some(task) = message else {
            debug!("Shutdown requested");
            break;
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        let process = async move { worker.process_task(&task, &tx).await };
        let forward = async {
            while let Some(message) = rx.recv().await {
                write_message(&mut writer, &message).await?;
            }
            Ok::<(), WorkerError>(())
        };
        let (_, forwarded) = tokio::join!(process, forward);
        forwarded?;
        handled += 1;
    }

    writer.flush().await?;
    info!("Served {} tasks", handled);
    Ok(handled)
}

async fn write_message<W>(
    writer: &mut W,
    message: &WorkerMessage,
) -> std::result::Result<(), WorkerError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Extractor;
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::io::BufReader;

    fn worker() -> Worker {
        Worker::new(Arc::new(Extractor::default()), None)
    }

    fn output_lines(output: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_serves_until_null() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        std::fs::write(
            &page,
            "<article><h1>Title</h1><div class=\"markdown\"><p>Body</p></div></article>",
        )
        .unwrap();

        let input = format!(
            "{}\n\n{}\nnull\n{}\n",
            serde_json::to_string(&Task::new(&page, "/page")).unwrap(),
            serde_json::to_string(&Task::new(dir.path().join("gone.html"), "/gone")).unwrap(),
            serde_json::to_string(&Task::new(&page, "/ignored")).unwrap(),
        );
        let mut output = Vec::new();

        let handled = serve_stdio(&worker(), BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        assert_eq!(handled, 2);
        let lines = output_lines(&output);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0][0], Value::Bool(true));
        assert_eq!(lines[0][1]["title"], "Title");
        assert_eq!(lines[0][1]["content"], "Body");
        assert_eq!(lines[1], serde_json::json!([null, 1]));
        assert_eq!(lines[2], serde_json::json!([null, 0]));
    }

    #[tokio::test]
    async fn test_skips_malformed_lines() {
        let input = "not json\n{\"path\": 3}\n";
        let mut output = Vec::new();

        let handled = serve_stdio(&worker(), BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        assert_eq!(handled, 0);
        assert!(output.is_empty());
    }
}
