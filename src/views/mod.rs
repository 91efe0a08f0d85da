//! Terminal front-ends
//!
//! Each view owns its controller and consumes one event queue. Producers
//! (the line reader, probe and thumbnail tasks) only send events.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::notifications::NotificationCenter;

pub mod gallery;
pub mod timeline;
pub mod trimmer;

pub use gallery::GalleryView;
pub use trimmer::TrimmerView;

/// Bound of each view's event queue
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Forward input lines as events; `None` marks end of input
pub fn spawn_line_reader<R, E, F>(reader: R, tx: mpsc::Sender<E>, to_event: F) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    E: Send + 'static,
    F: Fn(Option<String>) -> E + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(to_event(Some(line))).await.is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read input");
                    break;
                }
            }
        }
        let _ = tx.send(to_event(None)).await;
    })
}

/// Print notifications raised since the last call
pub fn print_notifications<W: Write>(
    out: &mut W,
    notifications: &mut NotificationCenter,
) -> std::io::Result<()> {
    for notification in notifications.drain_new() {
        writeln!(out, "[{}] {}", notification.kind, notification.message)?;
    }
    Ok(())
}

/// Split a command line into its verb and the (trimmed) remainder
pub(crate) fn split_command(line: &str) -> (String, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb.to_lowercase(), rest.trim()),
        None => (line.to_lowercase(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("  Start  1:30 "), ("start".to_string(), "1:30"));
        assert_eq!(split_command("quit"), ("quit".to_string(), ""));
        assert_eq!(
            split_command("save /tmp/my clip.mp4"),
            ("save".to_string(), "/tmp/my clip.mp4")
        );
    }

    #[tokio::test]
    async fn test_line_reader_reports_end_of_input() {
        let (tx, mut rx) = mpsc::channel(8);
        let input = std::io::Cursor::new(b"list\nquit\n".to_vec());
        spawn_line_reader(input, tx, |line| line);
        assert_eq!(rx.recv().await, Some(Some("list".to_string())));
        assert_eq!(rx.recv().await, Some(Some("quit".to_string())));
        assert_eq!(rx.recv().await, Some(None));
    }
}
