//! Background batch thread.
//!
//! Runs [`run_batch_with_cancel`] on a worker thread and streams its log lines
//! back over a channel, so a front end can stay responsive while files are
//! read. There is no parallelism: the worker processes files one at a time.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

use hai_standards::Catalog;

use crate::pipeline::{BatchError, BatchRequest, SummaryRow, run_batch_with_cancel};

/// Messages sent from the worker thread.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchUpdate {
    /// One formatted log line.
    Log(String),
    /// Terminal success message.
    Finished {
        output: Option<PathBuf>,
        ordered: Vec<SummaryRow>,
    },
    /// Terminal failure message.
    Failed { message: String },
}

/// Handle to cancel a running batch.
#[derive(Clone, Default)]
pub struct BatchHandle {
    cancel_flag: Arc<AtomicBool>,
}

impl BatchHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    ///
    /// Log lines stop immediately; the batch stops before the next file and no
    /// terminal message is sent.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_flag)
    }
}

/// Spawns the batch on a background thread with `info`-level log forwarding.
pub fn spawn_batch(
    request: BatchRequest,
    catalog: Catalog,
    sender: Sender<BatchUpdate>,
) -> BatchHandle {
    spawn_batch_with_level(request, catalog, sender, LevelFilter::INFO)
}

/// Spawns the batch on a background thread.
///
/// The thread installs its own subscriber, so events emitted by the batch are
/// forwarded as [`BatchUpdate::Log`] lines and never reach the global one.
pub fn spawn_batch_with_level(
    request: BatchRequest,
    catalog: Catalog,
    sender: Sender<BatchUpdate>,
    level: LevelFilter,
) -> BatchHandle {
    let handle = BatchHandle::new();
    let cancel_flag = handle.cancel_flag();

    std::thread::spawn(move || {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(ChannelWriter {
                sender: sender.clone(),
                cancel_flag: Arc::clone(&cancel_flag),
            })
            .with_max_level(level)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            run_batch_with_cancel(&request, &catalog, &cancel_flag)
        });

        if cancel_flag.load(Ordering::SeqCst) {
            return;
        }
        let update = match result {
            Ok(result) => BatchUpdate::Finished {
                output: result.output,
                ordered: result.ordered,
            },
            Err(BatchError::Cancelled) => return,
            Err(error) => BatchUpdate::Failed {
                message: error.to_string(),
            },
        };
        let _ = sender.send(update);
    });

    handle
}

/// Sends each formatted event to the channel, one message per line.
struct ChannelWriter {
    sender: Sender<BatchUpdate>,
    cancel_flag: Arc<AtomicBool>,
}

struct ChannelLine {
    sender: Sender<BatchUpdate>,
    cancel_flag: Arc<AtomicBool>,
}

impl Write for ChannelLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.cancel_flag.load(Ordering::SeqCst) {
            return Ok(buf.len());
        }
        let text = String::from_utf8_lossy(buf);
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            // A closed channel means nobody is listening; keep the batch going.
            let _ = self.sender.send(BatchUpdate::Log(line.to_string()));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for ChannelWriter {
    type Writer = ChannelLine;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelLine {
            sender: self.sender.clone(),
            cancel_flag: Arc::clone(&self.cancel_flag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn channel_line_splits_and_drops_after_cancel() {
        let (sender, receiver) = mpsc::channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let writer = ChannelWriter {
            sender,
            cancel_flag: Arc::clone(&cancel_flag),
        };

        writer.make_writer().write_all(b"first\nsecond\n").unwrap();
        cancel_flag.store(true, Ordering::SeqCst);
        writer.make_writer().write_all(b"dropped\n").unwrap();
        drop(writer);

        let lines: Vec<BatchUpdate> = receiver.iter().collect();
        assert_eq!(
            lines,
            vec![
                BatchUpdate::Log("first".to_string()),
                BatchUpdate::Log("second".to_string()),
            ]
        );
    }

    #[test]
    fn handle_clones_share_the_flag() {
        let handle = BatchHandle::new();
        let clone = handle.clone();
        clone.cancel();
        assert!(handle.is_cancelled());
    }
}
