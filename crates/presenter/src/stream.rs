use futures::{future, Stream, StreamExt};
use shared::domain::TodoVm;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::debug;

/// Async view of the presenter's todo stream.
///
/// Backed by a bounded broadcast channel: it only sees emissions made after
/// it was created, and a receiver that falls behind loses the oldest
/// snapshots and resumes with the newest ones still buffered.
pub struct TodoStream {
    receiver: broadcast::Receiver<Vec<TodoVm>>,
}

impl TodoStream {
    pub(crate) fn new(receiver: broadcast::Receiver<Vec<TodoVm>>) -> Self {
        Self { receiver }
    }

    /// Next emitted snapshot, or `None` once the presenter is gone.
    pub async fn next_snapshot(&mut self) -> Option<Vec<TodoVm>> {
        loop {
            match self.receiver.recv().await {
                Ok(todos) => return Some(todos),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "todo stream lagged; dropping oldest snapshots");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Snapshot already buffered for this stream, without waiting.
    pub fn try_next_snapshot(&mut self) -> Option<Vec<TodoVm>> {
        loop {
            match self.receiver.try_recv() {
                Ok(todos) => return Some(todos),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "todo stream lagged; dropping oldest snapshots");
                }
                Err(_) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = Vec<TodoVm>> + Send + Unpin + 'static {
        BroadcastStream::new(self.receiver).filter_map(|item| {
            future::ready(match item {
                Ok(todos) => Some(todos),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    debug!(skipped, "todo stream lagged; dropping oldest snapshots");
                    None
                }
            })
        })
    }
}
