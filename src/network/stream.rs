use crate::error::StreamError;
use chrono::{DateTime, Utc};
use futures::{SinkExt, Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// One inbound frame. The payload is kept as received and only decoded by
/// the view that displays it.
#[derive(Debug, Clone)]
pub struct StreamFrame {
    payload: Arc<str>,
    received_at: DateTime<Utc>,
    sequence: u64,
}

impl StreamFrame {
    pub fn new(payload: impl Into<Arc<str>>, sequence: u64) -> Self {
        Self {
            payload: payload.into(),
            received_at: Utc::now(),
            sequence,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Increases by one for every frame received on a connection.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Holds the single streaming connection. Opened by [`FrameReceiver::start`],
/// closed by [`FrameReceiver::stop`] or on drop.
pub struct FrameReceiver {
    frame_rx: watch::Receiver<Option<StreamFrame>>,
    cancel_token: CancellationToken,
    stream_task: Option<JoinHandle<()>>,
}

impl FrameReceiver {
    pub fn start(url: impl Into<String>) -> Self {
        let url = url.into();
        let (frame_tx, frame_rx) = watch::channel(None);
        let cancel_token = CancellationToken::new();
        let stream_task = tokio::spawn(run_stream(url, frame_tx, cancel_token.clone()));
        Self {
            frame_rx,
            cancel_token,
            stream_task: Some(stream_task),
        }
    }

    /// The most recent frame, or `None` before the first one arrives.
    pub fn latest(&self) -> Option<StreamFrame> {
        self.frame_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> FrameSubscription {
        FrameSubscription {
            inner: WatchStream::new(self.frame_rx.clone()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn stop(&mut self) {
        self.cancel_token.cancel();
        if let Some(task) = self.stream_task.take() {
            info!("Stopping frame receiver");
            // The task closes the socket itself once it sees the cancellation.
            drop(task);
        }
    }
}

impl Drop for FrameReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Lazy sequence of frames. Intermediate frames may be skipped when the
/// consumer is slower than the stream; the sequence ends when the receiver
/// stops. Dropping the subscription unsubscribes it; the receiver keeps running.
pub struct FrameSubscription {
    inner: WatchStream<Option<StreamFrame>>,
}

impl Stream for FrameSubscription {
    type Item = StreamFrame;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Some(frame))) => return Poll::Ready(Some(frame)),
                Poll::Ready(Some(None)) => continue,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

async fn run_stream(
    url: String,
    frame_tx: watch::Sender<Option<StreamFrame>>,
    cancel_token: CancellationToken,
) {
    let connected = tokio::select! {
        _ = cancel_token.cancelled() => return,
        connected = tokio_tungstenite::connect_async(url.as_str()) => connected,
    };
    let socket = match connected {
        Ok((socket, _)) => socket,
        Err(source) => {
            error!("{}", StreamError::Connect { url, source });
            return;
        }
    };
    info!("Frame stream connected to {}", url);

    let (mut sink, mut source) = socket.split();
    let mut sequence = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                if let Err(e) = sink.send(Message::Close(None)).await {
                    debug!("Failed to send close to {}: {}", url, e);
                }
                break;
            }
            message = source.next() => match message {
                Some(Ok(Message::Text(payload))) => {
                    sequence += 1;
                    frame_tx.send_replace(Some(StreamFrame::new(payload.as_str(), sequence)));
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("Frame stream {} closed by peer", url);
                    break;
                }
                Some(Ok(other)) => {
                    debug!("Ignoring non-text stream message ({} bytes)", other.len());
                }
                Some(Err(e)) => {
                    error!("{}", StreamError::Receive(e));
                    break;
                }
            }
        }
    }
    info!("Frame stream {} finished after {} frames", url, sequence);
}
