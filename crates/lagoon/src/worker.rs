//! Off-thread delivery for the one-shot layouts.
//!
//! Each call spawns a dedicated worker thread that owns its copy of the graph. The layered
//! result comes back through a oneshot channel; annealing frames are streamed through a bounded
//! channel, so a slow consumer applies backpressure to the worker instead of buffering every
//! frame.

use crate::{Error, Result};
use futures::channel::{mpsc, oneshot};
use futures::executor::block_on;
use futures::{FutureExt, SinkExt, Stream, StreamExt};
use lagoon_graph::Graph;
use lagoon_layered::{LayeredLayout, LayeredOptions};
use lagoon_physics::{AnnealFrame, AnnealOptions, CancelToken, anneal};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;

/// Frames the annealing worker may run ahead of its consumer.
pub const FRAME_BUFFER: usize = 4;

/// Pending layered layout. Resolves to [`Error::WorkerGone`] if the worker dies first.
#[derive(Debug)]
pub struct LayeredTask {
    rx: oneshot::Receiver<LayeredLayout>,
}

impl Future for LayeredTask {
    type Output = Result<LayeredLayout>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.rx.poll_unpin(cx).map(|r| r.map_err(|_| Error::WorkerGone))
    }
}

pub fn spawn_layered(graph: Graph, options: LayeredOptions) -> Result<LayeredTask> {
    let (tx, rx) = oneshot::channel();
    thread::Builder::new()
        .name("lagoon-layered".to_string())
        .spawn(move || {
            let out = lagoon_layered::layout(&graph, &options);
            if tx.send(out).is_err() {
                tracing::debug!("layered result dropped: task was abandoned");
            }
        })?;
    Ok(LayeredTask { rx })
}

/// Frames of an annealed layout computed on a worker thread.
///
/// Dropping the stream or calling [`AnnealStream::cancel`] stops the worker before its next
/// frame.
#[derive(Debug)]
pub struct AnnealStream {
    rx: mpsc::Receiver<AnnealFrame>,
    cancel: CancelToken,
    done: bool,
}

impl AnnealStream {
    /// Stops the worker and drops every frame still buffered. The stream ends immediately.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.rx.close();
        while let Ok(Some(_)) = self.rx.try_next() {}
        self.done = true;
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl Stream for AnnealStream {
    type Item = AnnealFrame;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }
        self.rx.poll_next_unpin(cx)
    }
}

impl Drop for AnnealStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub fn spawn_anneal(graph: Graph, options: AnnealOptions) -> Result<AnnealStream> {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    let (mut tx, rx) = mpsc::channel(FRAME_BUFFER);
    thread::Builder::new()
        .name("lagoon-anneal".to_string())
        .spawn(move || {
            let mut sent = 0usize;
            for frame in anneal(&graph, &options, token) {
                if block_on(tx.send(frame)).is_err() {
                    break;
                }
                sent += 1;
            }
            tracing::debug!(frames = sent, "anneal worker finished");
        })?;
    Ok(AnnealStream {
        rx,
        cancel,
        done: false,
    })
}
