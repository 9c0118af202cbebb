// src/update/dispatch.rs

//! Background dispatch and the completion channel
//!
//! One update command runs its pipeline on a background task while the
//! command thread blocks until the work reports back. The two sides share
//! exactly one thing: an unbounded channel of completion signals. Posting
//! never blocks the background task, even if the drain has not started;
//! draining consumes exactly one signal per dispatched invocation.

use crate::error::{Error, Result};
use std::future::Future;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Marker posted to the completion channel once per dispatched invocation,
/// success or failure — it carries no payload beyond "this unit of work
/// has finished"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionSignal;

/// Runs work on a background task and tracks its completion
pub struct Dispatcher {
    handle: Handle,
    tx: UnboundedSender<CompletionSignal>,
    rx: UnboundedReceiver<CompletionSignal>,
    dispatched: usize,
}

impl Dispatcher {
    pub fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handle,
            tx,
            rx,
            dispatched: 0,
        }
    }

    /// Spawn `work` on the runtime and return immediately
    ///
    /// A completion signal is posted after the future finishes. The work
    /// must handle its own failures; by the time it reaches this boundary
    /// it is infallible.
    pub fn dispatch<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.dispatched += 1;
        self.handle.spawn(async move {
            work.await;
            let _ = tx.send(CompletionSignal);
        });
    }

    /// Block until every dispatched invocation has signalled completion
    ///
    /// Must be called from a thread that is not driving the runtime; the
    /// receive parks the calling thread, not a task.
    pub fn drain(&mut self) -> Result<()> {
        while self.dispatched > 0 {
            match self.rx.blocking_recv() {
                Some(CompletionSignal) => self.dispatched -= 1,
                None => return Err(Error::ChannelClosed),
            }
        }
        Ok(())
    }

    /// Invocations dispatched but not yet drained
    pub fn pending(&self) -> usize {
        self.dispatched
    }
}
