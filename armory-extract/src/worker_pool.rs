//! Fixed-size worker pool throttling icon work.
//!
//! N persistent tokio tasks pull jobs from a bounded `async-channel`
//! queue; its `Receiver` is `Clone`, so every worker polls the queue
//! directly and no lock is held across an `await`. Submission runs in a
//! background task, so results can be consumed while jobs are still
//! being queued, and dropping the work sender shuts the pool down once
//! the queue drains.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct WorkerPool<R: Send + 'static> {
    result_rx: mpsc::UnboundedReceiver<R>,
    _handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn `n` workers over `items` and return the pool to receive
    /// results from. Result order follows completion, not submission.
    pub fn start<W, F, Fut>(n: usize, items: Vec<W>, process_fn: F) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let (work_tx, work_rx) = async_channel::bounded::<W>(n.max(1));
        let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
        let process_fn = Arc::new(process_fn);

        let handles: Vec<JoinHandle<()>> = (0..n.max(1))
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    while let Ok(item) = work_rx.recv().await {
                        if result_tx.send(process_fn(item).await).is_err() {
                            break; // receiver dropped, nobody is listening
                        }
                    }
                })
            })
            .collect();
        drop(result_tx);

        tokio::spawn(async move {
            for item in items {
                if work_tx.send(item).await.is_err() {
                    break;
                }
            }
        });

        Self {
            result_rx,
            _handles: handles,
        }
    }

    /// Next result; `None` once every job has been processed.
    pub async fn recv(&mut self) -> Option<R> {
        self.result_rx.recv().await
    }
}
