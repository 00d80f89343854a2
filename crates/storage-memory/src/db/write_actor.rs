use std::any::Any;

use log::error;
use pennywise_core::errors::Result;
use tokio::sync::{mpsc, oneshot};

use super::{read_tables, write_tables, SharedTables, WriteTx};
use crate::change_bus::ChangePublisher;
use crate::errors::StorageError;

// Type alias for the job to be executed by the writer actor.
// It takes the write transaction and returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut WriteTx) -> Result<T> + Send + 'static>;

type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    // Each job is a boxed closure paired with a oneshot sender for the
    // reply. Box<dyn Any + Send> erases the job's return type.
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, Reply)>,
}

impl WriteHandle {
    /// Runs `job` as one transaction on the writer actor.
    ///
    /// Jobs run one at a time, so anything the job reads from the draft
    /// is still current when it writes. An `Err` from the job discards the
    /// draft and its notices.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut WriteTx) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |tx| job(tx).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| StorageError::WriterClosed)?;

        let boxed = ret_rx.await.map_err(|_| StorageError::WriterClosed)??;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| StorageError::UnexpectedResult.into())
    }
}

/// Spawns a background Tokio task that acts as the single writer to the
/// tables. Must be called from within a tokio runtime.
pub fn spawn_writer(tables: SharedTables, publisher: ChangePublisher) -> WriteHandle {
    // The channel is bounded; 1024 is an arbitrary size.
    let (tx, mut rx) = mpsc::channel::<(Job<Box<dyn Any + Send + 'static>>, Reply)>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result = run_transaction(&tables, &publisher, job);
            // The requester may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
        // All handles dropped, the actor terminates.
    });

    WriteHandle { tx }
}

fn run_transaction(
    tables: &SharedTables,
    publisher: &ChangePublisher,
    job: Job<Box<dyn Any + Send + 'static>>,
) -> Result<Box<dyn Any + Send + 'static>> {
    let draft = read_tables(tables)?.clone();
    let mut tx = WriteTx::new(draft);
    let value = job(&mut tx)?;

    let (draft, events) = tx.into_parts();
    match write_tables(tables) {
        Ok(mut guard) => *guard = draft,
        Err(e) => {
            error!("Failed to commit write: {}", e);
            return Err(e);
        }
    }
    publisher.publish(events);
    Ok(value)
}
