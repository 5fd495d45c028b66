//! # Result Sink
//!
//! Appends discovered vhosts to a SQLite file. The connection is opened on the
//! first non-empty batch, so a run that finds nothing never touches the disk.
//!
//! Rows are never updated or deleted; scanning a target twice stores its
//! vhosts twice. Values are bound as statement parameters, so quotes inside a
//! target or vhost are stored verbatim.
//!
//! Concurrent target pipelines never share the connection directly. They send
//! batches to the single writer started by [`spawn_writer`].

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;
use vscout_common::models::ProbeOutcome;

use crate::error::SinkError;

pub const TABLE: &str = "enumerated_vhosts";

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS enumerated_vhosts (
        target               TEXT    NOT NULL,
        vhost                TEXT    NOT NULL,
        baseline_fingerprint TEXT    NOT NULL,
        spoofed_fingerprint  TEXT    NOT NULL,
        status_code          INTEGER NOT NULL
    );
";

const INSERT_SQL: &str = "
    INSERT INTO enumerated_vhosts
        (target, vhost, baseline_fingerprint, spoofed_fingerprint, status_code)
    VALUES (?1, ?2, ?3, ?4, ?5)
";

/// Result of handing a batch to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistReport {
    /// The batch was empty; the store was not opened.
    Nothing,
    Written(usize),
}

impl PersistReport {
    pub fn rows(&self) -> usize {
        match self {
            PersistReport::Nothing => 0,
            PersistReport::Written(rows) => *rows,
        }
    }
}

pub struct SqliteSink {
    path: PathBuf,
    conn: Option<Connection>,
    schema_ready: bool,
}

impl SqliteSink {
    /// Prepares a sink for `path` without opening it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
            schema_ready: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Writes `records` as one transaction.
    ///
    /// The first failing row aborts the batch and rolls back the rows before it.
    pub fn persist(&mut self, records: &[ProbeOutcome]) -> Result<PersistReport, SinkError> {
        let Some(first) = records.first() else {
            return Ok(PersistReport::Nothing);
        };
        let batch_target = first.target.clone();

        self.ensure_schema()?;
        let conn = self.connection()?;

        let tx = conn.transaction().map_err(|source| SinkError::Transaction {
            target: batch_target.clone(),
            source,
        })?;

        for record in records {
            tx.execute(
                INSERT_SQL,
                params![
                    record.target,
                    record.vhost,
                    record.baseline_fingerprint.as_str(),
                    record.spoofed_fingerprint.as_str(),
                    record.status_code,
                ],
            )
            .map_err(|source| SinkError::Write {
                target: record.target.clone(),
                vhost: record.vhost.clone(),
                source,
            })?;
        }

        tx.commit().map_err(|source| SinkError::Transaction {
            target: batch_target,
            source,
        })?;

        debug!(rows = records.len(), table = TABLE, "batch persisted");
        Ok(PersistReport::Written(records.len()))
    }

    /// Closes the store. A sink that was never opened closes trivially.
    pub fn close(self) -> Result<(), SinkError> {
        let Some(conn) = self.conn else {
            return Ok(());
        };
        conn.close().map_err(|(_conn, source)| SinkError::Close {
            path: self.path,
            source,
        })
    }

    fn connection(&mut self) -> Result<&mut Connection, SinkError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => Connection::open(&self.path).map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?,
        };
        Ok(self.conn.insert(conn))
    }

    fn ensure_schema(&mut self) -> Result<(), SinkError> {
        if self.schema_ready {
            return Ok(());
        }
        self.connection()?
            .execute_batch(CREATE_TABLE_SQL)
            .map_err(|source| SinkError::Schema { table: TABLE, source })?;
        self.schema_ready = true;
        Ok(())
    }
}

struct PersistRequest {
    records: Vec<ProbeOutcome>,
    reply: oneshot::Sender<Result<PersistReport, SinkError>>,
}

/// Cloneable front of the single writer task.
#[derive(Clone)]
pub struct SinkHandle {
    tx: mpsc::Sender<PersistRequest>,
}

impl SinkHandle {
    /// Queues a batch and waits for the writer's verdict.
    ///
    /// Empty batches are answered here without reaching the writer.
    pub async fn persist(&self, records: Vec<ProbeOutcome>) -> Result<PersistReport, SinkError> {
        if records.is_empty() {
            return Ok(PersistReport::Nothing);
        }
        let (reply, verdict) = oneshot::channel();
        self.tx
            .send(PersistRequest { records, reply })
            .await
            .map_err(|_| SinkError::WriterGone)?;
        verdict.await.map_err(|_| SinkError::WriterGone)?
    }
}

/// Moves `sink` onto a blocking thread that drains batches in arrival order.
///
/// The join handle yields the sink back once every [`SinkHandle`] is dropped,
/// so the caller can close it explicitly.
pub fn spawn_writer(mut sink: SqliteSink) -> (SinkHandle, JoinHandle<SqliteSink>) {
    let (tx, mut rx) = mpsc::channel::<PersistRequest>(16);
    let handle = tokio::task::spawn_blocking(move || {
        while let Some(request) = rx.blocking_recv() {
            let verdict = sink.persist(&request.records);
            let _ = request.reply.send(verdict);
        }
        sink
    });
    (SinkHandle { tx }, handle)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
