//! Background catalog worker: all fetch I/O runs here.
//!
//! The session sends [`FetchTicket`]s over an `mpsc` channel and drains
//! [`CatalogReply`]s on its own schedule. Tickets queued behind a slow fetch
//! are collapsed to the newest one before running, since the catalog would
//! discard every older reply anyway.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chartwiz_core::catalog::{self, FetchTicket, RequestToken};
use chartwiz_core::data::{IndicatorPage, IndicatorSource, SourceError};
use tracing::{debug, warn};

/// Commands sent from the session to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Fetch(FetchTicket),
    Shutdown,
}

/// A finished fetch, tagged with the token it was issued under.
#[derive(Debug, Clone)]
pub struct CatalogReply {
    pub token: RequestToken,
    pub outcome: Result<IndicatorPage, SourceError>,
}

pub struct CatalogWorker {
    commands: Sender<WorkerCommand>,
    replies: Receiver<CatalogReply>,
    handle: Option<JoinHandle<()>>,
}

impl CatalogWorker {
    pub fn spawn(source: Arc<dyn IndicatorSource>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("chartwiz-catalog".into())
            .spawn(move || worker_loop(source, cmd_rx, reply_tx))?;
        Ok(Self {
            commands: cmd_tx,
            replies: reply_rx,
            handle: Some(handle),
        })
    }

    /// Queue a ticket. Hands the token back if the worker has stopped.
    pub fn submit(&self, ticket: FetchTicket) -> Result<(), RequestToken> {
        let token = ticket.token;
        self.commands
            .send(WorkerCommand::Fetch(ticket))
            .map_err(|_| token)
    }

    pub fn try_recv(&self) -> Option<CatalogReply> {
        match self.replies.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<CatalogReply> {
        match self.replies.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for CatalogWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("catalog worker panicked");
            }
        }
    }
}

impl std::fmt::Debug for CatalogWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogWorker")
            .field("running", &self.handle.is_some())
            .finish()
    }
}

fn worker_loop(
    source: Arc<dyn IndicatorSource>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<CatalogReply>,
) {
    loop {
        let mut ticket = match rx.recv() {
            Ok(WorkerCommand::Fetch(ticket)) => ticket,
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
        };

        let mut shutdown = false;
        loop {
            match rx.try_recv() {
                Ok(WorkerCommand::Fetch(newer)) => {
                    debug!(skipped = %ticket.token, newer = %newer.token, "collapsing queued fetch");
                    ticket = newer;
                }
                Ok(WorkerCommand::Shutdown) => {
                    shutdown = true;
                    break;
                }
                Err(_) => break,
            }
        }
        if shutdown {
            break;
        }

        debug!(token = %ticket.token, source = source.name(), "running fetch");
        let outcome = catalog::execute(source.as_ref(), &ticket.request);
        if tx
            .send(CatalogReply {
                token: ticket.token,
                outcome,
            })
            .is_err()
        {
            break;
        }
    }
    debug!("catalog worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartwiz_core::catalog::{CatalogOptions, IndicatorCatalog, Resolution};
    use chartwiz_core::data::FixtureSource;
    use chartwiz_core::domain::{Category, DateWindow};
    use chrono::NaiveDate;

    fn window() -> DateWindow {
        DateWindow::max_until(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn reply_carries_ticket_token() {
        let worker = CatalogWorker::spawn(Arc::new(FixtureSource::new())).unwrap();
        let mut catalog = IndicatorCatalog::new(CatalogOptions::default());
        let ticket = catalog.begin_fetch(Category::Micro, window());
        let token = ticket.token;
        worker.submit(ticket).unwrap();

        let reply = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(reply.token, token);
        assert_eq!(catalog.resolve(reply.token, reply.outcome), Resolution::Applied);
        assert!(!catalog.is_loading());
    }

    #[test]
    fn source_failure_is_delivered_as_reply() {
        let source = FixtureSource::new();
        source.fail_next_fetches(1);
        let worker = CatalogWorker::spawn(Arc::new(source)).unwrap();
        let mut catalog = IndicatorCatalog::new(CatalogOptions::default());
        worker.submit(catalog.begin_fetch(Category::Cta, window())).unwrap();

        let reply = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(reply.outcome.is_err());
    }

    #[test]
    fn drop_stops_thread() {
        let worker = CatalogWorker::spawn(Arc::new(FixtureSource::new())).unwrap();
        drop(worker);
    }
}
