//! Provides data structures and implementations for discovering hosts
//!
//! A [`host_scanner::HostScanner`] runs one ARP sweep loop per usable
//! network interface and streams every newly discovered [`Host`] to the
//! consumer as a [`ScanMessage`].

#[cfg(test)]
use mockall::automock;

use log::*;
use std::{
    sync::{Arc, Mutex, PoisonError, mpsc},
    thread::JoinHandle,
    time::Duration,
};

use crate::{error::Result, host::Host};

/// Default pause between two ARP sweeps of the same subnet
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug)]
/// Messages streamed to the consumer of a scan
pub enum ScanMessage {
    /// Sent once for every newly discovered host
    HostFound(Host),
    /// Sent exactly once when scanning has completed. The channel is closed
    /// right after it
    Done,
}

/// Shared handle on the consumer's message channel
///
/// All clones share one sender. [`Notifier::close`] sends
/// [`ScanMessage::Done`] and drops the sender so a consumer iterating the
/// receiver terminates.
#[derive(Debug, Clone)]
pub struct Notifier(Arc<Mutex<Option<mpsc::Sender<ScanMessage>>>>);

impl From<mpsc::Sender<ScanMessage>> for Notifier {
    fn from(value: mpsc::Sender<ScanMessage>) -> Self {
        Self(Arc::new(Mutex::new(Some(value))))
    }
}

impl Notifier {
    /// Sends a message to the consumer. Returns false if the channel is closed
    /// or the consumer went away
    pub fn notify(&self, msg: ScanMessage) -> bool {
        let sender = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        match sender.as_ref() {
            Some(tx) => match tx.send(msg) {
                Ok(()) => true,
                Err(e) => {
                    debug!("scan consumer is gone, dropping message: {:?}", e.0);
                    false
                }
            },
            None => false,
        }
    }

    /// Sends [`ScanMessage::Done`] and closes the channel. Returns true only
    /// for the call that closed it
    pub fn close(&self) -> bool {
        let mut sender = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        match sender.take() {
            Some(tx) => {
                // consumer may already be gone
                let _ = tx.send(ScanMessage::Done);
                true
            }
            None => false,
        }
    }
}

#[cfg_attr(test, automock)]
/// Trait used by all scanners
pub trait Scanner: Sync + Send {
    /// Performs network scanning in a background thread
    fn scan(&self) -> JoinHandle<Result<()>>;

    /// Cancels scanning and blocks until it has fully stopped
    fn stop(&self);
}

pub mod host_scanner;
mod interface_scan;

#[cfg(test)]
#[path = "./scanners_tests.rs"]
mod tests;
