//! Provides Scanner implementation for discovering hosts on every local subnet

use derive_builder::Builder;
use log::*;
use pnet::datalink::NetworkInterface as PNetNetworkInterface;
use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    cancel::CancelToken,
    error::{Result, ScanError},
    host::Host,
    network::{self, Classification, Network, NetworkInterface, SystemNetwork},
    packet::DEFAULT_PACKET_SEND_TIMING,
    registry::HostRegistry,
};

use super::{Notifier, SWEEP_INTERVAL, Scanner, interface_scan::InterfaceScan};

/// Lifecycle states of a [`HostScanner`]. Transitions only move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Built but never started
    Created,
    /// Interface loops are running
    Running,
    /// Every loop has exited and the stream is closed
    Finished,
}

#[derive(Debug)]
struct Lifecycle {
    state: Mutex<ScanState>,
    finished: Condvar,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: Mutex::new(ScanState::Created),
            finished: Condvar::new(),
        }
    }
}

/// Data structure representing a scanner that sweeps every usable interface
/// with ARP requests and reports each host that answers
///
/// Clones share the same scan: stopping or inspecting any clone affects and
/// reflects all of them.
///
/// Example
/// ```no_run
/// # use std::sync::mpsc;
/// # use hostsweep::scanners::{ScanMessage, Scanner, host_scanner::HostScanner};
/// let (tx, rx) = mpsc::channel();
/// let scanner = HostScanner::new(tx);
/// let handle = scanner.scan();
///
/// for msg in rx {
///     if let ScanMessage::HostFound(host) = msg {
///         println!("{host}");
///     }
/// }
///
/// handle.join().unwrap().unwrap();
/// ```
#[derive(Clone, Builder)]
#[builder(setter(into))]
pub struct HostScanner {
    /// Channel for streaming discovered hosts to the consumer
    notifier: Notifier,
    /// Source of interfaces and capture sessions
    #[builder(default = "Arc::new(SystemNetwork::default())")]
    network: Arc<dyn Network>,
    /// Pause between two sweeps of the same subnet
    #[builder(default = "SWEEP_INTERVAL")]
    sweep_interval: Duration,
    /// Pause before each ARP request
    #[builder(default = "DEFAULT_PACKET_SEND_TIMING")]
    send_throttle: Duration,
    #[builder(setter(skip))]
    registry: Arc<HostRegistry>,
    #[builder(setter(skip))]
    cancel: CancelToken,
    #[builder(setter(skip))]
    lifecycle: Arc<Lifecycle>,
}

impl HostScanner {
    /// Returns builder for HostScanner
    pub fn builder() -> HostScannerBuilder {
        HostScannerBuilder::default()
    }

    /// Returns a HostScanner using the system's interfaces and default timings
    pub fn new(notifier: impl Into<Notifier>) -> Self {
        Self {
            notifier: notifier.into(),
            network: Arc::new(SystemNetwork::default()),
            sweep_interval: SWEEP_INTERVAL,
            send_throttle: DEFAULT_PACKET_SEND_TIMING,
            registry: Arc::default(),
            cancel: CancelToken::new(),
            lifecycle: Arc::default(),
        }
    }

    fn lifecycle(&self) -> MutexGuard<'_, ScanState> {
        self.lifecycle
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the scan on the calling thread until it is stopped or fails
    ///
    /// Returns [`ScanError::AlreadyRunning`] if another call is in progress.
    /// Once finished, further calls return the same terminal result without
    /// scanning again.
    pub fn run(&self) -> Result<()> {
        {
            let mut state = self.lifecycle();

            match *state {
                ScanState::Running => return Err(ScanError::AlreadyRunning),
                ScanState::Finished => return self.result(),
                ScanState::Created => *state = ScanState::Running,
            }
        }

        debug!("starting host scan");

        match self.network.interfaces() {
            Ok(interfaces) => self.scan_interfaces(interfaces),
            Err(e) => self.fail(ScanError::Enumeration(e.to_string())),
        }

        self.finish(&mut self.lifecycle());

        debug!("host scan finished with {} hosts", self.registry.len());

        self.result()
    }

    fn scan_interfaces(&self, interfaces: Vec<PNetNetworkInterface>) {
        let scannable: Vec<NetworkInterface> = interfaces
            .into_iter()
            .filter_map(|iface| match network::classify(iface) {
                Classification::Scannable(interface) => Some(interface),
                Classification::Skipped { name, reason } => {
                    debug!("skipping interface {}: {}", name, reason);
                    None
                }
            })
            .collect();

        if scannable.is_empty() {
            warn!("no scannable network interfaces found");
            return;
        }

        thread::scope(|s| {
            let handles: Vec<_> = scannable
                .iter()
                .map(|interface| {
                    s.spawn(move || {
                        if let Err(e) = self.interface_scan(interface).run() {
                            self.fail(e);
                        }
                    })
                })
                .collect();

            for handle in handles {
                if let Err(e) = handle.join() {
                    self.fail(ScanError::from(e));
                }
            }
        });
    }

    fn interface_scan<'a>(&'a self, interface: &'a NetworkInterface) -> InterfaceScan<'a> {
        InterfaceScan {
            interface,
            network: self.network.as_ref(),
            registry: self.registry.as_ref(),
            notifier: &self.notifier,
            cancel: &self.cancel,
            sweep_interval: self.sweep_interval,
            send_throttle: self.send_throttle,
        }
    }

    // first failure wins and tears the whole scan down
    fn fail(&self, error: ScanError) {
        if self.cancel.is_cancelled() {
            debug!("discarding error after cancellation: {}", error);
            return;
        }

        if self.registry.fail(error.clone()) {
            error!("host scan failed: {}", error);
        } else {
            debug!("discarding error after first failure: {}", error);
        }

        self.cancel.cancel();
    }

    fn finish(&self, state: &mut ScanState) {
        self.registry.close();
        self.notifier.close();
        *state = ScanState::Finished;
        self.lifecycle.finished.notify_all();
    }

    fn result(&self) -> Result<()> {
        match self.registry.error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Returns the current lifecycle state
    pub fn state(&self) -> ScanState {
        *self.lifecycle()
    }

    /// Returns true once the scan has completely stopped
    pub fn is_finished(&self) -> bool {
        self.state() == ScanState::Finished
    }

    /// Blocks until the scan has finished. A scanner that is never started
    /// or stopped never finishes
    pub fn wait(&self) {
        let state = self.lifecycle();

        let _state = self
            .lifecycle
            .finished
            .wait_while(state, |s| *s != ScanState::Finished)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Returns the terminal error, if any
    pub fn error(&self) -> Option<ScanError> {
        self.registry.error()
    }

    /// Returns a snapshot of the hosts discovered so far, sorted by IP
    pub fn hosts(&self) -> Vec<Host> {
        self.registry.hosts()
    }
}

// Implements the Scanner trait for HostScanner
impl Scanner for HostScanner {
    fn scan(&self) -> JoinHandle<Result<()>> {
        let scanner = self.clone();
        thread::spawn(move || scanner.run())
    }

    fn stop(&self) {
        if self.cancel.cancel() {
            debug!("stopping host scan");
        }

        let mut state = self.lifecycle();

        if *state == ScanState::Created {
            self.finish(&mut state);
            return;
        }

        drop(state);

        self.wait();
    }
}

#[cfg(test)]
#[path = "./host_scanner_tests.rs"]
mod tests;
