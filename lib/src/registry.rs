//! Provides the thread-safe set of hosts discovered during one scan

use itertools::Itertools;
use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{error::ScanError, host::Host};

#[derive(Debug, Default)]
struct RegistryState {
    seen: HashSet<String>,
    hosts: Vec<Host>,
    error: Option<ScanError>,
    closed: bool,
}

/// The set of uniquely discovered hosts and the terminal error of a scan
///
/// Every interface loop of a scanner shares one registry. All reads and
/// writes go through a single lock, so [`HostRegistry::insert`] is an atomic
/// check-then-insert and the first recorded error always wins.
#[derive(Debug, Default)]
pub struct HostRegistry {
    state: Mutex<RegistryState>,
}

impl HostRegistry {
    /// Returns an empty, open registry
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the host unless its ID is already present or the registry is
    /// closed. Returns true only when the host was newly inserted
    pub fn insert(&self, host: Host) -> bool {
        let mut state = self.lock();

        if state.closed || state.seen.contains(host.id()) {
            return false;
        }

        state.seen.insert(host.id().to_string());
        state.hosts.push(host);

        true
    }

    /// Returns true if a host with the same ID has been stored
    pub fn contains(&self, host: &Host) -> bool {
        self.lock().seen.contains(host.id())
    }

    /// Returns a snapshot of every stored host sorted by IP
    pub fn hosts(&self) -> Vec<Host> {
        self.lock().hosts.iter().cloned().sorted().collect()
    }

    /// Returns the number of stored hosts
    pub fn len(&self) -> usize {
        self.lock().hosts.len()
    }

    /// Returns true if no host has been stored
    pub fn is_empty(&self) -> bool {
        self.lock().hosts.is_empty()
    }

    /// Records `error` as the terminal error unless one is already set.
    /// Returns true if this error was recorded
    pub fn fail(&self, error: ScanError) -> bool {
        let mut state = self.lock();

        if state.error.is_some() {
            return false;
        }

        state.error = Some(error);

        true
    }

    /// Returns the terminal error, if any
    pub fn error(&self) -> Option<ScanError> {
        self.lock().error.clone()
    }

    /// Stops accepting new hosts. Returns true only for the first call
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        let was_open = !state.closed;
        state.closed = true;
        was_open
    }

    /// Returns true once the registry stopped accepting hosts
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

#[cfg(test)]
#[path = "./registry_tests.rs"]
mod tests;
