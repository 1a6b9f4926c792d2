//! Custom Error and Result types for this library

use std::{
    any::Any,
    sync::{MutexGuard, PoisonError},
};
use thiserror::Error;

use crate::{
    packet::{Reader, Sender, arp_packet::ArpPacketBuilderError},
    scanners::host_scanner::HostScannerBuilderError,
};

/// Custom Error type for this library
///
/// Errors are cloneable so the terminal error of a scan can be read any
/// number of times after the scanner finishes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Error coming directly off the wire
    #[error("wire error: {0}")]
    Wire(String),

    /// Failure listing the network interfaces of this system
    #[error("failed to list network interfaces: {0}")]
    Enumeration(String),

    /// Failure opening a capture session on an interface
    #[error("interface [{interface}] error: {error}")]
    SessionOpen {
        /// Name of the interface
        interface: String,
        /// The underlying error message
        error: String,
    },

    /// Failure transmitting an ARP request
    #[error("interface [{interface}] error: error writing packets: {error}")]
    Write {
        /// Name of the interface
        interface: String,
        /// The underlying error message
        error: String,
    },

    /// Failure reading from a capture session, timeouts excluded
    #[error("interface [{interface}] error: error reading packets: {error}")]
    Read {
        /// Name of the interface
        interface: String,
        /// The underlying error message
        error: String,
    },

    /// Prefix length outside of 0..=32
    #[error("invalid IPv4 prefix length: /{0}")]
    InvalidPrefix(u8),

    /// Error obtaining lock on packet reader
    #[error("failed to get lock on packet reader: {0}")]
    PacketReaderLock(String),

    /// Error obtaining lock on packet sender
    #[error("failed to get lock on packet sender: {0}")]
    PacketSenderLock(String),

    /// Generic thread error
    #[error("thread error: {0}")]
    ThreadError(String),

    /// Error generated during ARP packet construction
    #[error("failed to build ARP packet: {0}")]
    ArpPacketBuild(String),

    /// Error resulting from failure to build the host scanner
    #[error("failed to build host scanner: {0}")]
    HostScannerBuild(String),

    /// A scan was requested while another one is in progress
    #[error("host scanner is already running")]
    AlreadyRunning,
}

impl From<Box<dyn Any + Send>> for ScanError {
    fn from(value: Box<dyn Any + Send>) -> Self {
        if let Some(s) = value.downcast_ref::<&'static str>() {
            Self::ThreadError(format!("Thread panicked with: {}", s))
        } else if let Some(s) = value.downcast_ref::<String>() {
            Self::ThreadError(format!("Thread panicked with: {}", s))
        } else {
            Self::ThreadError("Thread panicked with an unknown type".into())
        }
    }
}

impl<'a> From<PoisonError<MutexGuard<'a, dyn Reader + 'static>>> for ScanError {
    fn from(value: PoisonError<MutexGuard<'a, dyn Reader + 'static>>) -> Self {
        Self::PacketReaderLock(value.to_string())
    }
}

impl<'a> From<PoisonError<MutexGuard<'a, dyn Sender + 'static>>> for ScanError {
    fn from(value: PoisonError<MutexGuard<'a, dyn Sender + 'static>>) -> Self {
        Self::PacketSenderLock(value.to_string())
    }
}

impl From<ArpPacketBuilderError> for ScanError {
    fn from(value: ArpPacketBuilderError) -> Self {
        Self::ArpPacketBuild(value.to_string())
    }
}

impl From<HostScannerBuilderError> for ScanError {
    fn from(value: HostScannerBuilderError) -> Self {
        Self::HostScannerBuild(value.to_string())
    }
}

impl ScanError {
    /// Wraps a failure to open a capture session on the named interface
    pub fn session_open(interface: &str, error: impl ToString) -> Self {
        Self::SessionOpen {
            interface: interface.to_string(),
            error: error.to_string(),
        }
    }

    /// Wraps a failure to write a packet on the named interface
    pub fn write(interface: &str, error: impl ToString) -> Self {
        Self::Write {
            interface: interface.to_string(),
            error: error.to_string(),
        }
    }

    /// Wraps a failure to read a packet on the named interface
    pub fn read(interface: &str, error: impl ToString) -> Self {
        Self::Read {
            interface: interface.to_string(),
            error: error.to_string(),
        }
    }
}

/// Custom Result type for this library. All Errors exposed by this library
/// will be returned as [`ScanError`]
pub type Result<T> = std::result::Result<T, ScanError>;
