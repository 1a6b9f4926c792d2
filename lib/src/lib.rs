//! Library package for discovering the hosts present on every local subnet
//!
//! Each usable network interface is swept with ARP requests for every
//! address of its subnet while replies are collected on a second thread.
//! Every host that answers is reported once per scan, identified by an MD5
//! digest of its IPv4 and MAC address pair.
//!
//! # Examples
//!
//! ## Host Scanning
//!
//! <https://github.com/hostsweep/hostsweep/blob/main/lib/examples/host-scanner.rs>
//!
//! ```bash
//! sudo -E cargo run --example host-scanner -p hostsweep
//! ```

#![deny(missing_docs)]
pub mod cancel;
pub mod error;
pub mod host;
pub mod network;
pub mod packet;
pub mod registry;
pub mod scanners;
pub mod targets;
