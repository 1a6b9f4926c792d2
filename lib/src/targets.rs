//! Provides helpers for enumerating scan targets

pub mod ips;
