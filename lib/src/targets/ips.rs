//! Provides helpers for enumerating the IP targets of a subnet

use std::net::Ipv4Addr;

use crate::error::{Result, ScanError};

/// Represents every host address of an IPv4 subnet
///
/// Only the base address and mask are stored; addresses are produced lazily
/// each time the targets are looped so a /16 never sits in memory. The base
/// network address is included and the all-ones broadcast address is not.
///
/// # Examples
///
/// ```
/// # use std::net::Ipv4Addr;
/// # use hostsweep::error::Result;
/// # use hostsweep::targets::ips::IPTargets;
/// let print_ip = |ip: Ipv4Addr| -> Result<()> {
///   println!("ip: {}", ip);
///   Ok(())
/// };
/// let ips = IPTargets::from_prefix(Ipv4Addr::new(192, 168, 68, 1), 24).unwrap();
/// assert_eq!(ips.len(), 255);
/// ips.lazy_loop(print_ip).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IPTargets {
    base: u32,
    mask: u32,
}

impl IPTargets {
    /// Returns the targets of the subnet `network` / `mask`. Host bits set in
    /// `network` are masked off
    pub fn new(network: Ipv4Addr, mask: Ipv4Addr) -> Self {
        let mask = u32::from(mask);
        Self {
            base: u32::from(network) & mask,
            mask,
        }
    }

    /// Returns the targets of the subnet `network` / `prefix`
    pub fn from_prefix(network: Ipv4Addr, prefix: u8) -> Result<Self> {
        let net = ipnet::Ipv4Net::new(network, prefix)
            .map_err(|_| ScanError::InvalidPrefix(prefix))?;
        Ok(Self::new(net.network(), net.netmask()))
    }

    /// Returns the masked base address of the subnet
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.base)
    }

    /// Returns the number of addresses produced: 2^(host bits) - 1
    pub fn len(&self) -> usize {
        (u32::MAX - self.mask) as usize
    }

    /// Returns true if the subnet yields no targets i.e. a /32
    pub fn is_empty(&self) -> bool {
        self.mask == u32::MAX
    }

    /// Returns an iterator over every target, starting at the base address
    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let base = self.base;
        (0..u32::MAX - self.mask).map(move |offset| Ipv4Addr::from(base.wrapping_add(offset)))
    }

    /// loops over all targets in the subnet, stopping at the first error
    pub fn lazy_loop<F: FnMut(Ipv4Addr) -> Result<()>>(&self, mut cb: F) -> Result<()> {
        for ip in self.iter() {
            cb(ip)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "./ips_tests.rs"]
mod tests;
