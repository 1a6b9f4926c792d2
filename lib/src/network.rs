//! Provides helpers for selecting scannable network interfaces
//!
//! Every interface reported by the system is classified as either
//! [`Classification::Scannable`] or [`Classification::Skipped`] before any
//! capture session is opened.

#[cfg(test)]
use mockall::automock;

use pnet::{
    datalink::NetworkInterface as PNetNetworkInterface,
    ipnetwork::{IpNetwork, Ipv4Network},
    util::MacAddr,
};
use std::{fmt, net::Ipv4Addr, time::Duration};

use crate::{
    error::Result,
    packet::{
        DEFAULT_READ_TIMEOUT,
        wire::{self, Wire},
    },
    targets::ips::IPTargets,
};

/// Smallest prefix accepted for scanning. Anything wider than a /16 is too
/// large to sweep with one request per address
pub const MIN_PREFIX_LEN: u8 = 16;

/// Represents a network interface that passed the scanning sanity checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    /// Name of the interface
    pub name: String,
    /// Description of the interface
    pub description: String,
    /// Interface index
    pub index: u32,
    /// Interface flags
    pub flags: u32,
    /// Hardware address of the interface
    pub mac: MacAddr,
    /// IPv4 address used as the sender of ARP requests
    pub ipv4: Ipv4Addr,
    /// Prefix length of the IPv4 subnet
    pub prefix: u8,
    /// All IP networks assigned to the interface
    pub ips: Vec<IpNetwork>,
}

impl NetworkInterface {
    /// Returns the subnet mask of the scanned IPv4 network
    pub fn netmask(&self) -> Ipv4Addr {
        let bits = u32::MAX.checked_shl(32 - u32::from(self.prefix)).unwrap_or(0);
        Ipv4Addr::from(bits)
    }

    /// Returns the scanned network in CIDR notation i.e. 192.168.1.0/24
    pub fn cidr(&self) -> String {
        let network = u32::from(self.ipv4) & u32::from(self.netmask());
        format!("{}/{}", Ipv4Addr::from(network), self.prefix)
    }

    /// Returns every address to probe on this interface's subnet
    pub fn targets(&self) -> IPTargets {
        IPTargets::new(self.ipv4, self.netmask())
    }
}

impl From<&NetworkInterface> for PNetNetworkInterface {
    fn from(value: &NetworkInterface) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            index: value.index,
            mac: Some(value.mac),
            ips: value.ips.clone(),
            flags: value.flags,
        }
    }
}

/// Reasons an interface is not scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The interface has no IPv4 address assigned
    NoIpv4Address,
    /// The interface address is a loopback address
    Loopback,
    /// The subnet is wider than [`MIN_PREFIX_LEN`]
    SubnetTooLarge(u8),
    /// The interface has no usable hardware address
    NoHardwareAddress,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoIpv4Address => write!(f, "no ipv4 address"),
            Self::Loopback => write!(f, "loopback address"),
            Self::SubnetTooLarge(prefix) => {
                write!(f, "subnet /{} is larger than /{}", prefix, MIN_PREFIX_LEN)
            }
            Self::NoHardwareAddress => write!(f, "no hardware address"),
        }
    }
}

/// Result of checking a system interface before scanning it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The interface can be scanned
    Scannable(NetworkInterface),
    /// The interface is ignored
    Skipped {
        /// Name of the interface
        name: String,
        /// Why it was skipped
        reason: SkipReason,
    },
}

/// Classifies a system interface as scannable or skipped
///
/// When several IPv4 networks are assigned the last one listed is used.
pub fn classify(iface: PNetNetworkInterface) -> Classification {
    let skip = |reason| Classification::Skipped {
        name: iface.name.clone(),
        reason,
    };

    let Some(net) = iface
        .ips
        .iter()
        .filter_map(|ip| match ip {
            IpNetwork::V4(net) => Some(*net),
            IpNetwork::V6(_) => None,
        })
        .last()
    else {
        return skip(SkipReason::NoIpv4Address);
    };

    if net.ip().is_loopback() || iface.is_loopback() {
        return skip(SkipReason::Loopback);
    }

    if net.prefix() < MIN_PREFIX_LEN {
        return skip(SkipReason::SubnetTooLarge(net.prefix()));
    }

    let Some(mac) = iface.mac.filter(|mac| *mac != MacAddr::zero()) else {
        return skip(SkipReason::NoHardwareAddress);
    };

    Classification::Scannable(interface_from_parts(iface, mac, net))
}

fn interface_from_parts(
    iface: PNetNetworkInterface,
    mac: MacAddr,
    net: Ipv4Network,
) -> NetworkInterface {
    NetworkInterface {
        name: iface.name,
        description: iface.description,
        index: iface.index,
        flags: iface.flags,
        mac,
        ipv4: net.ip(),
        prefix: net.prefix(),
        ips: iface.ips,
    }
}

/// Trait describing access to the system's network interfaces
#[cfg_attr(test, automock)]
pub trait Network: Send + Sync {
    /// Lists every network interface on the system
    fn interfaces(&self) -> Result<Vec<PNetNetworkInterface>>;

    /// Opens a capture session bound to the provided interface
    fn open(&self, interface: &NetworkInterface) -> Result<Wire>;
}

/// [`Network`] implementation backed by pnet's datalink layer
#[derive(Debug, Clone)]
pub struct SystemNetwork {
    read_timeout: Duration,
}

impl SystemNetwork {
    /// Returns a SystemNetwork whose reads give up after `read_timeout`
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }
}

impl Default for SystemNetwork {
    fn default() -> Self {
        Self::new(DEFAULT_READ_TIMEOUT)
    }
}

impl Network for SystemNetwork {
    fn interfaces(&self) -> Result<Vec<PNetNetworkInterface>> {
        Ok(pnet::datalink::interfaces())
    }

    fn open(&self, interface: &NetworkInterface) -> Result<Wire> {
        wire::open(interface, self.read_timeout)
    }
}

#[cfg(test)]
#[path = "./network_tests.rs"]
mod tests;
