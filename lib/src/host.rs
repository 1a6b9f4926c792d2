//! Provides the data structure representing a discovered host

use md5::{Digest, Md5};
use pnet::util::MacAddr;
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash, net::Ipv4Addr, sync::OnceLock};

/// Returns the deduplication key for an address pair: the MD5 digest of
/// `ip + mac`, rendered as 32 lowercase hex characters
///
/// Strings are hashed exactly as given, no case or whitespace normalization
/// is applied.
///
/// ```
/// # use hostsweep::host::identify;
/// assert_eq!(
///     identify("192.168.1.1", "28:6c:07:48:66:be"),
///     "7a48a7ba6494c7eb4c06e4787e9a6a88"
/// );
/// ```
pub fn identify(ip: &str, mac: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(ip.as_bytes());
    hasher.update(mac.as_bytes());
    hex::encode(hasher.finalize())
}

fn serialize_to_string<S, T>(val: &T, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::Display,
{
    s.serialize_str(&val.to_string())
}

fn deserialize_from_str<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let s = String::deserialize(d)?;
    s.parse::<T>().map_err(serde::de::Error::custom)
}

/// Data structure representing a host discovered on the network
///
/// A host is immutable once created. Its ID is derived from the address pair
/// on first use and cached for the lifetime of the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    ip: Ipv4Addr,
    #[serde(
        serialize_with = "serialize_to_string",
        deserialize_with = "deserialize_from_str"
    )]
    mac: MacAddr,
    #[serde(skip)]
    id: OnceLock<String>,
}

impl Host {
    /// Returns a new Host for the provided address pair
    pub fn new(ip: Ipv4Addr, mac: MacAddr) -> Self {
        Self {
            ip,
            mac,
            id: OnceLock::new(),
        }
    }

    /// IPv4 of the host
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    /// MAC address of the host
    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    /// Returns the unique ID of this host, see [`identify`]
    pub fn id(&self) -> &str {
        self.id
            .get_or_init(|| identify(&self.ip.to_string(), &self.mac.to_string()))
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[IP: {}] [MAC: {}]", self.ip, self.mac)
    }
}

impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip && self.mac == other.mac
    }
}

impl Eq for Host {}

impl Hash for Host {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ip.hash(state);
        self.mac.hash(state);
    }
}

impl Ord for Host {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ip.cmp(&other.ip).then_with(|| self.mac.cmp(&other.mac))
    }
}

impl PartialOrd for Host {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
#[path = "./host_tests.rs"]
mod tests;
