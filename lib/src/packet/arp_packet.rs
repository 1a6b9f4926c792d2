//! Provides helpers for creating ARP request packets and reading ARP replies

use derive_builder::Builder;
use pnet::{
    packet::{MutablePacket, Packet, arp, ethernet},
    util::MacAddr,
};
use std::net::Ipv4Addr;

use crate::error::{Result, ScanError};

// Constants used to help locate our nested packets
const PKT_ETH_SIZE: usize = ethernet::EthernetPacket::minimum_packet_size();
const PKT_ARP_SIZE: usize = arp::ArpPacket::minimum_packet_size();

/// Total size of an Ethernet frame carrying an ARP packet, excluding padding
pub const PKT_TOTAL_SIZE: usize = PKT_ETH_SIZE + PKT_ARP_SIZE;

/// Represents an ARP request broadcast on the local link
///
/// # Examples
///
/// ```
/// # use std::net::Ipv4Addr;
/// # use pnet::util::MacAddr;
/// # use hostsweep::packet::arp_packet::ArpPacketBuilder;
/// let packet = ArpPacketBuilder::default()
///     .source_ip(Ipv4Addr::new(192, 168, 1, 100))
///     .source_mac(MacAddr::new(0x28, 0x6c, 0x07, 0x48, 0x66, 0xbe))
///     .dest_ip(Ipv4Addr::new(192, 168, 1, 1))
///     .build()
///     .unwrap();
/// let frame = packet.to_raw().unwrap();
/// assert_eq!(frame.len(), 42);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ArpPacket {
    /// IPv4 of the interface sending the request
    source_ip: Ipv4Addr,
    /// MAC of the interface sending the request
    source_mac: MacAddr,
    /// IPv4 being resolved
    dest_ip: Ipv4Addr,
}

impl ArpPacket {
    /// Serializes the request into a broadcast Ethernet frame
    pub fn to_raw(&self) -> Result<[u8; PKT_TOTAL_SIZE]> {
        let mut pkt_buf = [0u8; PKT_TOTAL_SIZE];

        let mut pkt_eth = ethernet::MutableEthernetPacket::new(&mut pkt_buf)
            .ok_or_else(|| {
                ScanError::ArpPacketBuild(
                    "failed to generate ethernet packet".into(),
                )
            })?;

        pkt_eth.set_destination(MacAddr::broadcast());
        pkt_eth.set_source(self.source_mac);
        pkt_eth.set_ethertype(ethernet::EtherTypes::Arp);

        let mut pkt_arp = arp::MutableArpPacket::new(pkt_eth.payload_mut())
            .ok_or_else(|| {
                ScanError::ArpPacketBuild("failed to generate arp packet".into())
            })?;

        pkt_arp.set_hardware_type(arp::ArpHardwareTypes::Ethernet);
        pkt_arp.set_protocol_type(ethernet::EtherTypes::Ipv4);
        pkt_arp.set_hw_addr_len(6);
        pkt_arp.set_proto_addr_len(4);
        pkt_arp.set_operation(arp::ArpOperations::Request);
        pkt_arp.set_sender_hw_addr(self.source_mac);
        pkt_arp.set_sender_proto_addr(self.source_ip);
        pkt_arp.set_target_hw_addr(MacAddr::zero());
        pkt_arp.set_target_proto_addr(self.dest_ip);

        Ok(pkt_buf)
    }
}

/// The sender of an ARP reply observed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    /// IPv4 claimed by the replying device
    pub ip: Ipv4Addr,
    /// Hardware address of the replying device
    pub mac: MacAddr,
}

impl ArpReply {
    /// Decodes a captured frame into an ARP reply
    ///
    /// Returns `None` for frames that are not ARP, ARP packets that are not
    /// replies and replies sent by `interface_mac` itself. The capture session
    /// sees outbound traffic too so our own packets must be dropped here.
    pub fn parse(frame: &[u8], interface_mac: MacAddr) -> Option<Self> {
        let eth = ethernet::EthernetPacket::new(frame)?;

        if eth.get_ethertype() != ethernet::EtherTypes::Arp {
            return None;
        }

        let header = arp::ArpPacket::new(eth.payload())?;

        if header.get_operation() != arp::ArpOperations::Reply {
            return None;
        }

        let mac = header.get_sender_hw_addr();

        if mac == interface_mac {
            return None;
        }

        Some(Self {
            ip: header.get_sender_proto_addr(),
            mac,
        })
    }
}

#[cfg(test)]
#[doc(hidden)]
pub fn create_arp_reply(
    from_mac: MacAddr,
    from_ip: Ipv4Addr,
    to_mac: MacAddr,
    to_ip: Ipv4Addr,
) -> [u8; PKT_TOTAL_SIZE] {
    let mut packet = [0u8; PKT_TOTAL_SIZE];

    let mut pkt_eth = ethernet::MutableEthernetPacket::new(&mut packet)
        .expect("failed to generate ethernet packet");

    pkt_eth.set_destination(to_mac);
    pkt_eth.set_source(from_mac);
    pkt_eth.set_ethertype(ethernet::EtherTypes::Arp);

    let mut pkt_arp = arp::MutableArpPacket::new(pkt_eth.payload_mut())
        .expect("failed to generate arp packet");

    pkt_arp.set_hardware_type(arp::ArpHardwareTypes::Ethernet);
    pkt_arp.set_protocol_type(ethernet::EtherTypes::Ipv4);
    pkt_arp.set_hw_addr_len(6);
    pkt_arp.set_proto_addr_len(4);
    pkt_arp.set_operation(arp::ArpOperations::Reply);
    pkt_arp.set_sender_hw_addr(from_mac);
    pkt_arp.set_sender_proto_addr(from_ip);
    pkt_arp.set_target_hw_addr(to_mac);
    pkt_arp.set_target_proto_addr(to_ip);

    packet
}

#[cfg(test)]
#[path = "./arp_packet_tests.rs"]
mod tests;
