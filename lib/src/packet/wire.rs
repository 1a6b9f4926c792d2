//! Implements a default Wire using pnet

use pnet::datalink;
use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    error::{Result, ScanError},
    network::NetworkInterface,
    packet::{Reader, Sender},
};

/// Represents a packet Sender and packet Reader tuple bound to one interface.
/// Dropping the last clone releases the underlying capture session
#[derive(Clone)]
pub struct Wire(pub Arc<Mutex<dyn Sender>>, pub Arc<Mutex<dyn Reader>>);

/// A PNetReader implementation of packet Reader
pub struct PNetReader {
    receiver: Box<dyn datalink::DataLinkReceiver>,
}

// Implements the Reader trait for our PNet implementation
impl Reader for PNetReader {
    fn next_packet(&mut self) -> Result<Option<&[u8]>> {
        match self.receiver.next() {
            Ok(pkt) => Ok(Some(pkt)),
            Err(e) if is_timeout(&e) => Ok(None),
            Err(e) => Err(ScanError::Wire(e.to_string())),
        }
    }
}

/// A PNetSender implementation of packet Sender
pub struct PNetSender {
    sender: Box<dyn datalink::DataLinkSender>,
}

// Implements the Sender trait for our PNet implementation
impl Sender for PNetSender {
    fn send(&mut self, packet: &[u8]) -> Result<()> {
        match self.sender.send_to(packet, None) {
            Some(res) => res.map_err(|e| ScanError::Wire(e.to_string())),
            None => Err(ScanError::Wire("failed to send packet".into())),
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

/// Opens a link-layer capture session on the provided interface. Reads on the
/// returned wire give up after `read_timeout` so callers can observe
/// cancellation between packets
///
/// Example
/// ```no_run
/// # use std::time::Duration;
/// # use hostsweep::network::{self, Classification};
/// # use hostsweep::packet::wire;
/// let iface = pnet::datalink::interfaces().into_iter().next().unwrap();
/// if let Classification::Scannable(interface) = network::classify(iface) {
///     let packet_wire = wire::open(&interface, Duration::from_millis(250)).unwrap();
/// }
/// ```
pub fn open(interface: &NetworkInterface, read_timeout: Duration) -> Result<Wire> {
    let cfg = datalink::Config {
        read_timeout: Some(read_timeout),
        ..Default::default()
    };

    let channel = match datalink::channel(&interface.into(), cfg) {
        Ok(datalink::Channel::Ethernet(tx, rx)) => Ok((tx, rx)),
        Ok(_) => Err(ScanError::Wire("unsupported datalink channel type".into())),
        Err(e) => Err(ScanError::Wire(e.to_string())),
    }?;

    Ok(Wire(
        Arc::new(Mutex::new(PNetSender { sender: channel.0 })),
        Arc::new(Mutex::new(PNetReader {
            receiver: channel.1,
        })),
    ))
}
