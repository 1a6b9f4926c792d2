//! Provides the ARP sweep loop run on each scannable interface

use log::*;
use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use crate::{
    cancel::CancelToken,
    error::{Result, ScanError},
    host::Host,
    network::{Network, NetworkInterface},
    packet::{
        Reader, Sender,
        arp_packet::{ArpPacketBuilder, ArpReply},
    },
    registry::HostRegistry,
    scanners::{Notifier, ScanMessage},
    targets::ips::IPTargets,
};

/// Scans a single interface's subnet using ARP requests and replies
///
/// Broadcasts one request per subnet address, waits `sweep_interval` and
/// repeats until cancelled or a write fails. Replies are read on a second
/// thread for as long as the capture session is open.
pub(super) struct InterfaceScan<'a> {
    pub interface: &'a NetworkInterface,
    pub network: &'a dyn Network,
    pub registry: &'a HostRegistry,
    pub notifier: &'a Notifier,
    pub cancel: &'a CancelToken,
    pub sweep_interval: Duration,
    pub send_throttle: Duration,
}

impl InterfaceScan<'_> {
    pub fn run(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Ok(());
        }

        let targets = self.interface.targets();

        debug!(
            "scanning interface {} ({}) with {} targets",
            self.interface.name,
            self.interface.cidr(),
            targets.len()
        );

        let wire = self
            .network
            .open(self.interface)
            .map_err(|e| ScanError::session_open(&self.interface.name, e))?;

        // scoped to this capture session, cancelled with the whole scan
        let session = self.cancel.child();

        let result = thread::scope(|s| {
            let listener = s.spawn(|| {
                let heard = self.listen(&wire.1, &session);
                session.cancel();
                heard
            });

            let sent = self.broadcast(&wire.0, &targets, &session);

            session.cancel();

            let heard = listener.join().map_err(ScanError::from).and_then(|r| r);

            sent.and(heard)
        });

        debug!("releasing capture session on {}", self.interface.name);

        result
    }

    fn broadcast(
        &self,
        sender: &Arc<Mutex<dyn Sender>>,
        targets: &IPTargets,
        session: &CancelToken,
    ) -> Result<()> {
        let mut pkt_sender = sender.lock()?;

        loop {
            for target in targets.iter() {
                if session.is_cancelled() {
                    return Ok(());
                }

                // throttle packet sending to prevent packet loss
                thread::sleep(self.send_throttle);

                let pkt_buf = ArpPacketBuilder::default()
                    .source_ip(self.interface.ipv4)
                    .source_mac(self.interface.mac)
                    .dest_ip(target)
                    .build()?
                    .to_raw()?;

                // Send to the broadcast address
                pkt_sender
                    .send(&pkt_buf)
                    .map_err(|e| ScanError::write(&self.interface.name, e))?;
            }

            // replies trickle in for a while, give them time before sweeping again
            if session.wait_timeout(self.sweep_interval) {
                return Ok(());
            }
        }
    }

    fn listen(&self, reader: &Arc<Mutex<dyn Reader>>, session: &CancelToken) -> Result<()> {
        let mut pkt_reader = reader.lock()?;

        while !session.is_cancelled() {
            let Some(pkt) = pkt_reader
                .next_packet()
                .map_err(|e| ScanError::read(&self.interface.name, e))?
            else {
                continue;
            };

            // Any ARP reply is an indication that there's a device on the
            // network, even if it answers a request we did not send
            let Some(reply) = ArpReply::parse(pkt, self.interface.mac) else {
                continue;
            };

            let host = Host::new(reply.ip, reply.mac);

            if self.registry.insert(host.clone()) {
                debug!("found host {} on {}", host, self.interface.name);
                self.notifier.notify(ScanMessage::HostFound(host));
            }
        }

        debug!("exiting arp packet reader on {}", self.interface.name);

        Ok(())
    }
}

#[cfg(test)]
#[path = "./interface_scan_tests.rs"]
mod tests;
