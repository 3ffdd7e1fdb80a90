//! Transport seam between the receiver and the network
//!
//! A transport owns the sockets and the E1.31 decoder. It delivers typed packets to the
//! callbacks registered for each packet kind and joins multicast groups on request.

use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::packet::{PacketType, SacnPacket};
use crate::Result;

/// Callback for decoded packets, with the address of the sending source
pub type PacketCallback = Box<dyn Fn(SacnPacket, SocketAddr) + Send + Sync>;

/// Callback for stream termination of a universe
pub type TerminationCallback = Box<dyn Fn(u16) + Send + Sync>;

/// Packet source consumed by [`SacnReceiver`](super::SacnReceiver).
///
/// Callbacks may be invoked from any thread the transport owns. Registering a callback
/// for a packet kind replaces the previous one.
pub trait Transport: Send + Sync {
    /// Subscribe to the multicast group of a universe
    fn join_universe(&self, universe: u16) -> Result<()>;

    /// Unsubscribe from the multicast group of a universe
    fn leave_universe(&self, universe: u16) -> Result<()>;

    fn register_packet_callback(&self, packet_type: PacketType, callback: PacketCallback);

    fn register_termination_callback(&self, callback: TerminationCallback);

    /// Begin receiving. Fails when no usable network interface is available.
    fn start(&self) -> Result<()>;

    /// Stop receiving. No callback is invoked once this returns.
    fn stop(&self) -> Result<()>;
}

/// In-process transport fed by an external decoder.
///
/// Packets handed to [`deliver`](LoopbackTransport::deliver) reach the registered
/// callbacks only while the transport is running and only if the multicast group that
/// carries them has been joined, mirroring what a socket-backed transport would see.
#[derive(Default)]
pub struct LoopbackTransport {
    callbacks: RwLock<HashMap<PacketType, Arc<dyn Fn(SacnPacket, SocketAddr) + Send + Sync>>>,
    termination: RwLock<Option<Arc<dyn Fn(u16) + Send + Sync>>>,
    joined: Mutex<BTreeSet<u16>>,
    join_log: Mutex<Vec<u16>>,
    running: AtomicBool,
    // Serializes delivery against stop()
    delivery: Mutex<()>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand a decoded packet to the registered callbacks.
    ///
    /// Returns false when the packet was filtered out (not running, group not joined or
    /// no callback registered).
    pub fn deliver(&self, packet: SacnPacket, source: SocketAddr) -> bool {
        let _delivery = self.delivery.lock();
        if !self.running.load(Ordering::Acquire) {
            return false;
        }

        if !self.is_joined(packet.carrier_universe()) {
            tracing::trace!(
                "Dropping {:?} packet for unjoined universe {}",
                packet.packet_type(),
                packet.carrier_universe()
            );
            return false;
        }

        let mut delivered = false;

        if let SacnPacket::Termination(termination) = &packet {
            let callback = self.termination.read().clone();
            if let Some(callback) = callback {
                callback(termination.universe);
                delivered = true;
            }
        }

        let callback = self.callbacks.read().get(&packet.packet_type()).cloned();
        if let Some(callback) = callback {
            callback(packet, source);
            delivered = true;
        }

        delivered
    }

    pub fn is_joined(&self, universe: u16) -> bool {
        self.joined.lock().contains(&universe)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Every join request received, in order
    pub fn joins(&self) -> Vec<u16> {
        self.join_log.lock().clone()
    }

    pub fn join_count(&self, universe: u16) -> usize {
        self.join_log
            .lock()
            .iter()
            .filter(|&&joined| joined == universe)
            .count()
    }
}

impl Transport for LoopbackTransport {
    fn join_universe(&self, universe: u16) -> Result<()> {
        self.join_log.lock().push(universe);
        if self.joined.lock().insert(universe) {
            tracing::debug!("Joined universe {}", universe);
        }
        Ok(())
    }

    fn leave_universe(&self, universe: u16) -> Result<()> {
        if self.joined.lock().remove(&universe) {
            tracing::debug!("Left universe {}", universe);
        }
        Ok(())
    }

    fn register_packet_callback(&self, packet_type: PacketType, callback: PacketCallback) {
        self.callbacks.write().insert(packet_type, Arc::from(callback));
    }

    fn register_termination_callback(&self, callback: TerminationCallback) {
        *self.termination.write() = Some(Arc::from(callback));
    }

    fn start(&self) -> Result<()> {
        self.running.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        // Wait for any in-progress delivery before reporting stopped
        let _delivery = self.delivery.lock();
        self.running.store(false, Ordering::Release);
        Ok(())
    }
}
