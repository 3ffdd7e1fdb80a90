//! Universe discovery handling

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use super::packet::DiscoveryPacket;
use super::stats::ReceiverStats;
use super::transport::Transport;
use super::universe::UniverseRegistry;

/// Tracks which universes are on the network and joins the ones we subscribe to.
///
/// Discovery packets only ever add to the set of active universes. A stream termination
/// removes its universe; nothing expires on a timer. The set lives on the receiver's
/// worker thread and is never shared.
pub struct DiscoveryHandler {
    registry: Arc<UniverseRegistry>,
    transport: Arc<dyn Transport>,
    stats: Arc<RwLock<ReceiverStats>>,
    active: HashSet<u16>,
}

impl DiscoveryHandler {
    pub fn new(
        registry: Arc<UniverseRegistry>,
        transport: Arc<dyn Transport>,
        stats: Arc<RwLock<ReceiverStats>>,
    ) -> Self {
        Self {
            registry,
            transport,
            stats,
            active: HashSet::new(),
        }
    }

    /// Process one fully assembled discovery list. Returns the number of joins issued.
    pub fn handle(&mut self, packet: &DiscoveryPacket) -> usize {
        self.stats.write().discovery_packets += 1;

        let mut joins = 0;
        for &universe in &packet.universes {
            if self.active.insert(universe) {
                tracing::debug!(
                    "Discovered universe {} from '{}'",
                    universe,
                    packet.source_name
                );
            }

            // Unregistered universes are of no interest; connected ones are already joined
            if !self.registry.claim_connection(universe) {
                continue;
            }

            match self.transport.join_universe(universe) {
                Ok(()) => {
                    tracing::info!("Joined discovered universe {}", universe);
                    joins += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to join universe {}: {}", universe, e);
                    self.registry.set_connected(universe, false);
                }
            }
        }

        self.stats.write().discovery_joins += joins as u64;
        joins
    }

    /// A source stopped sending a universe.
    pub fn handle_termination(&mut self, universe: u16) {
        self.stats.write().terminations += 1;
        if self.active.remove(&universe) {
            tracing::info!("Universe {} terminated by source", universe);
        }
    }

    pub fn is_active(&self, universe: u16) -> bool {
        self.active.contains(&universe)
    }

    /// Universes seen in discovery, ascending
    pub fn active_universes(&self) -> Vec<u16> {
        let mut universes: Vec<u16> = self.active.iter().copied().collect();
        universes.sort_unstable();
        universes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FixtureError, Result};
    use crate::sacn::packet::PacketType;
    use crate::sacn::transport::{LoopbackTransport, PacketCallback, TerminationCallback};

    fn setup() -> (Arc<UniverseRegistry>, Arc<LoopbackTransport>, DiscoveryHandler) {
        let registry = Arc::new(UniverseRegistry::new());
        let transport = Arc::new(LoopbackTransport::new());
        let stats = Arc::new(RwLock::new(ReceiverStats::default()));
        let handler = DiscoveryHandler::new(registry.clone(), transport.clone(), stats);
        (registry, transport, handler)
    }

    #[test]
    fn test_unregistered_universe_not_joined() {
        let (_, transport, mut handler) = setup();

        let joins = handler.handle(&DiscoveryPacket::new("desk", vec![7, 8]));
        assert_eq!(joins, 0);
        assert!(transport.joins().is_empty());
        assert!(handler.is_active(7));
        assert!(handler.is_active(8));
    }

    #[test]
    fn test_registered_universe_joined_once() {
        let (registry, transport, mut handler) = setup();
        registry.register(3, 512, 1, 7, |_| {}).unwrap();

        assert_eq!(handler.handle(&DiscoveryPacket::new("desk", vec![1, 3])), 1);
        assert_eq!(transport.joins(), vec![3]);
        assert!(registry.lookup(3).unwrap().is_connected());

        // Re-advertisement is a no-op
        assert_eq!(handler.handle(&DiscoveryPacket::new("desk", vec![3])), 0);
        assert_eq!(transport.join_count(3), 1);
    }

    #[test]
    fn test_already_connected_not_rejoined() {
        let (registry, transport, mut handler) = setup();
        registry.register(5, 512, 1, 1, |_| {}).unwrap();
        registry.set_connected(5, true);

        assert_eq!(handler.handle(&DiscoveryPacket::new("desk", vec![5])), 0);
        assert!(transport.joins().is_empty());
    }

    #[test]
    fn test_termination_removes_active() {
        let (_, _, mut handler) = setup();
        handler.handle(&DiscoveryPacket::new("desk", vec![10, 2]));
        assert_eq!(handler.active_universes(), vec![2, 10]);

        handler.handle_termination(10);
        assert_eq!(handler.active_universes(), vec![2]);

        // A later list that omits a universe does not remove it
        handler.handle(&DiscoveryPacket::new("desk", vec![5]));
        assert_eq!(handler.active_universes(), vec![2, 5]);
    }

    struct RefusingTransport;

    impl Transport for RefusingTransport {
        fn join_universe(&self, universe: u16) -> Result<()> {
            Err(FixtureError::TransportError(format!(
                "cannot join {}",
                universe
            )))
        }
        fn leave_universe(&self, _universe: u16) -> Result<()> {
            Ok(())
        }
        fn register_packet_callback(&self, _packet_type: PacketType, _callback: PacketCallback) {}
        fn register_termination_callback(&self, _callback: TerminationCallback) {}
        fn start(&self) -> Result<()> {
            Ok(())
        }
        fn stop(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_join_leaves_disconnected() {
        let registry = Arc::new(UniverseRegistry::new());
        registry.register(6, 512, 1, 1, |_| {}).unwrap();
        let stats = Arc::new(RwLock::new(ReceiverStats::default()));
        let mut handler =
            DiscoveryHandler::new(registry.clone(), Arc::new(RefusingTransport), stats);

        assert_eq!(handler.handle(&DiscoveryPacket::new("desk", vec![6])), 0);
        assert!(!registry.lookup(6).unwrap().is_connected());
        assert!(handler.is_active(6));
    }
}
