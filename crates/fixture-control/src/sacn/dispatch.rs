//! Data packet dispatch

use parking_lot::RwLock;
use std::sync::Arc;

use super::packet::DataPacket;
use super::stats::ReceiverStats;
use super::universe::UniverseRegistry;

/// Routes data packets to the callback of their universe.
///
/// Dispatch is synchronous: the callback runs on the calling thread, so a callback that
/// blocks holds up every packet behind it.
pub struct DataDispatcher {
    registry: Arc<UniverseRegistry>,
    stats: Arc<RwLock<ReceiverStats>>,
}

impl DataDispatcher {
    pub fn new(registry: Arc<UniverseRegistry>, stats: Arc<RwLock<ReceiverStats>>) -> Self {
        Self { registry, stats }
    }

    /// Slice the universe window out of `packet` and call its callback.
    ///
    /// Packets for universes that are not registered are dropped; joins race with
    /// registration, so this is expected traffic. Returns whether a callback ran.
    pub fn dispatch(&self, packet: &DataPacket) -> bool {
        self.stats.write().data_packets += 1;

        let Some((window, callback)) = self.registry.route(packet.universe) else {
            tracing::trace!("No subscription for universe {}, dropping", packet.universe);
            self.stats.write().dropped += 1;
            return false;
        };

        // Sources may send fewer slots than the configured universe size
        let Some(slice) = packet.data.get(window.clone()) else {
            tracing::trace!(
                "Universe {} payload has {} channels, window needs {:?}",
                packet.universe,
                packet.data.len(),
                window
            );
            self.stats.write().dropped += 1;
            return false;
        };

        callback(slice);
        self.stats.write().dispatched += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn setup() -> (Arc<UniverseRegistry>, DataDispatcher, Arc<RwLock<ReceiverStats>>) {
        let registry = Arc::new(UniverseRegistry::new());
        let stats = Arc::new(RwLock::new(ReceiverStats::default()));
        let dispatcher = DataDispatcher::new(registry.clone(), stats.clone());
        (registry, dispatcher, stats)
    }

    fn ramp() -> Vec<u8> {
        (0..512).map(|i| (i % 256) as u8).collect()
    }

    #[test]
    fn test_dispatch_first_channels() {
        let (registry, dispatcher, stats) = setup();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        registry
            .register(1, 512, 1, 7, move |data| sink.lock().push(data.to_vec()))
            .unwrap();

        let data = ramp();
        assert!(dispatcher.dispatch(&DataPacket::new(1, data.clone())));

        let received = received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], data[0..7].to_vec());
        assert_eq!(stats.read().dispatched, 1);
    }

    #[test]
    fn test_dispatch_window_at_end() {
        let (registry, dispatcher, _) = setup();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        registry
            .register(2, 512, 508, 5, move |data| sink.lock().extend_from_slice(data))
            .unwrap();

        let data = ramp();
        dispatcher.dispatch(&DataPacket::new(2, data.clone()));
        assert_eq!(*received.lock(), data[507..512].to_vec());
    }

    #[test]
    fn test_unknown_universe_dropped() {
        let (registry, dispatcher, stats) = setup();
        registry
            .register(1, 512, 1, 7, |_| panic!("wrong universe dispatched"))
            .unwrap();

        assert!(!dispatcher.dispatch(&DataPacket::new(2, ramp())));
        let stats = stats.read();
        assert_eq!(stats.data_packets, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.dispatched, 0);
    }

    #[test]
    fn test_short_payload_dropped() {
        let (registry, dispatcher, stats) = setup();
        registry
            .register(3, 512, 100, 10, |_| panic!("short payload dispatched"))
            .unwrap();

        assert!(!dispatcher.dispatch(&DataPacket::new(3, vec![0; 50])));
        assert_eq!(stats.read().dropped, 1);
    }

    #[test]
    fn test_replaced_callback_used() {
        let (registry, dispatcher, _) = setup();
        registry
            .register(4, 512, 1, 2, |_| panic!("stale callback"))
            .unwrap();

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        registry
            .set_callback(4, Arc::new(move |data: &[u8]| sink.lock().push(data.to_vec())))
            .unwrap();

        dispatcher.dispatch(&DataPacket::new(4, vec![9, 8, 7]));
        assert_eq!(*received.lock(), vec![vec![9, 8]]);
    }
}
