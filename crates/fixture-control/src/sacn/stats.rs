/// Receiver packet counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub discovery_packets: u64,
    pub data_packets: u64,
    pub sync_packets: u64,
    pub terminations: u64,
    /// Data packets handed to a universe callback
    pub dispatched: u64,
    /// Data packets for unknown universes or with a payload shorter than the window
    pub dropped: u64,
    /// Joins issued in response to discovery
    pub discovery_joins: u64,
}
