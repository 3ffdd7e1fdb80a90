//! Decoded sACN packets
//!
//! The transport owns the E1.31 wire format; the receiver only sees these typed
//! packets. One variant per packet kind, so handlers match instead of casting.

/// Universe on which E1.31 universe discovery packets are sent.
pub const DISCOVERY_UNIVERSE: u16 = 64214;

/// Packet kind used when registering transport callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    Discovery,
    Data,
    Sync,
    Termination,
}

/// Any packet the transport can deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SacnPacket {
    Discovery(DiscoveryPacket),
    Data(DataPacket),
    Sync(SyncPacket),
    Termination(TerminationPacket),
}

impl SacnPacket {
    pub fn packet_type(&self) -> PacketType {
        match self {
            SacnPacket::Discovery(_) => PacketType::Discovery,
            SacnPacket::Data(_) => PacketType::Data,
            SacnPacket::Sync(_) => PacketType::Sync,
            SacnPacket::Termination(_) => PacketType::Termination,
        }
    }

    /// Universe whose multicast group carries this packet
    pub fn carrier_universe(&self) -> u16 {
        match self {
            SacnPacket::Discovery(_) => DISCOVERY_UNIVERSE,
            SacnPacket::Data(p) => p.universe,
            SacnPacket::Sync(p) => p.sync_address,
            SacnPacket::Termination(p) => p.universe,
        }
    }
}

/// Universe discovery announcement.
///
/// Large source lists span several pages on the wire; the transport reassembles them so
/// `universes` always holds the complete list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryPacket {
    pub source_name: String,
    pub universes: Vec<u16>,
}

impl DiscoveryPacket {
    pub fn new(source_name: impl Into<String>, universes: Vec<u16>) -> Self {
        Self {
            source_name: source_name.into(),
            universes,
        }
    }

    pub fn num_universes(&self) -> usize {
        self.universes.len()
    }
}

/// DMX data for one universe.
///
/// `data` holds the channel values without the start code, so `data[0]` is channel 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataPacket {
    pub universe: u16,
    pub source_name: String,
    pub priority: u8,
    pub sequence: u8,
    pub sync_address: u16,
    pub data: Vec<u8>,
}

impl DataPacket {
    /// Data packet with default priority (100) and no synchronization
    pub fn new(universe: u16, data: Vec<u8>) -> Self {
        Self {
            universe,
            priority: 100,
            data,
            ..Default::default()
        }
    }
}

/// Synchronization packet releasing buffered data on `sync_address`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncPacket {
    pub sync_address: u16,
    pub sequence: u8,
}

/// Stream termination for one universe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationPacket {
    pub universe: u16,
}
