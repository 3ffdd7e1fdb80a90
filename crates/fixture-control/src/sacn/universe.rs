//! Universe subscriptions and the registry that owns them

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::error::{FixtureError, Result, ValidationError};

/// Lowest valid sACN universe
pub const MIN_UNIVERSE: u16 = 1;
/// Highest valid sACN universe; 64000 and above are reserved
pub const MAX_UNIVERSE: u16 = 63999;
/// Largest universe a fixture can listen to
pub const MAX_CHANNELS: u16 = 512;

/// Handler receiving the fixture's channel window of each data packet
pub type DataCallback = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// A subscription to a window of channels in one universe
#[derive(Clone)]
pub struct Universe {
    id: u16,
    channels: u16,
    start_channel: u16,
    fixture_channels: u16,
    callback: DataCallback,
    connected: bool,
}

impl Universe {
    /// Create a validated universe subscription.
    ///
    /// # Arguments
    /// * `id` - sACN universe (1-63999)
    /// * `channels` - Size of the universe (1-512)
    /// * `start_channel` - First channel of interest, 1-based
    /// * `fixture_channels` - Number of channels starting at `start_channel`
    /// * `callback` - Called with exactly `fixture_channels` bytes per packet
    pub fn new(
        id: u16,
        channels: u16,
        start_channel: u16,
        fixture_channels: u16,
        callback: DataCallback,
    ) -> std::result::Result<Self, ValidationError> {
        if !(MIN_UNIVERSE..=MAX_UNIVERSE).contains(&id) {
            return Err(ValidationError::InvalidUniverse(id));
        }

        if !(1..=MAX_CHANNELS).contains(&channels) {
            return Err(ValidationError::InvalidChannelCount(channels));
        }

        if !(1..=channels).contains(&start_channel) {
            return Err(ValidationError::InvalidStartChannel {
                start: start_channel,
                channels,
            });
        }

        if !(1..=channels).contains(&fixture_channels) {
            return Err(ValidationError::InvalidWindowLength {
                length: fixture_channels,
                channels,
            });
        }

        if u32::from(start_channel) + u32::from(fixture_channels) - 1 > u32::from(channels) {
            return Err(ValidationError::WindowOverflow {
                start: start_channel,
                length: fixture_channels,
                channels,
            });
        }

        Ok(Self {
            id,
            channels,
            start_channel,
            fixture_channels,
            callback,
            connected: false,
        })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn start_channel(&self) -> u16 {
        self.start_channel
    }

    pub fn fixture_channels(&self) -> u16 {
        self.fixture_channels
    }

    /// Whether the receiver has joined this universe's multicast group
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn callback(&self) -> &DataCallback {
        &self.callback
    }

    /// 0-based index range of the window inside a full channel array
    pub fn window(&self) -> Range<usize> {
        let start = usize::from(self.start_channel) - 1;
        start..start + usize::from(self.fixture_channels)
    }
}

impl fmt::Debug for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Universe")
            .field("id", &self.id)
            .field("channels", &self.channels)
            .field("start_channel", &self.start_channel)
            .field("fixture_channels", &self.fixture_channels)
            .field("connected", &self.connected)
            .finish_non_exhaustive()
    }
}

/// Result of [`UniverseRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    /// A universe with the same id was already registered; the new one was dropped
    Ignored,
}

/// Set of subscribed universes, keyed by universe id.
///
/// All access goes through one mutex. Callbacks are cloned out and invoked after the
/// lock is released, so a slow callback never blocks registration or discovery.
#[derive(Default)]
pub struct UniverseRegistry {
    universes: Mutex<BTreeMap<u16, Universe>>,
}

impl UniverseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a universe.
    ///
    /// Returns the registered entry. If the id was already registered, the existing
    /// entry is returned unchanged.
    pub fn register<F>(
        &self,
        id: u16,
        channels: u16,
        start_channel: u16,
        fixture_channels: u16,
        callback: F,
    ) -> std::result::Result<Universe, ValidationError>
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        let universe = Universe::new(
            id,
            channels,
            start_channel,
            fixture_channels,
            Arc::new(callback),
        )?;

        let mut universes = self.universes.lock();
        Ok(universes.entry(id).or_insert(universe).clone())
    }

    /// Add an already validated universe. Duplicates are ignored, first one wins.
    pub fn add(&self, universe: Universe) -> AddOutcome {
        let mut universes = self.universes.lock();
        if universes.contains_key(&universe.id) {
            tracing::debug!("Universe {} already registered, ignoring", universe.id);
            return AddOutcome::Ignored;
        }
        universes.insert(universe.id, universe);
        AddOutcome::Inserted
    }

    /// Snapshot of the universe with the given id
    pub fn lookup(&self, id: u16) -> Option<Universe> {
        self.universes.lock().get(&id).cloned()
    }

    /// Replace the callback of a registered universe.
    pub fn set_callback(&self, id: u16, callback: DataCallback) -> Result<()> {
        match self.universes.lock().get_mut(&id) {
            Some(universe) => {
                universe.callback = callback;
                Ok(())
            }
            None => Err(FixtureError::UniverseNotFound(id)),
        }
    }

    pub fn contains(&self, id: u16) -> bool {
        self.universes.lock().contains_key(&id)
    }

    /// Registered universe ids in ascending order
    pub fn ids(&self) -> Vec<u16> {
        self.universes.lock().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.universes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.universes.lock().is_empty()
    }

    /// Mark a registered universe as connected.
    ///
    /// Returns true only when the universe exists and was not connected yet, so exactly
    /// one caller wins the right to join it.
    pub(crate) fn claim_connection(&self, id: u16) -> bool {
        match self.universes.lock().get_mut(&id) {
            Some(universe) if !universe.connected => {
                universe.connected = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_connected(&self, id: u16, connected: bool) {
        if let Some(universe) = self.universes.lock().get_mut(&id) {
            universe.connected = connected;
        }
    }

    /// Window and callback for dispatching a data packet
    pub(crate) fn route(&self, id: u16) -> Option<(Range<usize>, DataCallback)> {
        self.universes
            .lock()
            .get(&id)
            .map(|universe| (universe.window(), universe.callback.clone()))
    }
}

impl fmt::Debug for UniverseRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniverseRegistry")
            .field("universes", &self.ids())
            .finish()
    }
}
