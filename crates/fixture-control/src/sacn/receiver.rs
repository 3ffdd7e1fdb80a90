//! sACN receiver lifecycle
//!
//! The receiver registers one callback per packet kind with its transport. Those
//! callbacks hand each packet to a single worker thread over a rendezvous channel, so
//! every consumer callback runs on that thread and a slow callback stalls the transport
//! instead of queueing packets behind it.

use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError};
use fixture_core::{FixtureConfig, ReceiverConfig};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use super::discovery::DiscoveryHandler;
use super::dispatch::DataDispatcher;
use super::packet::{PacketType, SacnPacket, DISCOVERY_UNIVERSE};
use super::stats::ReceiverStats;
use super::transport::Transport;
use super::universe::{AddOutcome, DataCallback, Universe, UniverseRegistry};
use crate::error::{FixtureError, Result, ValidationError};

/// Lifecycle state of a [`SacnReceiver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    Idle,
    Listening,
    Stopping,
    Stopped,
}

enum Inbound {
    Packet {
        expected: PacketType,
        packet: SacnPacket,
        source: SocketAddr,
    },
    Terminated(u16),
}

/// Receives sACN universes and hands each subscriber its channel window.
pub struct SacnReceiver {
    transport: Arc<dyn Transport>,
    registry: Arc<UniverseRegistry>,
    stats: Arc<RwLock<ReceiverStats>>,
    state: ReceiverState,
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl SacnReceiver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            registry: Arc::new(UniverseRegistry::new()),
            stats: Arc::new(RwLock::new(ReceiverStats::default())),
            state: ReceiverState::Idle,
            shutdown: None,
            worker: None,
        }
    }

    pub fn receiver_type(&self) -> &'static str {
        "sacn"
    }

    pub fn state(&self) -> ReceiverState {
        self.state
    }

    pub fn registry(&self) -> &Arc<UniverseRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> ReceiverStats {
        *self.stats.read()
    }

    /// Validate and register a universe. See [`UniverseRegistry::register`].
    pub fn register<F>(
        &self,
        universe: u16,
        channels: u16,
        start_channel: u16,
        fixture_channels: u16,
        callback: F,
    ) -> std::result::Result<Universe, ValidationError>
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        self.registry
            .register(universe, channels, start_channel, fixture_channels, callback)
    }

    pub fn add_universe(&self, universe: Universe) -> AddOutcome {
        self.registry.add(universe)
    }

    /// Register the universes of a receiver config.
    ///
    /// Each universe starts with a callback that logs its data. Invalid entries are
    /// logged and skipped. Returns how many universes were added.
    pub fn configure(&self, config: &ReceiverConfig) -> usize {
        let mut added = 0;
        for entry in &config.universes {
            let id = entry.universe;
            let logger: DataCallback = Arc::new(move |data: &[u8]| {
                debug!("Universe {} data received: {:?}", id, data);
            });

            match Universe::new(
                id,
                entry.channels,
                entry.start_channel,
                entry.fixture_channels,
                logger,
            ) {
                Ok(universe) => {
                    if self.registry.add(universe) == AddOutcome::Inserted {
                        added += 1;
                    }
                }
                Err(e) => warn!("Skipping universe {} from config: {}", id, e),
            }
        }

        info!(
            "Configured {} of {} universes",
            added,
            config.universes.len()
        );
        added
    }

    /// Load a fixture config file and register its receiver section.
    pub fn config_from_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let config = FixtureConfig::load(path)?;
        Ok(self.configure(&config.receiver))
    }

    /// Attach or replace the data handler of a registered universe.
    pub fn add_data_handler(&self, universe: u16, handler: DataCallback) -> Result<()> {
        self.registry.set_callback(universe, handler)
    }

    /// Wire up the transport and start the worker.
    ///
    /// Joins the discovery universe and every registered universe before starting the
    /// transport. On transport failure every group joined here is left again and the
    /// receiver stays [`ReceiverState::Idle`].
    pub fn start(&mut self) -> Result<()> {
        if self.state != ReceiverState::Idle {
            return Err(FixtureError::AlreadyStarted);
        }

        // Zero capacity: a callback returns only once the worker has taken its packet
        let (inbound_tx, inbound_rx) = bounded::<Inbound>(0);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        for packet_type in [PacketType::Discovery, PacketType::Data, PacketType::Sync] {
            let tx = inbound_tx.clone();
            let shutdown = shutdown_rx.clone();
            self.transport.register_packet_callback(
                packet_type,
                Box::new(move |packet, source| {
                    hand_off(
                        &tx,
                        &shutdown,
                        Inbound::Packet {
                            expected: packet_type,
                            packet,
                            source,
                        },
                    );
                }),
            );
        }
        let shutdown = shutdown_rx.clone();
        self.transport
            .register_termination_callback(Box::new(move |universe| {
                hand_off(&inbound_tx, &shutdown, Inbound::Terminated(universe));
            }));

        let universes = self.registry.ids();
        let joined = self.join_all(&universes)?;

        if let Err(e) = self.transport.start() {
            self.leave_all(&joined);
            return Err(transport_unavailable(e));
        }

        for &universe in &universes {
            self.registry.set_connected(universe, true);
        }

        let worker = Worker {
            discovery: DiscoveryHandler::new(
                self.registry.clone(),
                self.transport.clone(),
                self.stats.clone(),
            ),
            dispatcher: DataDispatcher::new(self.registry.clone(), self.stats.clone()),
            stats: self.stats.clone(),
        };

        let handle = thread::Builder::new()
            .name("sacn-receiver".to_string())
            .spawn(move || worker.run(inbound_rx, shutdown_rx));

        let handle = match handle {
            Ok(handle) => handle,
            Err(e) => {
                if let Err(stop_err) = self.transport.stop() {
                    warn!("Failed to stop transport after spawn error: {}", stop_err);
                }
                self.leave_all(&joined);
                for &universe in &universes {
                    self.registry.set_connected(universe, false);
                }
                return Err(FixtureError::WorkerError(format!(
                    "Failed to spawn receiver thread: {}",
                    e
                )));
            }
        };

        self.shutdown = Some(shutdown_tx);
        self.worker = Some(handle);
        self.state = ReceiverState::Listening;
        info!("Listening for sACN packets on {} universes", universes.len());
        Ok(())
    }

    /// Join the discovery universe and `universes`, in that order.
    ///
    /// On failure every group joined so far is left again and the error is reported as
    /// [`FixtureError::TransportUnavailable`].
    fn join_all(&self, universes: &[u16]) -> Result<Vec<u16>> {
        let mut joined = Vec::with_capacity(universes.len() + 1);
        for &universe in std::iter::once(&DISCOVERY_UNIVERSE).chain(universes) {
            if let Err(e) = self.transport.join_universe(universe) {
                self.leave_all(&joined);
                return Err(transport_unavailable(e));
            }
            joined.push(universe);
        }
        Ok(joined)
    }

    fn leave_all(&self, universes: &[u16]) {
        for &universe in universes {
            if let Err(e) = self.transport.leave_universe(universe) {
                warn!("Failed to leave universe {}: {}", universe, e);
            }
        }
    }

    /// Stop the transport and wait for the worker to exit.
    ///
    /// No data callback runs after this returns. When called from inside a data callback
    /// the worker cannot be joined; it finishes the current callback and exits without
    /// taking another packet. Calling it on a receiver that never started or has already
    /// stopped does nothing.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != ReceiverState::Listening {
            return Ok(());
        }

        info!("Stopping sACN receiver");
        self.state = ReceiverState::Stopping;

        // Closing the channel wakes the worker and releases callbacks blocked in hand-off
        drop(self.shutdown.take());

        let transport_result = self.transport.stop();

        if let Some(handle) = self.worker.take() {
            if handle.thread().id() == thread::current().id() {
                warn!("stop() called from a data callback; worker exits after it returns");
            } else if handle.join().is_err() {
                error!("sACN receiver thread panicked");
            }
        }

        self.state = ReceiverState::Stopped;
        info!("sACN receiver stopped");

        transport_result.map_err(|e| FixtureError::TransportError(e.to_string()))
    }
}

impl Drop for SacnReceiver {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Error while stopping receiver on drop: {}", e);
        }
    }
}

impl crate::Receiver for SacnReceiver {
    fn receiver_type(&self) -> &'static str {
        SacnReceiver::receiver_type(self)
    }

    fn configure(&self, config: &ReceiverConfig) -> usize {
        SacnReceiver::configure(self, config)
    }

    fn config_from_file(&self, path: &Path) -> Result<usize> {
        SacnReceiver::config_from_file(self, path)
    }

    fn add_data_handler(&self, universe: u16, handler: DataCallback) -> Result<()> {
        SacnReceiver::add_data_handler(self, universe, handler)
    }

    fn start(&mut self) -> Result<()> {
        SacnReceiver::start(self)
    }

    fn stop(&mut self) -> Result<()> {
        SacnReceiver::stop(self)
    }
}

/// Pass a packet to the worker, or drop it once shutdown has begun.
fn hand_off(tx: &Sender<Inbound>, shutdown: &Receiver<()>, message: Inbound) {
    select! {
        send(tx, message) -> _ => {}
        recv(shutdown) -> _ => {}
    }
}

fn transport_unavailable(err: FixtureError) -> FixtureError {
    match err {
        FixtureError::TransportUnavailable(_) => err,
        other => FixtureError::TransportUnavailable(other.to_string()),
    }
}

struct Worker {
    discovery: DiscoveryHandler,
    dispatcher: DataDispatcher,
    stats: Arc<RwLock<ReceiverStats>>,
}

impl Worker {
    fn run(mut self, inbound: Receiver<Inbound>, shutdown: Receiver<()>) {
        debug!("sACN receiver thread started");
        loop {
            // A stop() issued from a callback wins over any packet waiting to be handed off
            if let Err(TryRecvError::Disconnected) = shutdown.try_recv() {
                break;
            }
            select! {
                recv(shutdown) -> _ => break,
                recv(inbound) -> message => match message {
                    Ok(message) => self.handle(message),
                    Err(_) => {
                        debug!("Transport dropped its callbacks");
                        break;
                    }
                },
            }
        }
        debug!("sACN receiver thread exiting");
    }

    fn handle(&mut self, message: Inbound) {
        match message {
            Inbound::Packet {
                expected,
                packet,
                source,
            } => match (expected, packet) {
                (PacketType::Discovery, SacnPacket::Discovery(discovery)) => {
                    self.discovery.handle(&discovery);
                }
                (PacketType::Data, SacnPacket::Data(data)) => {
                    self.dispatcher.dispatch(&data);
                }
                (PacketType::Sync, SacnPacket::Sync(sync)) => {
                    self.stats.write().sync_packets += 1;
                    trace!(
                        "Sync on universe {} (seq {}) from {}",
                        sync.sync_address,
                        sync.sequence,
                        source
                    );
                }
                (expected, packet) => {
                    trace!(
                        "Ignoring {:?} packet delivered as {:?} from {}",
                        packet.packet_type(),
                        expected,
                        source
                    );
                }
            },
            Inbound::Terminated(universe) => self.discovery.handle_termination(universe),
        }
    }
}
