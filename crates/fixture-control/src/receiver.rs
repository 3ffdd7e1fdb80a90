//! Receiver abstraction used by [`Fixture`](crate::Fixture)

use fixture_core::ReceiverConfig;
use std::path::Path;

use crate::sacn::DataCallback;
use crate::Result;

/// A source of per-universe channel data
pub trait Receiver: Send {
    /// Short protocol name, e.g. `"sacn"`
    fn receiver_type(&self) -> &'static str;

    /// Register universes from config, returning how many were added
    fn configure(&self, config: &ReceiverConfig) -> usize;

    fn config_from_file(&self, path: &Path) -> Result<usize>;

    /// Attach or replace the handler of a registered universe
    fn add_data_handler(&self, universe: u16, handler: DataCallback) -> Result<()>;

    fn start(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;
}
