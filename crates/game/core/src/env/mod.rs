//! Read-only collaborators the engine consults.
//!
//! [`GameEnv`] bundles the card catalog, the game configuration and the RNG
//! oracle so effects can reach them without hard coupling to concrete
//! implementations.
mod catalog;
mod error;
mod rng;

pub use catalog::{CardCatalog, CardDefinition, CardKind, InMemoryCatalog, TriggerSpec};
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed, shuffle};

use crate::config::GameConfig;
use crate::state::CardRef;

static DEFAULT_RNG: PcgRng = PcgRng;

/// Aggregates the read-only oracles required by the engine.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    catalog: &'a dyn CardCatalog,
    config: &'a GameConfig,
    rng: &'a dyn RngOracle,
}

impl<'a> GameEnv<'a> {
    /// Environment using the default PCG oracle.
    pub fn new(catalog: &'a dyn CardCatalog, config: &'a GameConfig) -> Self {
        Self {
            catalog,
            config,
            rng: &DEFAULT_RNG,
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = rng;
        self
    }

    pub fn catalog(&self) -> &'a dyn CardCatalog {
        self.catalog
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    /// Looks a card up by slug.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::CardNotFound` if the catalog has no such card.
    pub fn card(&self, slug: &CardRef) -> Result<&'a CardDefinition, OracleError> {
        self.catalog.lookup(slug)
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
