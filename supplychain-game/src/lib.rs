//! Supply Chain Game Engine
//!
//! Platform-agnostic round-resolution engine for the supply chain strategy
//! game: procurement under uncertain supplier yield, transport disruption and
//! damage, and stochastic demand. Rendering and persistence live elsewhere;
//! this crate only turns decisions into state transitions and ledger entries.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod decision;
pub mod events;
pub mod ledger;
pub mod numbers;
pub mod outcomes;
pub mod resolver;
pub mod result;
pub mod session;
pub mod state;
pub mod termination;

use std::convert::Infallible;
use std::sync::Arc;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, SupplierProfile, TransportProfile, YieldOutcome};
pub use config::{ConfigError, DemandRange, GameConfig};
pub use decision::{Decision, DecisionError, ResolvedDecision};
pub use events::{EventKind, EventSeverity, RoundEvent, RoundEvents, events_for};
pub use ledger::RoundLedgerEntry;
pub use outcomes::{OutcomeSource, RoundDraws, ScriptedOutcomes, SeededOutcomes, StreamDraws};
pub use resolver::{RoundResolution, resolve};
pub use result::ResultSummary;
pub use session::{GameSession, SessionError};
pub use state::GameState;
pub use termination::EndReason;

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the supplier and transporter catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or is invalid.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;

    /// Load the session configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid.
    fn load_config(&self) -> Result<GameConfig, Self::Error>;
}

/// Loader serving the built-in catalog and default configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticData;

impl DataLoader for StaticData {
    type Error = Infallible;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Ok(Catalog::standard().clone())
    }

    fn load_config(&self) -> Result<GameConfig, Self::Error> {
        Ok(GameConfig::default())
    }
}

/// Main game engine for creating sessions that share one catalog.
pub struct GameEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
    catalog: Arc<Catalog>,
    config: GameConfig,
}

impl<L> GameEngine<L>
where
    L: DataLoader,
{
    /// Create an engine, loading catalog and configuration once.
    ///
    /// # Errors
    ///
    /// Returns an error if either data set cannot be loaded or fails validation.
    pub fn new(data_loader: L) -> anyhow::Result<Self> {
        let catalog = data_loader.load_catalog()?;
        catalog.validate()?;
        let config = data_loader.load_config()?;
        config.validate()?;
        Ok(Self {
            data_loader,
            catalog: Arc::new(catalog),
            config,
        })
    }

    /// Start an independent seeded session. Sessions share only the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn create_session(&self, seed: u64) -> Result<GameSession, ConfigError> {
        GameSession::seeded(self.config.clone(), Arc::clone(&self.catalog), seed)
    }

    /// Start a session with a caller-supplied outcome source.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn create_session_with<O: OutcomeSource>(
        &self,
        outcomes: O,
    ) -> Result<GameSession<O>, ConfigError> {
        GameSession::new(self.config.clone(), Arc::clone(&self.catalog), outcomes)
    }

    /// Reload catalog and configuration from the data loader. Existing
    /// sessions keep the data they were created with.
    ///
    /// # Errors
    ///
    /// Returns an error if reloading fails; the engine keeps its old data.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        let catalog = self.data_loader.load_catalog()?;
        catalog.validate()?;
        let config = self.data_loader.load_config()?;
        config.validate()?;
        self.catalog = Arc::new(catalog);
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }
}
