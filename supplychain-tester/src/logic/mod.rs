pub mod loader;
pub mod playthrough;
pub mod policy;
pub mod reports;
pub mod seeds;

pub use loader::FileData;
pub use playthrough::{PlayRecord, StrategyAggregate, aggregate_records, run_sweep};
pub use policy::GameplayStrategy;
pub use seeds::resolve_seed_inputs;
