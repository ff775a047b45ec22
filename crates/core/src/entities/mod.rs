//! Consumer-side entities derived from snapshots.

pub mod yearly_registry;

pub use yearly_registry::{
    build_yearly_entities, YearScopedEntity, YearlyEntityRegistry, YearlyMetric,
};
