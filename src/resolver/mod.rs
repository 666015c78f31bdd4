//! Block state and model resolution.
//!
//! This module expands blockstate documents into per-state variant groups
//! and flattens model inheritance chains.

pub mod associations;
pub mod condition;
pub mod model_flattener;
pub mod state_space;
pub mod variant_resolver;

pub use associations::{find_model_associations, group_by_block, StateCondition};
pub use condition::{parse_variant_key, Predicate};
pub use model_flattener::{
    CubeTemplate, FlattenMode, FlattenedModel, ModelFlattener, ModelKind, Provenance,
};
pub use state_space::{StateAssignment, StateSpace};
pub use variant_resolver::{resolve_entries, MatchedStates, StateEntry, VariantGroup, VariantResolver};
