//! Predicates built from variant keys and multipart `when` clauses.

use super::state_space::StateAssignment;
use crate::resource_pack::{ConditionMap, MultipartCondition};
use std::collections::BTreeMap;

/// Property name to the set of values it may take.
pub type ValueSets = BTreeMap<String, Vec<String>>;

/// A matching rule over one block state.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every listed property must take one of its allowed values.
    /// Properties of the state that are not listed are ignored.
    ExactMap(ValueSets),
    /// Any inner map matches.
    Or(Vec<ValueSets>),
    /// Every inner map matches.
    And(Vec<ValueSets>),
}

impl Predicate {
    pub fn matches(&self, state: &StateAssignment) -> bool {
        match self {
            Predicate::ExactMap(map) => map_matches(map, state),
            Predicate::Or(maps) => maps.iter().any(|map| map_matches(map, state)),
            Predicate::And(maps) => maps.iter().all(|map| map_matches(map, state)),
        }
    }

    /// Build a predicate from a multipart `when` clause.
    pub fn from_condition(condition: &MultipartCondition) -> Self {
        match condition {
            MultipartCondition::Simple(map) => Predicate::ExactMap(value_sets(map)),
            MultipartCondition::Or { or } => Predicate::Or(or.iter().map(value_sets).collect()),
            MultipartCondition::And { and } => Predicate::And(and.iter().map(value_sets).collect()),
        }
    }
}

fn map_matches(map: &ValueSets, state: &StateAssignment) -> bool {
    map.iter().all(|(name, allowed)| {
        state
            .get(name)
            .map(|value| allowed.iter().any(|a| a == value))
            .unwrap_or(false)
    })
}

fn value_sets(map: &ConditionMap) -> ValueSets {
    map.iter()
        .map(|(name, value)| {
            (
                name.clone(),
                value.alternatives().map(str::to_string).collect(),
            )
        })
        .collect()
}

/// Parse a variant key such as `facing=north,half=top` into an exact-match
/// predicate. A `|`-joined value allows several values. Segments without
/// `=` carry no constraint.
pub fn parse_variant_key(key: &str) -> Predicate {
    let map = key
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, values)| {
            (
                name.trim().to_string(),
                values.split('|').map(|v| v.trim().to_string()).collect(),
            )
        })
        .collect();
    Predicate::ExactMap(map)
}
