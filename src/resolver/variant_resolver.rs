//! Blockstate resolution into per-state variant groups.
//!
//! Entries are processed in document order. Each concrete state is claimed
//! by the first entry that matches it; later entries only see what is left.
//! An unconditional entry covers every remaining state and ends resolution.
//!
//! Multipart documents are flattened the same way: a state gets the single
//! first matching part, not the composition of every matching part.

use super::condition::{parse_variant_key, Predicate};
use super::state_space::StateSpace;
use crate::diagnostics::Diagnostics;
use crate::resource_pack::{BlockstateDefinition, MultipartCondition, VariantBody};
use crate::schema::{PropertyDefinition, StateSchemaProvider};
use std::collections::HashSet;

/// One conditional entry of a blockstate document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateEntry<'a> {
    /// A `variants` key and its body.
    Variant { key: &'a str, body: &'a VariantBody },
    /// A `multipart` case.
    Part {
        when: Option<&'a MultipartCondition>,
        apply: &'a VariantBody,
    },
}

impl<'a> StateEntry<'a> {
    /// Every entry of a document, in document order.
    pub fn all(definition: &'a BlockstateDefinition) -> Vec<StateEntry<'a>> {
        match definition {
            BlockstateDefinition::Variants(variants) => variants
                .iter()
                .map(|(key, body)| StateEntry::Variant { key, body })
                .collect(),
            BlockstateDefinition::Multipart(cases) => cases
                .iter()
                .map(|case| StateEntry::Part {
                    when: case.when.as_ref(),
                    apply: &case.apply,
                })
                .collect(),
        }
    }

    pub fn body(&self) -> &'a VariantBody {
        match self {
            StateEntry::Variant { body, .. } => *body,
            StateEntry::Part { apply, .. } => *apply,
        }
    }

    /// The predicate this entry applies under, or `None` if it applies to every state.
    pub fn predicate(&self) -> Option<Predicate> {
        match self {
            StateEntry::Variant { key, .. } if key.is_empty() => None,
            StateEntry::Variant { key, .. } => Some(parse_variant_key(key)),
            StateEntry::Part { when: None, .. } => None,
            StateEntry::Part { when: Some(when), .. } if when.is_unconditional() => None,
            StateEntry::Part { when: Some(when), .. } => Some(Predicate::from_condition(when)),
        }
    }
}

/// The states a group applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedStates {
    /// Canonical state strings, in enumeration order.
    States(Vec<String>),
    /// Every state of the block not claimed by an earlier group.
    Unconditional,
}

/// A cluster of states sharing one placement body.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantGroup {
    pub matched: MatchedStates,
    pub body: VariantBody,
}

impl VariantGroup {
    pub fn is_unconditional(&self) -> bool {
        self.matched == MatchedStates::Unconditional
    }
}

/// Resolve `entries` over the state space described by `properties`.
pub fn resolve_entries(properties: &[PropertyDefinition], entries: &[StateEntry<'_>]) -> Vec<VariantGroup> {
    let space = StateSpace::new(properties);
    let mut claimed = HashSet::new();
    let mut groups = Vec::new();

    for entry in entries {
        let Some(group) = resolve_entry(&space, entry, &mut claimed) else {
            continue;
        };
        let done = group.is_unconditional();
        groups.push(group);
        if done {
            break;
        }
    }

    groups
}

/// Resolve one entry against the states not yet in `claimed`, claiming what it matches.
fn resolve_entry(
    space: &StateSpace,
    entry: &StateEntry<'_>,
    claimed: &mut HashSet<String>,
) -> Option<VariantGroup> {
    let Some(predicate) = entry.predicate() else {
        return Some(VariantGroup {
            matched: MatchedStates::Unconditional,
            body: entry.body().clone(),
        });
    };

    let states: Vec<String> = space
        .iter()
        .filter(|state| predicate.matches(state))
        .map(|state| state.canonical())
        .filter(|canonical| !claimed.contains(canonical))
        .collect();

    if states.is_empty() {
        return None;
    }

    claimed.extend(states.iter().cloned());
    Some(VariantGroup {
        matched: MatchedStates::States(states),
        body: entry.body().clone(),
    })
}

/// Resolves blocks by name against a state schema provider.
pub struct VariantResolver<'a, S: StateSchemaProvider> {
    schema: &'a S,
}

impl<'a, S: StateSchemaProvider> VariantResolver<'a, S> {
    pub fn new(schema: &'a S) -> Self {
        Self { schema }
    }

    /// Resolve the entries of `block` (without namespace). A block the schema
    /// does not know is skipped with an info diagnostic and yields `None`.
    pub fn resolve(
        &self,
        block: &str,
        entries: &[StateEntry<'_>],
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<VariantGroup>> {
        let Some(properties) = self.schema.state_schema(block) else {
            diagnostics.info(format!("minecraft:{}", block), "no state schema, skipped");
            return None;
        };

        let groups = resolve_entries(&properties, entries);
        log::debug!("resolved {} into {} variant groups", block, groups.len());
        Some(groups)
    }

    /// Resolve a whole blockstate document.
    pub fn resolve_definition(
        &self,
        block: &str,
        definition: &BlockstateDefinition,
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<VariantGroup>> {
        self.resolve(block, &StateEntry::all(definition), diagnostics)
    }
}
