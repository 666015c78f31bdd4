//! Enumeration of a block's full state space.

use crate::schema::PropertyDefinition;
use std::collections::BTreeMap;

/// One concrete block state: property name to value.
///
/// Properties are kept sorted by name so the canonical string does not
/// depend on declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StateAssignment {
    values: BTreeMap<String, String>,
}

impl StateAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `k1=v1,k2=v2` with keys in lexicographic order. The state of a block
    /// without properties is the empty string.
    pub fn canonical(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// The Cartesian product of a block's property domains.
#[derive(Debug, Clone, Default)]
pub struct StateSpace {
    axes: Vec<(String, Vec<String>)>,
}

impl StateSpace {
    pub fn new(properties: &[PropertyDefinition]) -> Self {
        Self {
            axes: properties
                .iter()
                .map(|p| (p.name.clone(), p.domain()))
                .collect(),
        }
    }

    /// Number of states. Zero if any property has an empty domain.
    pub fn len(&self) -> usize {
        self.axes.iter().map(|(_, values)| values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A fresh pass over every state. The space can be iterated any number of times.
    pub fn iter(&self) -> StateIter<'_> {
        StateIter {
            space: self,
            indices: vec![0; self.axes.len()],
            exhausted: self.is_empty(),
        }
    }
}

impl<'a> IntoIterator for &'a StateSpace {
    type Item = StateAssignment;
    type IntoIter = StateIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over the state space. The last declared property varies fastest.
pub struct StateIter<'a> {
    space: &'a StateSpace,
    indices: Vec<usize>,
    exhausted: bool,
}

impl Iterator for StateIter<'_> {
    type Item = StateAssignment;

    fn next(&mut self) -> Option<StateAssignment> {
        if self.exhausted {
            return None;
        }

        let mut state = StateAssignment::new();
        for ((name, values), &i) in self.space.axes.iter().zip(&self.indices) {
            state.values.insert(name.clone(), values[i].clone());
        }

        // Advance; when every digit wraps the space is done.
        self.exhausted = true;
        for (digit, (_, values)) in self.indices.iter_mut().zip(&self.space.axes).rev() {
            *digit += 1;
            if *digit < values.len() {
                self.exhausted = false;
                break;
            }
            *digit = 0;
        }

        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_enumeration_is_complete() {
        let space = StateSpace::new(&[
            PropertyDefinition::boolean("a"),
            PropertyDefinition::enumeration("b", &["x", "y", "z"]),
        ]);

        let states: Vec<String> = space.iter().map(|s| s.canonical()).collect();
        assert_eq!(states.len(), 6);
        assert_eq!(space.len(), 6);

        let distinct: HashSet<_> = states.iter().collect();
        assert_eq!(distinct.len(), 6);
        for state in &states {
            let (a, b) = state.split_once(',').unwrap();
            assert!(a == "a=true" || a == "a=false", "{}", state);
            assert!(["b=x", "b=y", "b=z"].contains(&b), "{}", state);
        }
    }

    #[test]
    fn test_declaration_order_does_not_matter() {
        let ab = StateSpace::new(&[PropertyDefinition::boolean("a"), PropertyDefinition::boolean("b")]);
        let ba = StateSpace::new(&[PropertyDefinition::boolean("b"), PropertyDefinition::boolean("a")]);

        let mut from_ab: Vec<_> = ab.iter().map(|s| s.canonical()).collect();
        let mut from_ba: Vec<_> = ba.iter().map(|s| s.canonical()).collect();
        from_ab.sort();
        from_ba.sort();
        assert_eq!(from_ab, from_ba);
        assert!(from_ab.contains(&"a=false,b=true".to_string()));
    }

    #[test]
    fn test_restartable() {
        let space = StateSpace::new(&[PropertyDefinition::integer("age", 3)]);
        let first: Vec<_> = space.iter().collect();
        let second: Vec<_> = (&space).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first[2].get("age"), Some("2"));
    }

    #[test]
    fn test_no_properties_yields_one_empty_state() {
        let space = StateSpace::new(&[]);
        let states: Vec<_> = space.iter().collect();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].canonical(), "");
    }

    #[test]
    fn test_empty_domain_yields_nothing() {
        let space = StateSpace::new(&[
            PropertyDefinition::boolean("lit"),
            PropertyDefinition::integer("level", 0),
        ]);
        assert!(space.is_empty());
        assert_eq!(space.iter().count(), 0);
    }
}
