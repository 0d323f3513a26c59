//! FSM specification types.
//!
//! An [`FsmSpec`] is the value every other module produces or consumes. In its
//! structured text form it looks like:
//!
//! ```yaml
//! alphabet_in:
//! - DONE
//! - GO
//! default_start_state: A
//! final_states: []
//! label: HelloWorldAbciApp
//! start_states:
//! - A
//! states:
//! - A
//! - B
//! transition_func:
//!   (A, GO): B
//!   (B, DONE): A
//! ```
//!
//! The `"(state, SYMBOL)"` key grammar only exists at text boundaries; in memory
//! transitions are keyed by [`TransitionKey`].

use crate::error::FsmError;
use crate::naming::camel_to_snake;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Label assigned by the parsers. Callers are expected to replace it.
pub const PLACEHOLDER_LABEL: &str = "HelloWorldAbciApp";

/// A state in the machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(pub String);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite transition key: the source state and the input symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionKey {
    pub state: State,
    pub symbol: String,
}

impl TransitionKey {
    pub fn new(state: impl Into<State>, symbol: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.state, self.symbol)
    }
}

impl FromStr for TransitionKey {
    type Err = FsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FsmError::InvalidKey { key: s.to_string() };

        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let (state, symbol) = inner.split_once(", ").ok_or_else(invalid)?;
        if state.is_empty() || symbol.is_empty() || symbol.contains([',', '|']) {
            return Err(invalid());
        }

        Ok(Self::new(state, symbol))
    }
}

/// Insertion-ordered transition function.
///
/// Inserting an existing key replaces its target but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    entries: Vec<(TransitionKey, State)>,
    index: HashMap<TransitionKey, usize>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a transition, returning the previous target if the key existed.
    pub fn insert(&mut self, key: TransitionKey, target: State) -> Option<State> {
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, target));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, target));
        None
    }

    pub fn get(&self, key: &TransitionKey) -> Option<&State> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &TransitionKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates transitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&TransitionKey, &State)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &TransitionKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Returns the distinct symbols in first-seen order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.keys()
            .map(|k| k.symbol.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Returns every state with an outgoing transition.
    pub fn sources(&self) -> HashSet<&State> {
        self.keys().map(|k| &k.state).collect()
    }

    /// Returns every state with an incoming transition.
    pub fn targets(&self) -> HashSet<&State> {
        self.entries.iter().map(|(_, v)| v).collect()
    }
}

impl PartialEq for TransitionTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for TransitionTable {}

impl FromIterator<(TransitionKey, State)> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = (TransitionKey, State)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, target) in iter {
            table.insert(key, target);
        }
        table
    }
}

impl Serialize for TransitionTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

impl<'de> Deserialize<'de> for TransitionTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = TransitionTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of '(state, SYMBOL)' keys to target states")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = TransitionTable::new();
                while let Some((key, target)) = map.next_entry::<String, State>()? {
                    let key = key.parse::<TransitionKey>().map_err(de::Error::custom)?;
                    table.insert(key, target);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// A finite state machine specification.
///
/// Field order matches the structured text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FsmSpec {
    /// Input symbols, upper-cased.
    pub alphabet_in: Vec<String>,

    /// The designated start state.
    pub default_start_state: State,

    /// Terminal states.
    pub final_states: Vec<State>,

    /// Free-text identifier chosen by the caller.
    pub label: String,

    /// Start state(s).
    pub start_states: Vec<State>,

    /// All declared states.
    pub states: Vec<State>,

    /// Transitions indexed by (state, symbol) -> target.
    pub transition_func: TransitionTable,
}

impl FsmSpec {
    /// Returns the spec with its label replaced.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Looks up the target for the given state and symbol.
    pub fn get_transition(&self, state: &State, symbol: &str) -> Option<&State> {
        self.transition_func
            .get(&TransitionKey::new(state.clone(), symbol))
    }

    pub fn has_state(&self, state: &State) -> bool {
        self.states.contains(state)
    }

    /// Returns all symbols leaving the given state.
    pub fn events_from(&self, state: &State) -> Vec<&str> {
        self.transition_func
            .keys()
            .filter(|k| &k.state == state)
            .map(|k| k.symbol.as_str())
            .collect()
    }

    /// Returns declared states that are neither the start state nor final.
    pub fn intermediate_states(&self) -> Vec<&State> {
        self.states
            .iter()
            .filter(|s| **s != self.default_start_state && !self.final_states.contains(s))
            .collect()
    }

    /// Derives a snake case package name from the label, dropping a trailing `App`.
    pub fn skill_name(&self) -> String {
        let stem = self.label.strip_suffix("App").unwrap_or(&self.label);
        camel_to_snake(stem)
    }

    /// Checks that every referenced state is declared.
    ///
    /// Final states may still have outgoing transitions: a state diagram marks them
    /// explicitly with `X --> [*]`.
    pub fn validate(&self) -> Result<(), FsmError> {
        let declared: HashSet<&State> = self.states.iter().collect();
        let undeclared = |role: &str, state: &State| FsmError::InvalidSpec {
            reason: format!("{} '{}' not in states list", role, state),
        };

        if !declared.contains(&self.default_start_state) {
            return Err(undeclared("default start state", &self.default_start_state));
        }
        if let Some(s) = self.start_states.iter().find(|s| !declared.contains(s)) {
            return Err(undeclared("start state", s));
        }
        if let Some(s) = self.final_states.iter().find(|s| !declared.contains(s)) {
            return Err(undeclared("final state", s));
        }

        for (key, target) in self.transition_func.iter() {
            if !declared.contains(&key.state) {
                return Err(undeclared("transition source", &key.state));
            }
            if !declared.contains(target) {
                return Err(undeclared("transition target", target));
            }
        }

        Ok(())
    }
}
