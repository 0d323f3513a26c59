//! Start and final state inference shared by the dialect parsers.

use crate::error::FsmError;
use crate::spec::{State, TransitionTable};
use std::collections::HashMap;

/// What to do when every state is the target of some transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartFallback {
    /// Pick the state named most often in the input, first occurrence winning ties.
    #[default]
    MostFrequent,
    /// Fail with [`FsmError::NoStartState`].
    Reject,
}

/// Options shared by the dialect parsers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub start_fallback: StartFallback,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            start_fallback: StartFallback::Reject,
        }
    }
}

/// Infers the single start state from in-degree.
///
/// `declared` holds the state tokens that appeared outside any transition, such as
/// bare flowchart lines. With the endpoints of the surviving transitions they feed
/// the frequency fallback, so a redefined edge no longer counts.
pub(crate) fn start_state(
    states: &[State],
    transitions: &TransitionTable,
    declared: &[State],
    options: &ParseOptions,
) -> Result<State, FsmError> {
    let targets = transitions.targets();
    let candidates: Vec<&State> = states.iter().filter(|s| !targets.contains(s)).collect();

    match candidates.as_slice() {
        [only] => Ok((*only).clone()),
        [] => match options.start_fallback {
            StartFallback::MostFrequent => {
                let chosen =
                    most_frequent(states, transitions, declared).ok_or(FsmError::NoStartState)?;
                tracing::warn!(
                    "no state without incoming transitions, using most frequent state '{}' as start",
                    chosen
                );
                Ok(chosen)
            }
            StartFallback::Reject => Err(FsmError::NoStartState),
        },
        many => Err(FsmError::AmbiguousStart {
            candidates: many.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

/// States that are some transition's target and never a source, in declaration order.
pub(crate) fn final_states(states: &[State], transitions: &TransitionTable) -> Vec<State> {
    let sources = transitions.sources();
    let targets = transitions.targets();
    states
        .iter()
        .filter(|s| targets.contains(s) && !sources.contains(s))
        .cloned()
        .collect()
}

/// Most mentioned state; ties go to the earliest in `states`.
fn most_frequent(
    states: &[State],
    transitions: &TransitionTable,
    declared: &[State],
) -> Option<State> {
    let mut counts: HashMap<&State, usize> = HashMap::new();
    let endpoints = transitions
        .iter()
        .flat_map(|(key, target)| [&key.state, target]);
    for state in declared.iter().chain(endpoints) {
        *counts.entry(state).or_default() += 1;
    }

    let mut best: Option<(&State, usize)> = None;
    for state in states {
        let count = counts.get(state).copied().unwrap_or(0);
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((state, count));
        }
    }
    best.map(|(s, _)| s.clone())
}
