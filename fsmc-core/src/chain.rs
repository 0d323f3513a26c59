//! Sequential composition of FSM specs.
//!
//! Each component hands over to the next one through a synthetic `DONE`
//! transition from every final state of the previous component to every start
//! state of the next.

use crate::error::FsmError;
use crate::spec::{FsmSpec, State, TransitionKey, TransitionTable};
use std::collections::{BTreeSet, HashSet};

/// Symbol used for the bridging transitions.
pub const BRIDGE_SYMBOL: &str = "DONE";

/// Label given to a chained spec. Callers are expected to replace it.
pub const CHAINED_LABEL: &str = "ChainedFSM";

/// Chains an ordered list of FSM specs into one.
#[derive(Debug, Clone)]
pub struct Chainer {
    fsms: Vec<FsmSpec>,
}

impl Chainer {
    pub fn new(fsms: Vec<FsmSpec>) -> Self {
        Self { fsms }
    }

    pub fn fsms(&self) -> &[FsmSpec] {
        &self.fsms
    }

    /// Extension point for cross-component checks. Currently accepts everything.
    pub fn validate(&self) -> Result<(), FsmError> {
        Ok(())
    }

    /// Builds the composed spec.
    pub fn chain(&self) -> Result<FsmSpec, FsmError> {
        self.validate()?;

        let (first, last) = match (self.fsms.first(), self.fsms.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(FsmError::EmptyChain),
        };

        let mut states: Vec<State> = Vec::new();
        let mut seen: HashSet<&State> = HashSet::new();
        let mut alphabet: BTreeSet<&str> = BTreeSet::new();
        let mut transitions = TransitionTable::new();
        let mut bridges = 0usize;

        alphabet.insert(BRIDGE_SYMBOL);

        for (i, fsm) in self.fsms.iter().enumerate() {
            for state in &fsm.states {
                if seen.insert(state) {
                    states.push(state.clone());
                }
            }
            alphabet.extend(fsm.alphabet_in.iter().map(String::as_str));

            for (key, target) in fsm.transition_func.iter() {
                transitions.insert(key.clone(), target.clone());
            }

            if i > 0 {
                let previous = &self.fsms[i - 1];
                for final_state in &previous.final_states {
                    for start_state in &fsm.start_states {
                        transitions.insert(
                            TransitionKey::new(final_state.clone(), BRIDGE_SYMBOL),
                            start_state.clone(),
                        );
                        bridges += 1;
                    }
                }
            }
        }

        tracing::debug!(
            "chained {} FSMs: {} states, {} transitions, {} bridges",
            self.fsms.len(),
            states.len(),
            transitions.len(),
            bridges
        );

        Ok(FsmSpec {
            alphabet_in: alphabet.into_iter().map(str::to_string).collect(),
            default_start_state: first.default_start_state.clone(),
            final_states: last.final_states.clone(),
            label: CHAINED_LABEL.to_string(),
            start_states: first.start_states.clone(),
            states,
            transition_func: transitions,
        })
    }
}
