//! Flowchart dialect parser.
//!
//! The flowchart dialect is a restricted `graph TD` Mermaid diagram where every
//! line is either a bare state name or a labelled edge:
//!
//! ```text
//! graph TD
//!   A
//!   A -->|go| B
//!   B -->|done| A
//! ```
//!
//! Edge labels are upper-cased to become input symbols.

use crate::error::FsmError;
use crate::infer::{self, ParseOptions};
use crate::spec::{FsmSpec, State, TransitionKey, TransitionTable, PLACEHOLDER_LABEL};
use std::collections::{BTreeSet, HashSet};

/// Parses flowchart text with the default options.
pub fn parse(text: &str) -> Result<FsmSpec, FsmError> {
    parse_with(text, &ParseOptions::default())
}

/// Parses flowchart text.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<FsmSpec, FsmError> {
    let mut states = Vec::new();
    let mut seen = HashSet::new();
    let mut declared = Vec::new();
    let mut transitions = TransitionTable::new();

    let mut note = |name: &str, states: &mut Vec<State>| {
        let state = State::from(name);
        if seen.insert(state.clone()) {
            states.push(state.clone());
        }
        state
    };

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_header(line) || line.starts_with("%%") {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [state] => declared.push(note(*state, &mut states)),
            [source, arrow, target] => {
                let symbol = edge_label(arrow)
                    .ok_or_else(|| {
                        FsmError::format(
                            idx + 1,
                            format!("expected a '-->|LABEL|' arrow, found '{}'", arrow),
                        )
                    })?
                    .to_uppercase();

                note(*source, &mut states);
                note(*target, &mut states);

                let key = TransitionKey::new(*source, symbol);
                if let Some(previous) = transitions.insert(key, State::from(*target)) {
                    tracing::debug!(
                        "line {}: edge {} {} redefined, replacing target '{}'",
                        idx + 1,
                        source,
                        arrow,
                        previous
                    );
                }
            }
            other => {
                return Err(FsmError::format(
                    idx + 1,
                    format!("expected 1 or 3 tokens, found {}", other.len()),
                ));
            }
        }
    }

    let alphabet_in: BTreeSet<&str> = transitions.keys().map(|k| k.symbol.as_str()).collect();
    let alphabet_in = alphabet_in.into_iter().map(str::to_string).collect();

    let start = infer::start_state(&states, &transitions, &declared, options)?;
    let final_states = infer::final_states(&states, &transitions);

    tracing::debug!(
        "parsed flowchart: {} states, {} transitions, start '{}'",
        states.len(),
        transitions.len(),
        start
    );

    Ok(FsmSpec {
        alphabet_in,
        default_start_state: start.clone(),
        final_states,
        label: PLACEHOLDER_LABEL.to_string(),
        start_states: vec![start],
        states,
        transition_func: transitions,
    })
}

fn is_header(line: &str) -> bool {
    line.starts_with("graph") || line.starts_with("flowchart")
}

/// Extracts `LABEL` from `-->|LABEL|`.
fn edge_label(arrow: &str) -> Option<&str> {
    arrow.split('|').nth(1).filter(|label| !label.is_empty())
}
