//! State diagram dialect parser.
//!
//! Accepts `stateDiagram-v2` edges of the form `SOURCE --> TARGET: Label`. The
//! pseudostate `[*]` marks implicit start (`[*] --> X`) and end (`X --> [*]`)
//! edges; those never become transitions. Labels are converted to upper snake
//! case to form input symbols.

use crate::error::FsmError;
use crate::infer::{self, ParseOptions};
use crate::naming::to_upper_snake;
use crate::spec::{FsmSpec, State, TransitionKey, TransitionTable, PLACEHOLDER_LABEL};
use std::collections::{BTreeSet, HashSet};

const PSEUDOSTATE: &str = "[*]";
const ARROW: &str = "-->";

/// Parses state diagram text with the default options.
pub fn parse(text: &str) -> Result<FsmSpec, FsmError> {
    parse_with(text, &ParseOptions::default())
}

/// Parses state diagram text.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<FsmSpec, FsmError> {
    let mut states: Vec<State> = Vec::new();
    let mut seen = HashSet::new();
    let mut declared = Vec::new();
    let mut initial: Vec<State> = Vec::new();
    let mut terminal: Vec<State> = Vec::new();
    let mut transitions = TransitionTable::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("stateDiagram") || line.starts_with("%%") {
            continue;
        }

        let edge = Edge::parse(line).map_err(|reason| FsmError::format(idx + 1, reason))?;

        let pseudo_edge = edge.source == PSEUDOSTATE || edge.target == PSEUDOSTATE;
        for endpoint in [edge.source, edge.target] {
            if endpoint == PSEUDOSTATE {
                continue;
            }
            let state = State::from(endpoint);
            if seen.insert(state.clone()) {
                states.push(state.clone());
            }
            if pseudo_edge {
                declared.push(state);
            }
        }

        match (edge.source, edge.target, edge.label) {
            (PSEUDOSTATE, PSEUDOSTATE, _) => {
                return Err(FsmError::format(
                    idx + 1,
                    "an edge cannot join two pseudostates",
                ));
            }
            (PSEUDOSTATE, target, _) => push_unique(&mut initial, State::from(target)),
            (source, PSEUDOSTATE, _) => push_unique(&mut terminal, State::from(source)),
            (source, target, Some(label)) => {
                let key = TransitionKey::new(source, to_upper_snake(label));
                if let Some(previous) = transitions.insert(key, State::from(target)) {
                    tracing::debug!(
                        "line {}: transition from '{}' on '{}' redefined, replacing target '{}'",
                        idx + 1,
                        source,
                        label,
                        previous
                    );
                }
            }
            (_, _, None) => {
                return Err(FsmError::format(
                    idx + 1,
                    "transition between real states needs a ': Label'",
                ));
            }
        }
    }

    let alphabet_in: BTreeSet<&str> = transitions.keys().map(|k| k.symbol.as_str()).collect();
    let alphabet_in = alphabet_in.into_iter().map(str::to_string).collect();

    let start_states = if initial.is_empty() {
        vec![infer::start_state(
            &states,
            &transitions,
            &declared,
            options,
        )?]
    } else {
        initial
    };
    let final_states = if terminal.is_empty() {
        infer::final_states(&states, &transitions)
    } else {
        terminal
    };

    tracing::debug!(
        "parsed state diagram: {} states, {} transitions, {} start state(s)",
        states.len(),
        transitions.len(),
        start_states.len()
    );

    Ok(FsmSpec {
        alphabet_in,
        default_start_state: start_states[0].clone(),
        final_states,
        label: PLACEHOLDER_LABEL.to_string(),
        start_states,
        states,
        transition_func: transitions,
    })
}

fn push_unique(list: &mut Vec<State>, state: State) {
    if !list.contains(&state) {
        list.push(state);
    }
}

/// One edge line, borrowed from the input.
struct Edge<'a> {
    source: &'a str,
    target: &'a str,
    label: Option<&'a str>,
}

impl<'a> Edge<'a> {
    fn parse(line: &'a str) -> Result<Self, String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (source, target, label) = match tokens.as_slice() {
            [source, ARROW, target, label] => {
                let target = (*target).strip_suffix(':').ok_or_else(|| {
                    format!("expected 'SOURCE --> TARGET: LABEL', found '{}'", line)
                })?;
                (*source, target, Some(*label))
            }
            [source, ARROW, target] if !target.ends_with(':') => (*source, *target, None),
            _ => {
                return Err(format!(
                    "expected 'SOURCE --> TARGET: LABEL', found '{}'",
                    line
                ))
            }
        };

        if source.is_empty() || target.is_empty() {
            return Err(format!("missing state name in '{}'", line));
        }
        if label.is_some_and(|label| label.contains('|')) {
            return Err(format!("label may not contain '|' in '{}'", line));
        }

        Ok(Self {
            source,
            target,
            label,
        })
    }
}
