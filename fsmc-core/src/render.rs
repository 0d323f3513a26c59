//! Flowchart renderer.

use crate::spec::FsmSpec;

const INDENT: &str = "  ";

/// Renders a spec as flowchart dialect text.
///
/// The start state is written first and then again with the other declared
/// states. Transitions follow in insertion order.
pub fn to_mermaid(spec: &FsmSpec) -> String {
    let mut out = String::from("graph TD\n");

    out.push_str(&format!("{INDENT}{}\n", spec.default_start_state));
    for state in &spec.states {
        out.push_str(&format!("{INDENT}{}\n", state));
    }
    for (key, target) in spec.transition_func.iter() {
        out.push_str(&format!(
            "{INDENT}{} -->|{}| {}\n",
            key.state, key.symbol, target
        ));
    }

    out
}

impl FsmSpec {
    /// Renders this spec as flowchart dialect text.
    pub fn to_mermaid(&self) -> String {
        to_mermaid(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowchart;
    use crate::spec::{State, TransitionKey};
    use proptest::prelude::*;
    use std::collections::HashSet;

    const EXAMPLE: &str = r#"
alphabet_in:
- DONE
- NO_MAJORITY
- RESET_TIMEOUT
- ROUND_TIMEOUT
default_start_state: RegistrationRound
final_states: []
label: HelloWorldAbciApp
start_states:
- RegistrationRound
states:
- RegistrationRound
- CollectRandomnessRound
- PrintMessageRound
- ResetAndPauseRound
- SelectKeeperRound
transition_func:
  (CollectRandomnessRound, DONE): SelectKeeperRound
  (CollectRandomnessRound, NO_MAJORITY): CollectRandomnessRound
  (CollectRandomnessRound, ROUND_TIMEOUT): CollectRandomnessRound
  (PrintMessageRound, DONE): ResetAndPauseRound
  (PrintMessageRound, ROUND_TIMEOUT): RegistrationRound
  (RegistrationRound, DONE): CollectRandomnessRound
  (ResetAndPauseRound, DONE): CollectRandomnessRound
  (ResetAndPauseRound, NO_MAJORITY): RegistrationRound
  (ResetAndPauseRound, RESET_TIMEOUT): RegistrationRound
  (SelectKeeperRound, DONE): PrintMessageRound
  (SelectKeeperRound, NO_MAJORITY): RegistrationRound
  (SelectKeeperRound, ROUND_TIMEOUT): RegistrationRound
"#;

    fn state_set(spec: &FsmSpec) -> HashSet<State> {
        spec.states.iter().cloned().collect()
    }

    #[test]
    fn test_to_mermaid() {
        let spec = FsmSpec::from_yaml(EXAMPLE).unwrap();
        let expected = "\
graph TD
  RegistrationRound
  RegistrationRound
  CollectRandomnessRound
  PrintMessageRound
  ResetAndPauseRound
  SelectKeeperRound
  CollectRandomnessRound -->|DONE| SelectKeeperRound
  CollectRandomnessRound -->|NO_MAJORITY| CollectRandomnessRound
  CollectRandomnessRound -->|ROUND_TIMEOUT| CollectRandomnessRound
  PrintMessageRound -->|DONE| ResetAndPauseRound
  PrintMessageRound -->|ROUND_TIMEOUT| RegistrationRound
  RegistrationRound -->|DONE| CollectRandomnessRound
  ResetAndPauseRound -->|DONE| CollectRandomnessRound
  ResetAndPauseRound -->|NO_MAJORITY| RegistrationRound
  ResetAndPauseRound -->|RESET_TIMEOUT| RegistrationRound
  SelectKeeperRound -->|DONE| PrintMessageRound
  SelectKeeperRound -->|NO_MAJORITY| RegistrationRound
  SelectKeeperRound -->|ROUND_TIMEOUT| RegistrationRound
";
        assert_eq!(spec.to_mermaid(), expected);
    }

    #[test]
    fn test_yaml_spec_survives_flowchart() {
        let spec = FsmSpec::from_yaml(EXAMPLE).unwrap();
        let reparsed = flowchart::parse(&spec.to_mermaid()).unwrap();

        // Every state has incoming edges here, so the start comes from the frequency fallback.
        assert_eq!(reparsed.default_start_state, spec.default_start_state);
        assert_eq!(state_set(&reparsed), state_set(&spec));
        assert_eq!(reparsed.alphabet_in, spec.alphabet_in);
        assert_eq!(reparsed.transition_func, spec.transition_func);
    }

    #[test]
    fn test_state_diagram_survives_flowchart() {
        let text = "stateDiagram-v2\n  [*] --> Idle: Start\n  Idle --> Busy: GotWork\n  Busy --> Idle: Done\n  Busy --> Failed: Crash\n";
        let spec = crate::state_diagram::parse(text).unwrap();
        let reparsed = flowchart::parse(&spec.to_mermaid()).unwrap();

        assert_eq!(reparsed.default_start_state, spec.default_start_state);
        assert_eq!(state_set(&reparsed), state_set(&spec));
        assert_eq!(reparsed.alphabet_in, spec.alphabet_in);
        assert_eq!(reparsed.transition_func, spec.transition_func);
        assert_eq!(reparsed.final_states, vec![State::from("Failed")]);
    }

    #[test]
    fn test_render_without_transitions() {
        let spec = FsmSpec {
            alphabet_in: vec![],
            default_start_state: State::from("Only"),
            final_states: vec![],
            label: "OnlyAbciApp".to_string(),
            start_states: vec![State::from("Only")],
            states: vec![State::from("Only")],
            transition_func: Default::default(),
        };
        assert_eq!(to_mermaid(&spec), "graph TD\n  Only\n  Only\n");
        let reparsed = flowchart::parse(&to_mermaid(&spec)).unwrap();
        assert_eq!(reparsed.default_start_state, State::from("Only"));
    }

    fn edges() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
        prop::collection::vec((0..6usize, 0..4usize, 0..6usize), 1..16)
    }

    proptest! {
        #[test]
        fn test_flowchart_round_trip(edges in edges()) {
            let mut text = String::from("graph TD\n");
            for (source, symbol, target) in &edges {
                text.push_str(&format!("  S{} -->|e{}| S{}\n", source, symbol, target));
            }

            let spec = match flowchart::parse(&text) {
                Ok(spec) => spec,
                Err(_) => return Ok(()),
            };
            let reparsed = flowchart::parse(&spec.to_mermaid()).unwrap();

            prop_assert_eq!(&reparsed.default_start_state, &spec.default_start_state);
            prop_assert_eq!(state_set(&reparsed), state_set(&spec));
            prop_assert_eq!(&reparsed.alphabet_in, &spec.alphabet_in);
            prop_assert_eq!(&reparsed.transition_func, &spec.transition_func);
            prop_assert_eq!(
                reparsed.final_states.iter().collect::<HashSet<_>>(),
                spec.final_states.iter().collect::<HashSet<_>>()
            );
            prop_assert!(spec
                .transition_func
                .keys()
                .all(|k: &TransitionKey| k.symbol.starts_with('E')));
        }
    }
}
