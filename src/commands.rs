//! Command execution.

use crate::config::{Config, OutputFormat};
use crate::Commands;
use colored::Colorize;
use fsmc_core::{Chainer, Dialect, FsmError, FsmSpec, ParseOptions};
use std::path::Path;

/// How to interpret an input file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// Mermaid if the file starts with a diagram keyword, YAML otherwise.
    #[default]
    Auto,
    /// Mermaid flowchart or state diagram.
    Mermaid,
    /// Structured YAML spec.
    FsmSpec,
}

/// Executes a command and returns the text to print.
pub fn execute(cmd: Commands, config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let options = config.parse.options();

    match cmd {
        Commands::Convert {
            file,
            label,
            in_type,
            output,
        } => {
            check_label(&label, &config.label.required_suffix)?;
            let spec = load_spec(&file, in_type, &options)?.with_label(label);
            Ok(render(&spec, output.unwrap_or(config.output.format))?)
        }

        Commands::Chain {
            files,
            label,
            in_type,
            output,
        } => {
            check_label(&label, &config.label.required_suffix)?;
            let fsms = files
                .iter()
                .map(|file| load_spec(file, in_type, &options))
                .collect::<Result<Vec<_>, _>>()?;
            let spec = Chainer::new(fsms).chain()?.with_label(label);
            Ok(render(&spec, output.unwrap_or(config.output.format))?)
        }

        Commands::Validate { file, in_type } => {
            let spec = load_spec(&file, in_type, &options)?;
            spec.validate()?;
            Ok(format!(
                "{} {} ({}): {} states ({} intermediate), {} symbols, {} transitions, start {}\n",
                "Valid".green(),
                spec.label.cyan(),
                spec.skill_name(),
                spec.states.len(),
                spec.intermediate_states().len(),
                spec.alphabet_in.len(),
                spec.transition_func.len(),
                spec.default_start_state.as_str().yellow()
            ))
        }
    }
}

/// Reads and parses a spec file.
pub fn load_spec(
    path: &Path,
    in_type: InputFormat,
    options: &ParseOptions,
) -> Result<FsmSpec, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    let spec = parse_spec(&text, in_type, options)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    tracing::debug!(
        "loaded '{}' from {}",
        spec.label,
        path.display()
    );
    Ok(spec)
}

/// Parses spec text in the given input format.
pub fn parse_spec(
    text: &str,
    in_type: InputFormat,
    options: &ParseOptions,
) -> Result<FsmSpec, FsmError> {
    match in_type {
        InputFormat::Mermaid => fsmc_core::parse_mermaid_with(text, options),
        InputFormat::FsmSpec => FsmSpec::from_yaml(text),
        InputFormat::Auto => match Dialect::sniff(text) {
            Ok(dialect) => dialect.parse(text, options),
            Err(_) if looks_like_yaml(text) => FsmSpec::from_yaml(text),
            Err(e) => Err(e),
        },
    }
}

/// True when the first content line opens a YAML mapping.
fn looks_like_yaml(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && *line != "---")
        .and_then(|line| line.split_whitespace().next())
        .is_some_and(|key| key.ends_with(':'))
}

/// Renders a spec in the requested output format.
pub fn render(spec: &FsmSpec, format: OutputFormat) -> Result<String, FsmError> {
    match format {
        OutputFormat::Mermaid => Ok(spec.to_mermaid()),
        OutputFormat::FsmSpec => spec.to_yaml(),
    }
}

/// Checks that a target label carries the required suffix.
pub fn check_label(label: &str, suffix: &str) -> Result<(), String> {
    if label.len() > suffix.len() && label.ends_with(suffix) {
        Ok(())
    } else {
        Err(format!("label '{}' must end with '{}'", label, suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmc_core::State;
    use std::io::Write;

    const FLOWCHART: &str = "graph TD\n  A\n  A -->|go| B\n  B -->|done| A\n";

    fn temp_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_check_label() {
        check_label("HelloWorldAbciApp", "AbciApp").unwrap();
        assert!(check_label("HelloWorld", "AbciApp").is_err());
        assert!(check_label("AbciApp", "AbciApp").is_err());
    }

    #[test]
    fn test_auto_detects_input() {
        let options = ParseOptions::default();
        let from_mermaid = parse_spec(FLOWCHART, InputFormat::Auto, &options).unwrap();
        let yaml = from_mermaid.to_yaml().unwrap();
        let from_yaml = parse_spec(&yaml, InputFormat::Auto, &options).unwrap();
        assert_eq!(from_yaml, from_mermaid);
    }

    #[test]
    fn test_auto_reports_unknown_diagram_keyword() {
        let err = parse_spec("grph TD\n  A -->|go| B\n", InputFormat::Auto, &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, FsmError::UnsupportedKeyword { keyword } if keyword == "grph"));
    }

    #[test]
    fn test_auto_accepts_yaml_with_document_marker() {
        assert!(looks_like_yaml("---\n# spec\nalphabet_in: []\n"));
        assert!(!looks_like_yaml("\n"));
    }

    #[test]
    fn test_explicit_mermaid_rejects_yaml() {
        let err = parse_spec("alphabet_in: []\n", InputFormat::Mermaid, &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, FsmError::UnsupportedKeyword { .. }));
    }

    #[test]
    fn test_convert_command() {
        let file = temp_file(FLOWCHART);
        let cmd = Commands::Convert {
            file: file.path().to_path_buf(),
            label: "PingPongAbciApp".to_string(),
            in_type: InputFormat::Mermaid,
            output: Some(OutputFormat::FsmSpec),
        };
        let out = execute(cmd, &Config::default()).unwrap();
        let spec = FsmSpec::from_yaml(&out).unwrap();
        assert_eq!(spec.label, "PingPongAbciApp");
        assert_eq!(spec.default_start_state, State::from("A"));
    }

    #[test]
    fn test_convert_rejects_bad_label() {
        let file = temp_file(FLOWCHART);
        let cmd = Commands::Convert {
            file: file.path().to_path_buf(),
            label: "PingPong".to_string(),
            in_type: InputFormat::Auto,
            output: None,
        };
        let err = execute(cmd, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("AbciApp"));
    }

    #[test]
    fn test_convert_surfaces_parse_errors() {
        let file = temp_file("graph TD\n  A -->|go| C\n  B -->|go| C\n");
        let cmd = Commands::Convert {
            file: file.path().to_path_buf(),
            label: "BrokenAbciApp".to_string(),
            in_type: InputFormat::Auto,
            output: Some(OutputFormat::Mermaid),
        };
        let err = execute(cmd, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("multiple start states"));
    }

    #[test]
    fn test_chain_command() {
        let first = temp_file("graph TD\n  A -->|x| B\n");
        let second = temp_file("stateDiagram-v2\n  [*] --> C\n  C --> D: Y\n  D --> [*]\n");
        let cmd = Commands::Chain {
            files: vec![first.path().to_path_buf(), second.path().to_path_buf()],
            label: "ChainedAbciApp".to_string(),
            in_type: InputFormat::Auto,
            output: Some(OutputFormat::Mermaid),
        };
        let out = execute(cmd, &Config::default()).unwrap();
        assert!(out.starts_with("graph TD\n  A\n"));
        assert!(out.contains("  B -->|DONE| C\n"));
    }

    #[test]
    fn test_validate_command() {
        let file = temp_file(FLOWCHART);
        let cmd = Commands::Validate {
            file: file.path().to_path_buf(),
            in_type: InputFormat::Auto,
        };
        let out = execute(cmd, &Config::default()).unwrap();
        assert!(out.contains("hello_world_abci"));
        assert!(out.contains("2 states (1 intermediate)"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_spec(
            Path::new("/nonexistent/spec.yaml"),
            InputFormat::Auto,
            &ParseOptions::default(),
        );
        assert!(result.is_err());
    }
}
