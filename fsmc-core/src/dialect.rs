//! Mermaid dialect detection and dispatch.

use crate::error::FsmError;
use crate::infer::ParseOptions;
use crate::spec::FsmSpec;
use crate::{flowchart, state_diagram};
use std::fmt;
use std::str::FromStr;

/// The Mermaid notations the compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `graph TD` with `-->|LABEL|` edges.
    Flowchart,
    /// `stateDiagram-v2` with `--> TARGET: Label` edges and `[*]` pseudostates.
    StateDiagram,
}

impl Dialect {
    /// Detects the dialect from the first significant line.
    pub fn sniff(text: &str) -> Result<Self, FsmError> {
        let first = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("%%"))
            .ok_or_else(|| FsmError::format(1, "empty diagram"))?;

        let keyword = first.split_whitespace().next().unwrap_or_default();
        match keyword {
            "graph" | "flowchart" => Ok(Dialect::Flowchart),
            "stateDiagram" | "stateDiagram-v2" => Ok(Dialect::StateDiagram),
            other => Err(FsmError::UnsupportedKeyword {
                keyword: other.to_string(),
            }),
        }
    }

    /// Parses text written in this dialect.
    pub fn parse(self, text: &str, options: &ParseOptions) -> Result<FsmSpec, FsmError> {
        match self {
            Dialect::Flowchart => flowchart::parse_with(text, options),
            Dialect::StateDiagram => state_diagram::parse_with(text, options),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Flowchart => "flowchart",
            Dialect::StateDiagram => "state-diagram",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = FsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flowchart" | "graph" => Ok(Dialect::Flowchart),
            "state-diagram" | "statediagram" | "statediagram-v2" => Ok(Dialect::StateDiagram),
            _ => Err(FsmError::UnsupportedKeyword {
                keyword: s.to_string(),
            }),
        }
    }
}

/// Detects the dialect of a Mermaid diagram and parses it with default options.
pub fn parse_mermaid(text: &str) -> Result<FsmSpec, FsmError> {
    parse_mermaid_with(text, &ParseOptions::default())
}

/// Detects the dialect of a Mermaid diagram and parses it.
pub fn parse_mermaid_with(text: &str, options: &ParseOptions) -> Result<FsmSpec, FsmError> {
    let dialect = Dialect::sniff(text)?;
    tracing::debug!("detected {} dialect", dialect);
    dialect.parse(text, options)
}
