//! # fsmc-core
//!
//! Compiler core for finite state machine specifications.
//!
//! This crate provides:
//! - The [`FsmSpec`] data model with an insertion-ordered transition table
//! - Parsers for the Mermaid flowchart and state diagram dialects
//! - A flowchart renderer and a YAML codec
//! - Sequential chaining of several specs into one
//!
//! Everything here is pure and synchronous; callers own all I/O.

pub mod chain;
pub mod codec;
pub mod dialect;
pub mod error;
pub mod flowchart;
pub mod infer;
pub mod naming;
pub mod render;
pub mod spec;
pub mod state_diagram;

pub use chain::Chainer;
pub use dialect::{parse_mermaid, parse_mermaid_with, Dialect};
pub use error::{ErrorKind, FsmError};
pub use infer::{ParseOptions, StartFallback};
pub use spec::{FsmSpec, State, TransitionKey, TransitionTable, PLACEHOLDER_LABEL};
