//! # Design Patterns in Rust
//!
//! A learning map of the SOLID principles and the Gang-of-Four patterns,
//! with one pattern worked out as runnable code.
//!
//! ## Learning Map
//! - SOLID principles (SRP, OCP, LSP, ISP, DIP)
//! - Creational, structural and behavioral patterns
//! - See [`catalog`] for the full list and a one-line intent per entry
//!
//! ## Chain of Responsibility
//! - Handler trait with one capability: accept a request or decline it
//! - Nodes that own their successor, so chains cannot loop
//! - First match in link order wins; later nodes are never consulted
//! - An explicit `Unhandled` outcome when the chain is exhausted
//! - Fluent linking, re-linking and truncation
//! - Chains declared in TOML
//!
//! ```
//! use design_patterns::chain::Chain;
//! use design_patterns::handler::{LabelHandler, Outcome};
//!
//! let chain: Chain<str> = Chain::builder()
//!     .link(LabelHandler::exact("NodeA", "Handler1"))
//!     .link(LabelHandler::exact("NodeB", "Handler2"))
//!     .build();
//!
//! assert_eq!(chain.dispatch("Handler2").reply().unwrap().message, "NodeB handled Handler2");
//! assert_eq!(chain.dispatch("Handler3"), Outcome::Unhandled);
//! ```
//!
//! Run the walkthrough with: `cargo run --bin complete_30_chain_dispatcher -- demo`

pub mod catalog;
pub mod chain;
pub mod config;
pub mod error;
pub mod handler;
pub mod report;

pub use chain::{Chain, ChainBuilder};
pub use error::{PatternError, Result};
pub use handler::{FnHandler, Handler, LabelHandler, Matcher, Node, Outcome, Reply};
