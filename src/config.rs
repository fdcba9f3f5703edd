//! Chain definitions loaded from TOML.
//!
//! ```toml
//! name = "support-desk"
//!
//! [[handlers]]
//! name = "NodeA"
//! rule = { exact = "Handler1" }
//!
//! [[handlers]]
//! name = "Fallback"
//! rule = "any"
//! ```

use crate::chain::Chain;
use crate::error::{PatternError, Result};
use crate::handler::{LabelHandler, Matcher};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Exact(String),
    Prefix(String),
    Pattern(String),
    Any,
}

impl Rule {
    fn kind(&self) -> &'static str {
        match self {
            Rule::Exact(_) => "exact",
            Rule::Prefix(_) => "prefix",
            Rule::Pattern(_) => "pattern",
            Rule::Any => "any",
        }
    }

    fn to_matcher(&self, handler: &str) -> Result<Matcher> {
        match self {
            Rule::Exact(label) | Rule::Prefix(label) if label.trim().is_empty() => {
                Err(PatternError::blank_label(handler, self.kind()))
            }
            Rule::Exact(label) => Ok(Matcher::exact(label.as_str())),
            Rule::Prefix(prefix) => Ok(Matcher::prefix(prefix.as_str())),
            Rule::Pattern(pattern) => {
                Matcher::pattern(pattern).map_err(|source| PatternError::InvalidPattern {
                    handler: handler.to_string(),
                    source,
                })
            }
            Rule::Any => Ok(Matcher::Any),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HandlerConfig {
    pub name: String,
    pub rule: Rule,
}

impl HandlerConfig {
    pub fn new(name: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_name")]
    pub name: String,
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

fn default_chain_name() -> String {
    "chain".to_string()
}

impl ChainConfig {
    /// The two-node chain used throughout the demo: `NodeA` accepts
    /// `Handler1`, `NodeB` accepts `Handler2`.
    pub fn support_desk() -> Self {
        Self {
            name: "support-desk".to_string(),
            handlers: vec![
                HandlerConfig::new("NodeA", Rule::Exact("Handler1".to_string())),
                HandlerConfig::new("NodeB", Rule::Exact("Handler2".to_string())),
            ],
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| PatternError::io(path, err))?;
        Self::from_toml_str(&content)
    }

    /// Checks the definition without building it. Stops at the first problem.
    pub fn validate(&self) -> Result<()> {
        self.matchers().map(|_| ())
    }

    pub fn build(&self) -> Result<Chain<str>> {
        let chain = self
            .handlers
            .iter()
            .zip(self.matchers()?)
            .fold(Chain::<str>::builder(), |builder, (handler, matcher)| {
                builder.link(LabelHandler::new(handler.name.as_str(), matcher))
            })
            .build();

        info!(chain = %self.name, links = %chain, "built chain from configuration");
        Ok(chain)
    }

    // Validates every entry and compiles its matcher, in declaration order.
    fn matchers(&self) -> Result<Vec<Matcher>> {
        if self.handlers.is_empty() {
            return Err(PatternError::EmptyChain);
        }

        let mut seen = HashSet::new();
        let mut matchers = Vec::with_capacity(self.handlers.len());
        for (index, handler) in self.handlers.iter().enumerate() {
            if handler.name.trim().is_empty() {
                return Err(PatternError::BlankName {
                    position: index + 1,
                });
            }
            if !seen.insert(handler.name.as_str()) {
                return Err(PatternError::DuplicateHandler(handler.name.clone()));
            }
            matchers.push(handler.rule.to_matcher(&handler.name)?);
        }
        Ok(matchers)
    }
}
