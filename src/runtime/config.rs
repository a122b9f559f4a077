//! Runtime configuration

use serde::{Deserialize, Serialize};

use crate::renderer::{FullRebuild, RenderStrategy};
use crate::Error;

/// Default nesting limit for a render pass
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Which [`RenderStrategy`] a runtime commits passes with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Destroy and rebuild the whole mounted subtree
    #[default]
    FullRebuild,
}

impl StrategyKind {
    pub(crate) fn build(self) -> Box<dyn RenderStrategy> {
        match self {
            Self::FullRebuild => Box::new(FullRebuild),
        }
    }
}

/// Tunables for a [`Runtime`](crate::runtime::Runtime)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum element/component nesting before a pass is aborted
    pub max_depth: usize,
    /// Commit strategy
    pub strategy: StrategyKind,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strategy: StrategyKind::default(),
        }
    }
}

impl RuntimeConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the commit strategy
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}
