use std::{fs, path::Path};

use anyhow::{Context, Result};
use lane_defence_system_chessboard::ChessboardConfig;
use lane_defence_world::MatchConfig;
use serde::Deserialize;

/// Settings loaded from the optional TOML configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Match geometry, balances and pricing.
    #[serde(rename = "match")]
    pub(crate) match_config: MatchConfig,
    /// Tuning of the checkerboard strategy.
    pub(crate) chessboard: ChessboardConfig,
}

impl Settings {
    /// Reads settings from the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load settings from {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }
}
