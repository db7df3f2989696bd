use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{self, WrapErr};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Field names recognized by [`crate::parse`].
///
/// Membership is exact and case-sensitive. A name present in both sets is
/// treated as a keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub keywords: BTreeSet<String>,
    pub ranges: BTreeSet<String>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn with_ranges<I, S>(mut self, ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ranges.extend(ranges.into_iter().map(Into::into));
        self
    }

    pub fn is_keyword(&self, key: &str) -> bool {
        self.keywords.contains(key)
    }

    pub fn is_range(&self, key: &str) -> bool {
        self.ranges.contains(key)
    }

    /// Adds every name from `other` to this configuration.
    pub fn merge(mut self, other: ParseOptions) -> Self {
        self.keywords.extend(other.keywords);
        self.ranges.extend(other.ranges);
        self
    }

    /// Reads options from a JSON file such as `{"keywords": ["tag"], "ranges": ["date"]}`.
    pub async fn load(path: &Path) -> eyre::Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Could not read config file {}", path.display()))?;

        let options = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;

        tracing::debug!(path = %path.display(), ?options, "loaded parse options");

        Ok(options)
    }

    /// Loads the user's default config file, if there is one.
    pub async fn load_default() -> eyre::Result<Self> {
        let path = default_config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load(&path).await
    }
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| eyre::eyre!("Could not find config directory"))?;

    Ok(config_dir.join("sqp").join("config.json"))
}
