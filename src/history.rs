use std::path::{Path, PathBuf};

use color_eyre::eyre;
use tokio::fs;

const MAX_HISTORY_SIZE: usize = 100;

/// Recently parsed query strings, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryHistory {
    pub queries: Vec<String>,
}

impl QueryHistory {
    pub fn new(queries: Vec<String>) -> Self {
        Self { queries }
    }

    pub fn add_query(&mut self, query: String) {
        // Remove existing occurrence if present
        self.queries.retain(|q| q != &query);

        self.queries.insert(0, query);

        if self.queries.len() > MAX_HISTORY_SIZE {
            self.queries.truncate(MAX_HISTORY_SIZE);
        }
    }

    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &str> {
        self.queries.iter().take(limit).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.queries.clear();
    }
}

pub fn default_history_path() -> eyre::Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| eyre::eyre!("Could not find config directory"))?;

    Ok(config_dir.join("sqp").join("history.json"))
}

pub async fn load_history(path: &Path) -> eyre::Result<QueryHistory> {
    if !path.exists() {
        return Ok(QueryHistory::default());
    }

    let contents = fs::read_to_string(path).await?;
    let queries: Vec<String> = serde_json::from_str(&contents)?;

    Ok(QueryHistory::new(queries))
}

pub async fn save_history(path: &Path, history: &QueryHistory) -> eyre::Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let contents = serde_json::to_string_pretty(&history.queries)?;
    fs::write(path, contents).await?;

    tracing::debug!(path = %path.display(), len = history.queries.len(), "saved history");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_adding_moves_to_front() {
        let mut history = QueryHistory::default();
        history.add_query("a".into());
        history.add_query("b".into());
        history.add_query("a".into());

        assert_eq!(history.queries, vec!["a", "b"]);
    }

    #[test]
    fn size_is_bounded() {
        let mut history = QueryHistory::default();
        for i in 0..MAX_HISTORY_SIZE + 10 {
            history.add_query(i.to_string());
        }

        assert_eq!(history.queries.len(), MAX_HISTORY_SIZE);
        assert_eq!(history.queries[0], (MAX_HISTORY_SIZE + 9).to_string());
    }

    #[test]
    fn recent_respects_limit() {
        let history = QueryHistory::new(vec!["c".into(), "b".into(), "a".into()]);

        assert_eq!(history.recent(2).collect::<Vec<_>>(), vec!["c", "b"]);
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();

        let history = load_history(&dir.path().join("history.json")).await.unwrap();

        assert_eq!(history, QueryHistory::default());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let history = QueryHistory::new(vec!["tag:a foo".into(), "bar".into()]);
        save_history(&path, &history).await.unwrap();

        assert_eq!(load_history(&path).await.unwrap(), history);
    }
}
