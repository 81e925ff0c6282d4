use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::model::Tradeup;

#[derive(Debug, thiserror::Error)]
pub enum ShardError {
    #[error("failed to read shard {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse shard {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("shard fetch worker exited without a result")]
    WorkerGone,
}

/// Hands out shard files one at a time. The cursor advances on every
/// request, so a shard that fails to load is skipped, never retried.
pub struct ShardLoader {
    shards: Vec<PathBuf>,
    cursor: usize,
}

impl ShardLoader {
    pub fn new(shards: Vec<PathBuf>) -> Self {
        Self { shards, cursor: 0 }
    }

    /// Builds a shard list from every `.json` file in `dir`, sorted by
    /// filename. An unreadable directory yields an empty list.
    pub fn discover(dir: &Path) -> Self {
        let mut shards = vec![];
        match fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "json") {
                        shards.push(path);
                    }
                }
                shards.sort();
                info!(dir = %dir.display(), count = shards.len(), "discovered shards");
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot read shard directory");
            }
        }
        Self::new(shards)
    }

    /// Next shard to fetch, or `None` when every shard has been requested.
    pub fn next_shard(&mut self) -> Option<PathBuf> {
        let shard = self.shards.get(self.cursor).cloned();
        if shard.is_some() {
            self.cursor += 1;
        }
        shard
    }

    pub fn remaining(&self) -> usize {
        self.shards.len() - self.cursor
    }
}

/// Reads and parses one shard. Failures are reported to the caller and
/// logged there; they contribute zero records and never abort later loads.
pub fn fetch_shard(path: &Path) -> Result<Vec<Tradeup>, ShardError> {
    let raw = fs::read_to_string(path).map_err(|source| ShardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Tradeup> =
        serde_json::from_str(&raw).map_err(|source| ShardError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(shard = %path.display(), count = records.len(), "loaded shard");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_shard(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn fetch_shard_parses_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_shard(
            dir.path(),
            "tradeups_0.json",
            r#"[{"tradeup_cost": 3.0, "input_skins": [], "output_skins": []}]"#,
        );
        let records = fetch_shard(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tradeup_cost, Some(3.0));
    }

    #[test]
    fn fetch_shard_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_shard(dir.path(), "bad.json", "{not json");
        assert!(matches!(fetch_shard(&path), Err(ShardError::Parse { .. })));
    }

    #[test]
    fn fetch_shard_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(fetch_shard(&path), Err(ShardError::Io { .. })));
    }

    #[test]
    fn cursor_advances_past_each_shard_once() {
        let mut loader = ShardLoader::new(vec![
            PathBuf::from("a.json"),
            PathBuf::from("b.json"),
        ]);
        assert_eq!(loader.remaining(), 2);
        assert_eq!(loader.next_shard(), Some(PathBuf::from("a.json")));
        assert_eq!(loader.next_shard(), Some(PathBuf::from("b.json")));
        assert_eq!(loader.next_shard(), None);
        assert_eq!(loader.next_shard(), None);
        assert_eq!(loader.remaining(), 0);
    }

    #[test]
    fn discover_lists_json_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_shard(dir.path(), "tradeups_1.json", "[]");
        write_shard(dir.path(), "tradeups_0.json", "[]");
        write_shard(dir.path(), "notes.txt", "ignore me");
        let mut loader = ShardLoader::discover(dir.path());
        assert_eq!(loader.remaining(), 2);
        let first = loader.next_shard().unwrap();
        assert!(first.ends_with("tradeups_0.json"));
    }

    #[test]
    fn discover_handles_missing_directory() {
        let loader = ShardLoader::discover(Path::new("/definitely/not/here"));
        assert_eq!(loader.remaining(), 0);
    }
}
