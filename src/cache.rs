//! Incremental compilation cache
//!
//! Keyed by a sha256 of the raw template source; a hit returns the compiled
//! output and stylesheet without re-running the pipeline. Corrupt entries
//! are removed and treated as misses.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub output: String,
    pub styles: String,
}

pub struct IncrementalCache {
    cache_dir: PathBuf,
}

impl IncrementalCache {
    pub fn new() -> Self {
        Self::at(PathBuf::from(".weft/cache"))
    }

    pub fn at(cache_dir: PathBuf) -> Self {
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).ok();
        }
        Self { cache_dir }
    }

    pub fn compute_hash(source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn cache_path(&self, file_path: &str) -> PathBuf {
        let safe_name = file_path
            .replace('/', "_")
            .replace('\\', "_")
            .replace(':', "_");
        self.cache_dir.join(format!("{}.json", safe_name))
    }

    pub fn get(&self, file_path: &str, source: &str) -> Option<CacheEntry> {
        let cache_path = self.cache_path(file_path);
        if !cache_path.exists() {
            return None;
        }

        let data = fs::read_to_string(&cache_path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("cache entry for {} is corrupt ({}); removed", file_path, e);
                fs::remove_file(cache_path).ok();
                return None;
            }
        };

        if entry.hash == Self::compute_hash(source) {
            Some(entry)
        } else {
            None
        }
    }

    pub fn set(&self, file_path: &str, source: &str, output: &str, styles: &str) {
        let entry = CacheEntry {
            hash: Self::compute_hash(source),
            output: output.to_string(),
            styles: styles.to_string(),
        };
        if let Ok(data) = serde_json::to_string(&entry) {
            fs::write(self.cache_path(file_path), data).ok();
        }
    }
}

impl Default for IncrementalCache {
    fn default() -> Self {
        Self::new()
    }
}
