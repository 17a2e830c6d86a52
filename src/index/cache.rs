use anyhow::Result;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use super::FileParse;

const DEFAULT_MAX_MEMORY_ENTRIES: usize = 1000;

/// A cached per-file parse, validated by modification time and size.
///
/// Parses are cached before cross-file name resolution, since resolution
/// depends on the whole index and may change when sibling files change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFileEntry {
    pub parse: FileParse,
    pub timestamp: u64,
    pub file_size: u64,
}

/// Thread-safe cache with a memory tier and a best-effort disk tier.
pub struct ParseCache {
    memory_cache: DashMap<PathBuf, ParsedFileEntry>,
    cache_dir: Option<PathBuf>,
    max_memory_entries: usize,
}

impl ParseCache {
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let resolved_dir = cache_dir.unwrap_or_else(|| std::env::temp_dir().join("archmap_cache"));
        let cache_dir = match fs::create_dir_all(&resolved_dir) {
            Ok(()) => Some(resolved_dir),
            Err(err) => {
                eprintln!(
                    "Warning: Failed to initialize disk cache at {}: {err}",
                    resolved_dir.display()
                );
                None
            }
        };

        Ok(Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        })
    }

    /// Build an in-memory-only cache without touching the filesystem.
    pub fn in_memory_only() -> Self {
        Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir: None,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }

    /// Check if the file changed since it was cached.
    pub fn needs_update(&self, file_path: &Path) -> Result<bool> {
        let metadata = fs::metadata(file_path)?;
        let current_timestamp = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let current_size = metadata.len();

        if let Some(entry) = self.memory_cache.get(file_path) {
            return Ok(entry.timestamp != current_timestamp || entry.file_size != current_size);
        }

        if let Some(cache_path) = self.cache_path(file_path) {
            if cache_path.exists() {
                if let Ok(entry) = self.load_from_disk(&cache_path) {
                    return Ok(
                        entry.timestamp != current_timestamp || entry.file_size != current_size
                    );
                }
            }
        }

        Ok(true)
    }

    /// Get the cached parse if one exists.
    pub fn get(&self, file_path: &Path) -> Option<FileParse> {
        if let Some(entry) = self.memory_cache.get(file_path) {
            return Some(entry.parse.clone());
        }

        if let Some(cache_path) = self.cache_path(file_path) {
            if let Ok(entry) = self.load_from_disk(&cache_path) {
                let parse = entry.parse.clone();

                if self.memory_cache.len() < self.max_memory_entries {
                    self.memory_cache.insert(file_path.to_path_buf(), entry);
                }

                return Some(parse);
            }
        }

        None
    }

    /// Store a parse in both tiers.
    pub fn store(&self, file_path: &Path, parse: &FileParse) -> Result<()> {
        let metadata = fs::metadata(file_path)?;
        let timestamp = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let file_size = metadata.len();

        let entry = ParsedFileEntry {
            parse: parse.clone(),
            timestamp,
            file_size,
        };

        if self.memory_cache.len() >= self.max_memory_entries {
            if let Some(entry) = self.memory_cache.iter().next() {
                let key = entry.key().clone();
                drop(entry);
                self.memory_cache.remove(&key);
            }
        }
        self.memory_cache
            .insert(file_path.to_path_buf(), entry.clone());

        if let Some(cache_path) = self.cache_path(file_path) {
            self.store_to_disk(&cache_path, &entry)?;
        }

        Ok(())
    }

    /// Clear both tiers.
    #[allow(dead_code)]
    pub fn clear(&self) -> Result<()> {
        self.memory_cache.clear();
        if let Some(cache_dir) = &self.cache_dir {
            if cache_dir.exists() {
                fs::remove_dir_all(cache_dir)?;
                fs::create_dir_all(cache_dir)?;
            }
        }
        Ok(())
    }

    fn cache_path(&self, file_path: &Path) -> Option<PathBuf> {
        let cache_dir = self.cache_dir.as_ref()?;

        let mut hasher = DefaultHasher::new();
        file_path.hash(&mut hasher);
        let hash = hasher.finish();

        Some(cache_dir.join(format!("cache_{:x}.bincode", hash)))
    }

    fn load_from_disk(&self, cache_path: &Path) -> Result<ParsedFileEntry> {
        let data = fs::read(cache_path)?;
        let entry: ParsedFileEntry = bincode::deserialize(&data)?;
        Ok(entry)
    }

    fn store_to_disk(&self, cache_path: &Path, entry: &ParsedFileEntry) -> Result<()> {
        let data = bincode::serialize(entry)?;
        fs::write(cache_path, data)?;
        Ok(())
    }
}
