//! Certificate artifact cache
//!
//! Artifacts live in one directory, named
//! `certificado_<sanitized-number>_<YYYYMMDDHHMMSS>.pdf`. Existence is
//! discovered by scanning the directory; when several artifacts match a
//! certificate number, the newest by modification time wins. Nothing is
//! cleaned up automatically at generation time.

use crate::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const ARTIFACT_PREFIX: &str = "certificado_";
const ARTIFACT_EXT: &str = ".pdf";

/// Locates and names certificate artifacts in a storage directory
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
}

impl ArtifactCache {
    /// Open the cache, creating the artifact directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Make a certificate number filename-safe: every character outside
    /// [A-Za-z0-9] becomes an underscore
    pub fn sanitize(number: &str) -> String {
        number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// Artifact filename for a certificate number at a generation
    /// instant
    pub fn filename_for(number: &str, at: DateTime<Local>) -> String {
        format!(
            "{ARTIFACT_PREFIX}{}_{}{ARTIFACT_EXT}",
            Self::sanitize(number),
            at.format("%Y%m%d%H%M%S")
        )
    }

    /// Full artifact path for a certificate number at a generation
    /// instant
    pub fn path_for(&self, number: &str, at: DateTime<Local>) -> PathBuf {
        self.dir.join(Self::filename_for(number, at))
    }

    /// Every artifact on disk for a certificate number, sorted by name
    pub fn artifacts_for(&self, number: &str) -> Result<Vec<PathBuf>> {
        let prefix = format!("{ARTIFACT_PREFIX}{}_", Self::sanitize(number));
        self.scan(|name| name.starts_with(&prefix))
    }

    fn scan<F: Fn(&str) -> bool>(&self, matches: F) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(ARTIFACT_EXT) && matches(name) {
                paths.push(entry.path());
            }
        }

        paths.sort();
        Ok(paths)
    }

    /// The newest existing artifact for a certificate number, by
    /// modification time, or None
    pub fn locate(&self, number: &str) -> Result<Option<PathBuf>> {
        let mut best: Option<(SystemTime, PathBuf)> = None;

        for path in self.artifacts_for(number)? {
            let modified = fs::metadata(&path)?.modified()?;
            let newer = match &best {
                Some((current, _)) => modified > *current,
                None => true,
            };
            if newer {
                best = Some((modified, path));
            }
        }

        Ok(best.map(|(_, path)| path))
    }

    /// Delete every artifact for a certificate number; returns how many
    /// were removed
    pub fn remove_all(&self, number: &str) -> Result<usize> {
        let paths = self.artifacts_for(number)?;
        let mut removed = 0;
        for path in paths {
            fs::remove_file(&path)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Retention sweep: delete artifacts older than `max_age`; returns
    /// how many were removed
    pub fn clean_older_than(&self, max_age: Duration) -> Result<usize> {
        let threshold = SystemTime::now()
            .checked_sub(max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut removed = 0;
        for path in self.scan(|name| name.starts_with(ARTIFACT_PREFIX))? {
            let modified = fs::metadata(&path)?.modified()?;
            if modified < threshold {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
