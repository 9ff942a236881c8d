//! Filesystem infrastructure: artifact hashing for uploads.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::domain::target::hex_encode;

/// Content summary of an app artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDigest {
    /// SHA256 over every file's relative path and content.
    pub sha256: String,
    /// Total bytes across all files.
    pub size: u64,
    /// Number of files included.
    pub files: usize,
}

/// Hash an artifact: a single file, or every file under a directory.
///
/// Directories are walked depth-first with siblings sorted by name, so the
/// digest does not depend on filesystem iteration order.
///
/// # Errors
///
/// Returns an error if the path does not exist or any file cannot be read.
pub fn artifact_digest(path: &Path) -> Result<ArtifactDigest> {
    let meta =
        std::fs::metadata(path).with_context(|| format!("reading {}", path.display()))?;

    let mut hasher = Sha256::new();
    if meta.is_file() {
        let size = hash_file(path, &mut hasher)?;
        return Ok(ArtifactDigest {
            sha256: hex_encode(&hasher.finalize()),
            size,
            files: 1,
        });
    }

    let mut size = 0;
    let mut files = 0;
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", path.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(path).unwrap_or(entry.path());
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        size += hash_file(entry.path(), &mut hasher)?;
        files += 1;
    }

    Ok(ArtifactDigest {
        sha256: hex_encode(&hasher.finalize()),
        size,
        files,
    })
}

/// Feed a file into `hasher` in 64 KB chunks, returning its size.
fn hash_file(path: &Path, hasher: &mut Sha256) -> Result<u64> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = vec![0u8; 65536];
    let mut total = 0u64;
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }
    Ok(total)
}
