//! Binary artifact cache.
//!
//! Given a source extract path `P`, cache entries live under
//! `.cache/<stem(P)>-map.dmp` (buildings) and `.cache/<stem(P)>-gph.dmp`
//! (adjacency list). The format is opaque and version-unstamped: any load
//! failure — missing file, decode error, or a content fingerprint
//! mismatch — is treated as a cache miss, never a hard error.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use graphs_common::{Error, Result};
use graphs_routing::{Buildings, Graph, Map};

const CACHE_DIR: &str = ".cache";

fn stem(source: &Path) -> String {
    source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("extract")
        .to_string()
}

pub fn map_path(source: &Path) -> PathBuf {
    Path::new(CACHE_DIR).join(format!("{}-map.dmp", stem(source)))
}

pub fn graph_path(source: &Path) -> PathBuf {
    Path::new(CACHE_DIR).join(format!("{}-gph.dmp", stem(source)))
}

fn fingerprint_path(source: &Path) -> PathBuf {
    Path::new(CACHE_DIR).join(format!("{}.sha256", stem(source)))
}

fn fingerprint(source: &Path) -> Result<String> {
    let mut file = fs::File::open(source).map_err(|_| Error::InputNotFound(source.to_path_buf()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Deletes `.cache` wholesale and recreates it empty. Used by `--recache`.
pub fn recache() -> Result<()> {
    let dir = Path::new(CACHE_DIR);
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Attempts to load a cached Map for `source`. Returns `Ok(None)` on any
/// cache miss (missing files, decode failure, fingerprint mismatch).
/// Returns `Err` only if `source` itself cannot be read, since that means
/// the caller can't even validate the cache.
pub fn load(source: &Path) -> Result<Option<Map>> {
    let current_fingerprint = fingerprint(source)?;

    let stored_fingerprint = match fs::read_to_string(fingerprint_path(source)) {
        Ok(s) => s,
        Err(_) => return Ok(None),
    };
    if stored_fingerprint.trim() != current_fingerprint {
        tracing::debug!(?source, "cache fingerprint mismatch, treating as miss");
        return Ok(None);
    }

    let buildings = match decode::<Buildings>(&map_path(source)) {
        Some(b) => b,
        None => return Ok(None),
    };
    let graph = match decode::<Graph>(&graph_path(source)) {
        Some(g) => g,
        None => return Ok(None),
    };

    tracing::info!(?source, "cache hit");
    Ok(Some(Map::new(buildings, graph)))
}

fn decode<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = fs::read(path).ok()?;
    bincode::deserialize(&bytes).ok()
}

/// Writes `map` to the cache, creating `.cache` if absent.
pub fn store(source: &Path, map: &Map) -> Result<()> {
    fs::create_dir_all(CACHE_DIR)?;

    let buildings_bytes =
        bincode::serialize(map.buildings()).expect("bincode serialization of Buildings never fails");
    let graph_bytes =
        bincode::serialize(map.graph()).expect("bincode serialization of Graph never fails");

    fs::write(map_path(source), buildings_bytes)?;
    fs::write(graph_path(source), graph_bytes)?;
    fs::write(fingerprint_path(source), fingerprint(source)?)?;

    tracing::info!(?source, "cache written");
    Ok(())
}
