use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::{Domain, Stream};
use crate::telemetry::log::LogManager;

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["csv", "json"];

/// Which lookup tier produced the file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryTier {
    /// Files named `<domain>_<stream>_*`.
    Named,
    /// No named file existed; any supported file was taken.
    Fallback,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub tier: DiscoveryTier,
    /// Sorted, without duplicates.
    pub files: Vec<PathBuf>,
}

impl Discovery {
    fn empty() -> Self {
        Self {
            tier: DiscoveryTier::Empty,
            files: Vec::new(),
        }
    }
}

pub fn file_prefix(domain: Domain, stream: Stream) -> String {
    format!("{}_{}_", domain, stream)
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Two-tier selection over candidate paths; does not touch the file system.
pub fn select_files<I>(candidates: I, domain: Domain, stream: Stream) -> Discovery
where
    I: IntoIterator<Item = PathBuf>,
{
    let supported: BTreeSet<PathBuf> = candidates
        .into_iter()
        .filter(|path| is_supported(path))
        .collect();

    let prefix = file_prefix(domain, stream);
    let named: Vec<PathBuf> = supported
        .iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix))
        })
        .cloned()
        .collect();

    if !named.is_empty() {
        Discovery {
            tier: DiscoveryTier::Named,
            files: named,
        }
    } else if !supported.is_empty() {
        Discovery {
            tier: DiscoveryTier::Fallback,
            files: supported.into_iter().collect(),
        }
    } else {
        Discovery::empty()
    }
}

/// Lists regular files in `dir` and applies [`select_files`].
///
/// A missing or unreadable directory yields an empty discovery.
pub fn discover(dir: &Path, domain: Domain, stream: Stream) -> Discovery {
    let logger = LogManager::new("discovery");
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            logger.detail(&format!("cannot list {}: {}", dir.display(), err));
            return Discovery::empty();
        }
    };

    let candidates = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file());

    let discovery = select_files(candidates, domain, stream);
    logger.detail(&format!(
        "{} -> {:?} ({} files)",
        dir.display(),
        discovery.tier,
        discovery.files.len()
    ));
    discovery
}
