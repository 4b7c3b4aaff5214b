use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use surveilcore::processing::radar::DEFAULT_RADAR_ID;

use crate::generator::scenario::GeneratorConfig;

pub const DEFAULT_SUFFIX: &str = "sample";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Directory holding the `<domain>/<stream>/` trees.
    pub output_root: PathBuf,
    pub suffix: String,
    /// Replace `suffix` with the current UTC time at run start.
    pub timestamp_suffix: bool,
    pub radar_id: String,
    #[serde(default = "GeneratorConfig::radar", deserialize_with = "radar_section")]
    pub radar: GeneratorConfig,
    #[serde(default = "GeneratorConfig::adsb", deserialize_with = "adsb_section")]
    pub adsb: GeneratorConfig,
}

/// A generator block as written in YAML; absent keys fall back to the
/// domain's own defaults rather than a shared one.
#[derive(Deserialize)]
struct GeneratorSection {
    enabled: Option<bool>,
    count: Option<usize>,
    seed: Option<u64>,
    start: Option<DateTime<Utc>>,
}

impl GeneratorSection {
    fn over(self, base: GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            count: self.count.unwrap_or(base.count),
            seed: self.seed.unwrap_or(base.seed),
            start: self.start.or(base.start),
        }
    }
}

fn section<'de, D: Deserializer<'de>>(
    deserializer: D,
    base: GeneratorConfig,
) -> Result<GeneratorConfig, D::Error> {
    // an empty block (`adsb:` alone) reads as null
    let section = Option::<GeneratorSection>::deserialize(deserializer)?;
    Ok(match section {
        Some(section) => section.over(base),
        None => base,
    })
}

fn radar_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GeneratorConfig, D::Error> {
    section(deserializer, GeneratorConfig::radar())
}

fn adsb_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GeneratorConfig, D::Error> {
    section(deserializer, GeneratorConfig::adsb())
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            suffix: DEFAULT_SUFFIX.to_string(),
            timestamp_suffix: false,
            radar_id: DEFAULT_RADAR_ID.to_string(),
            radar: GeneratorConfig::radar(),
            adsb: GeneratorConfig::adsb(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(output_root: PathBuf, seed: u64, radar_id: &str) -> Self {
        let mut config = Self {
            output_root,
            radar_id: radar_id.to_string(),
            ..Self::default()
        };
        config.radar.seed = seed;
        config.adsb.seed = seed;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_seeds_both_domains() {
        let cfg = WorkflowConfig::from_args(PathBuf::from("out"), 7, "RADAR-B");
        assert_eq!(cfg.radar.seed, 7);
        assert_eq!(cfg.adsb.seed, 7);
        assert_eq!(cfg.adsb.count, 150);
        assert_eq!(cfg.radar_id, "RADAR-B");
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"output_root: /tmp/demo\nradar:\n  count: 30\n  start: 2025-09-26T02:00:00Z\nadsb:\n  enabled: false\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.output_root, PathBuf::from("/tmp/demo"));
        assert_eq!(cfg.radar.count, 30);
        assert_eq!(cfg.radar.seed, 2025);
        assert!(cfg.radar.start.is_some());
        assert!(!cfg.adsb.enabled);
        assert_eq!(cfg.suffix, "sample");
    }

    #[test]
    fn partial_domain_blocks_keep_their_own_counts() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"radar:\n  seed: 3\nadsb:\n  seed: 7\n").unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.radar.count, 120);
        assert_eq!(cfg.radar.seed, 3);
        assert_eq!(cfg.adsb.count, 150);
        assert_eq!(cfg.adsb.seed, 7);
        assert!(cfg.adsb.enabled);
        assert!(cfg.adsb.start.is_none());
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
