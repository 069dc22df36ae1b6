//! Enforcer configuration loaded from a TOML file.
//!
//! Every key has a default, so a missing file or a partial file is valid. On
//! first open the defaults are written out so operators have something to edit.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | verbose-logging | false | Log every break attempt, bypass check and raw reward observation at info. |
//! | restrictions.diamond-level | 35 | Mining level needed for diamond ore. |
//! | restrictions.debris-level | 50 | Mining level needed for ancient debris. |
//! | restrictions.spawner-level | 100 | Mining level needed for spawners (plus silk touch). |
//! | messages.prefix | `<gold><bold>« <yellow><bold>Kudos <gold><bold>» ` | Prepended to every denial message. |
//! | messages.not-ready | `<red>Please wait, McMMO data is still loading!` | Sent when skill data is not ready yet. |
//! | messages.diamond-restricted | `... <diamond-level> ...` | Diamond denial; `<diamond-level>` is replaced by the threshold. |
//! | messages.debris-restricted | `... <debris-level> ...` | Ancient debris denial; `<debris-level>` is replaced. |
//! | messages.spawner-restricted | `... <spawner-level> ...` | Spawner denial; `<spawner-level>` is replaced. |
//! | readiness.reference-skill | "mining" | Skill queried to decide readiness. |
//! | readiness.poll-interval-ticks | 4 | Ticks between provider polls after join. |
//! | readiness.max-attempts | 100 | Polls before giving up on an actor. |
//! | readiness.warn-every | 5 | Failed polls between not-ready warnings. |
//! | suppression.window-ms | 5000 | Reward suppression window after a denial. |
//! | suppression.tracked-skill | "mining" | Skill whose progression gains are suppressed. |
//! | cleanup.radius | 2.0 | Half-size of the box scanned for residue drops. |
//! | cleanup.delay-ticks | 1 | Ticks between a denial and the residue sweep. |

use crate::error::{KudosError, KudosResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Permission that skips every restriction rule (but not the readiness gate).
pub const BYPASS_PERMISSION: &str = "kudoscap.bypass";

/// Permission required by the reload command.
pub const RELOAD_PERMISSION: &str = "kudoscap.reload";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KudosConfig {
    pub verbose_logging: bool,
    pub restrictions: RestrictionsConfig,
    pub messages: MessagesConfig,
    pub readiness: ReadinessConfig,
    pub suppression: SuppressionConfig,
    pub cleanup: CleanupConfig,
}

/// Level thresholds per restricted resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RestrictionsConfig {
    pub diamond_level: u32,
    pub debris_level: u32,
    pub spawner_level: u32,
}

impl Default for RestrictionsConfig {
    fn default() -> Self {
        Self {
            diamond_level: 35,
            debris_level: 50,
            spawner_level: 100,
        }
    }
}

/// Message prefix and per-denial templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MessagesConfig {
    pub prefix: String,
    pub not_ready: String,
    /// Placeholder: `<diamond-level>`.
    pub diamond_restricted: String,
    /// Placeholder: `<debris-level>`.
    pub debris_restricted: String,
    /// Placeholder: `<spawner-level>`.
    pub spawner_restricted: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            prefix: "<gold><bold>« <yellow><bold>Kudos <gold><bold>» ".to_string(),
            not_ready: "<red>Please wait, McMMO data is still loading!".to_string(),
            diamond_restricted: "<red>You need Mining level <diamond-level> to mine diamonds!"
                .to_string(),
            debris_restricted: "<red>You need Mining level <debris-level> to mine ancient debris!"
                .to_string(),
            spawner_restricted:
                "<red>You need Mining level <spawner-level> and Silk Touch to mine spawners!"
                    .to_string(),
        }
    }
}

/// Readiness polling schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReadinessConfig {
    /// Skill queried to decide whether the provider has loaded the actor.
    pub reference_skill: String,
    pub poll_interval_ticks: u64,
    pub max_attempts: u32,
    /// Emit a not-ready warning every this many failed attempts.
    pub warn_every: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            reference_skill: "mining".to_string(),
            poll_interval_ticks: 4,
            max_attempts: 100,
            warn_every: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SuppressionConfig {
    pub window_ms: i64,
    /// Secondary-channel gains are only suppressed for this skill.
    pub tracked_skill: String,
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            window_ms: 5000,
            tracked_skill: "mining".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CleanupConfig {
    pub radius: f64,
    pub delay_ticks: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            delay_ticks: 1,
        }
    }
}

impl KudosConfig {
    /// Load from a TOML file. Keys missing from the file keep their defaults.
    pub fn load_from_path(path: &Path) -> KudosResult<Self> {
        let built = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .build()?;
        Ok(built.try_deserialize()?)
    }

    /// Write this configuration as TOML, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> KudosResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| KudosError::ConfigWrite(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

/// Holds the active configuration snapshot and re-reads it on demand.
///
/// Readers take an `Arc` snapshot, so a reload never changes values under an
/// evaluation that is already running.
#[derive(Debug)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<KudosConfig>>,
}

impl ConfigStore {
    /// Open the file at `path`, writing defaults first if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> KudosResult<Self> {
        let path = path.into();
        if !path.exists() {
            KudosConfig::default().save_to_path(&path)?;
            tracing::info!(path = %path.display(), "wrote default configuration");
        }
        let config = KudosConfig::load_from_path(&path)?;
        Ok(Self {
            path: Some(path),
            current: RwLock::new(Arc::new(config)),
        })
    }

    /// Store with no backing file; `reload` keeps the given values.
    pub fn in_memory(config: KudosConfig) -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(config)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> Arc<KudosConfig> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Re-read the backing file. On failure the previous snapshot stays active.
    pub fn reload(&self) -> KudosResult<Arc<KudosConfig>> {
        let Some(path) = self.path.as_deref() else {
            return Ok(self.snapshot());
        };
        let fresh = Arc::new(KudosConfig::load_from_path(path)?);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&fresh);
        Ok(fresh)
    }

    /// Replace the snapshot directly (embedders that manage config themselves).
    pub fn replace(&self, config: KudosConfig) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(config);
    }
}
