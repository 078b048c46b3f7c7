//! Startup configuration: optional TOML file plus the working directory.
//!
//! Everything here is resolved once at process start. The resulting
//! [`Settings`] value is passed explicitly to the components that need it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Working directory used when neither the CLI, `ASTRO_DIR`, nor the config
/// file names one.
pub const DEFAULT_WORKDIR: &str = "./astro";

/// Optional TOML configuration (`--config`).
///
/// Missing fields default to an unset value; a missing file is the same as an
/// empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SiteopsConfig {
    /// Working directory. Relative paths resolve against the config file's
    /// directory.
    pub workdir: Option<PathBuf>,

    /// Kill external commands after this many seconds. Unset means wait
    /// indefinitely.
    pub command_timeout_secs: Option<u64>,
}

impl SiteopsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.command_timeout_secs == Some(0) {
            return Err(anyhow!("command_timeout_secs must be > 0"));
        }
        if let Some(workdir) = &self.workdir
            && workdir.as_os_str().is_empty()
        {
            return Err(anyhow!("workdir must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SiteopsConfig::default()`.
pub fn load_config(path: &Path) -> Result<SiteopsConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file missing, using defaults");
        return Ok(SiteopsConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SiteopsConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// The single directory every external command runs in.
///
/// Only constructible through [`Workdir::resolve`], so holding one proves the
/// directory existed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workdir {
    path: PathBuf,
}

impl Workdir {
    /// Expand `~`, anchor relative paths at `base`, canonicalize, and require
    /// an existing directory.
    pub fn resolve(raw: &Path, base: &Path) -> Result<Self> {
        let raw_str = raw
            .to_str()
            .ok_or_else(|| anyhow!("working directory {} is not valid UTF-8", raw.display()))?;
        let expanded = PathBuf::from(shellexpand::tilde(raw_str).into_owned());
        let joined = if expanded.is_relative() {
            base.join(&expanded)
        } else {
            expanded
        };
        let not_a_dir = || {
            anyhow!(
                "working directory {} does not exist or is not a directory",
                joined.display()
            )
        };
        let path = joined.canonicalize().map_err(|_| not_a_dir())?;
        if !path.is_dir() {
            return Err(not_a_dir());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolved process-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub workdir: Workdir,
    pub command_timeout: Option<Duration>,
}

impl Settings {
    /// Resolve settings from the CLI override (which already folds in
    /// `ASTRO_DIR`), the optional config file, and the default.
    pub fn resolve(workdir_override: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("read current directory")?;
        let cfg = match config_path {
            Some(path) => load_config(path)?,
            None => SiteopsConfig::default(),
        };

        let (raw, base) = match (workdir_override, &cfg.workdir) {
            (Some(path), _) => (path.to_path_buf(), cwd),
            (None, Some(path)) => {
                let base = config_path
                    .and_then(Path::parent)
                    .map(|dir| cwd.join(dir))
                    .unwrap_or(cwd);
                (path.clone(), base)
            }
            (None, None) => (PathBuf::from(DEFAULT_WORKDIR), cwd),
        };

        let workdir = Workdir::resolve(&raw, &base)?;
        info!(workdir = %workdir.path().display(), "resolved working directory");
        Ok(Self {
            workdir,
            command_timeout: cfg.command_timeout_secs.map(Duration::from_secs),
        })
    }
}
