use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Name the selection script is installed under by default.
pub const DEFAULT_TOOL: &str = "amittai-cynical-selection.pl";

/// Options for one selection run.
///
/// The boolean switches are forwarded to the external tool only when they
/// are on; an off switch is represented by leaving the flag out entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Select sqrt(k) lines per iteration. Much faster and much more approximate.
    pub batch_mode: bool,
    /// Keep words whose vocabulary ratio is close to 1.
    pub keep_boring: bool,
    /// Trade speed for lower memory use inside the tool.
    pub save_memory: bool,
    /// Lowercase corpora during normalization.
    pub lower: bool,
    /// Ignore words seen fewer than this many times.
    pub min_count: u32,
    /// Ignore words seen more than this many times. 0 leaves it to the tool.
    pub max_count: u32,
    /// How many lines to select. 0 selects everything.
    pub num_lines: u32,
    /// Working directory for artifacts and tool output.
    pub outdir: PathBuf,
    /// Keep the working directory after a successful run.
    pub save_output: bool,
    /// Selection executable, either a bare name looked up on PATH or a path.
    pub tool: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            batch_mode: false,
            keep_boring: true,
            save_memory: true,
            lower: true,
            min_count: 3,
            max_count: 10_000,
            num_lines: 0,
            outdir: env::temp_dir().join("cynical_out"),
            save_output: false,
            tool: DEFAULT_TOOL.to_string(),
        }
    }
}

impl SelectionConfig {
    /// Layer `CYNICAL_*` environment variables over the defaults.
    ///
    /// Unset variables keep their default. A variable that is set but
    /// doesn't parse is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(tool) = env::var("CYNICAL_TOOL") {
            config.tool = tool;
        }
        if let Ok(outdir) = env::var("CYNICAL_OUTDIR") {
            config.outdir = PathBuf::from(outdir);
        }

        config.min_count = env_parse("CYNICAL_MIN_COUNT", config.min_count)?;
        config.max_count = env_parse("CYNICAL_MAX_COUNT", config.max_count)?;
        config.num_lines = env_parse("CYNICAL_NUM_LINES", config.num_lines)?;
        config.batch_mode = env_flag("CYNICAL_BATCH_MODE", config.batch_mode)?;
        config.keep_boring = env_flag("CYNICAL_KEEP_BORING", config.keep_boring)?;
        config.save_memory = env_flag("CYNICAL_SAVE_MEMORY", config.save_memory)?;
        config.lower = env_flag("CYNICAL_LOWER", config.lower)?;
        config.save_output = env_flag("CYNICAL_SAVE_OUTPUT", config.save_output)?;

        Ok(config)
    }
}

fn env_parse(name: &str, default: u32) -> Result<u32> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw)
            .with_context(|| format!("{name} must be true/false (or 1/0), got {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
