//! Application configuration loading for CLI defaults.
//!
//! The file uses a flat `key = value` subset of TOML: quoted strings,
//! unsigned integers and `#` comments.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tubefetch_core::{DownloaderConfig, QualityTarget};
use url::Url;

/// File configuration for CLI defaults. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default output directory for downloads.
    pub output_dir: Option<PathBuf>,
    /// Merge tool program.
    pub merge_tool: Option<PathBuf>,
    /// Metadata request deadline in seconds.
    pub metadata_timeout_secs: Option<u64>,
    /// Stream read inactivity deadline in seconds.
    pub stream_read_timeout_secs: Option<u64>,
    /// Default quality (`best`, `worst`, `720`, `720p`).
    pub quality: Option<String>,
    /// Player endpoint override.
    pub player_endpoint: Option<String>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("metadata_timeout_secs", self.metadata_timeout_secs)?;
        validate_timeout_secs("stream_read_timeout_secs", self.stream_read_timeout_secs)?;

        if let Some(quality) = &self.quality
            && quality.parse::<QualityTarget>().is_err()
        {
            bail!(
                "Invalid config value for `quality`: '{quality}'. Expected best, worst, <N> or <N>p"
            );
        }

        if let Some(endpoint) = &self.player_endpoint {
            Url::parse(endpoint).with_context(|| {
                format!("Invalid config value for `player_endpoint`: '{endpoint}'")
            })?;
        }

        Ok(())
    }

    /// Applies the file values onto a library configuration.
    pub fn apply_to(&self, config: &mut DownloaderConfig) {
        if let Some(tool) = &self.merge_tool {
            config.merge_tool.clone_from(tool);
        }
        if let Some(secs) = self.metadata_timeout_secs {
            config.metadata_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.stream_read_timeout_secs {
            config.stream_read_timeout = Duration::from_secs(secs);
        }
        if let Some(endpoint) = &self.player_endpoint {
            config.endpoint.clone_from(endpoint);
        }
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/tubefetch/config.toml`
/// 2. `$HOME/.config/tubefetch/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("tubefetch")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("tubefetch")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path; a missing file yields the defaults.
pub fn load_default_file_config() -> Result<FileConfig> {
    match resolve_default_config_path() {
        Some(path) if path.exists() => load_file_config(&path),
        _ => Ok(FileConfig::default()),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "merge_tool" => {
                cfg.merge_tool = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "metadata_timeout_secs" => {
                cfg.metadata_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "stream_read_timeout_secs" => {
                cfg.stream_read_timeout_secs =
                    Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "quality" => {
                cfg.quality = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "player_endpoint" => {
                cfg.player_endpoint = Some(parse_string_literal(value).with_context(invalid)?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}
