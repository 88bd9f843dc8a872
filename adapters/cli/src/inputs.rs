use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use micromouse_core::Action;
use micromouse_system_harness::HarnessConfig;
use serde::Deserialize;

/// Action script replayed by a scripted robot.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    actions: Vec<Action>,
}

/// Reads harness limits from a TOML file.
pub(crate) fn load_config(path: &Path) -> Result<HarnessConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config in {}", path.display()))
}

fn parse_config(contents: &str) -> Result<HarnessConfig> {
    let config: HarnessConfig =
        toml::from_str(contents).context("failed to parse harness config toml contents")?;
    if config.max_time == 0 {
        bail!("max_time must be positive");
    }
    if !config.exploration_weight.is_finite() || config.exploration_weight < 0.0 {
        bail!(
            "exploration_weight must be a non-negative number (received {})",
            config.exploration_weight
        );
    }
    Ok(config)
}

/// Reads the action list of a scripted robot from a TOML file.
pub(crate) fn load_script(path: &Path) -> Result<Vec<Action>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read script at {}", path.display()))?;
    parse_script(&contents).with_context(|| format!("invalid script in {}", path.display()))
}

fn parse_script(contents: &str) -> Result<Vec<Action>> {
    let script: Script =
        toml::from_str(contents).context("failed to parse action script toml contents")?;
    if script.actions.is_empty() {
        bail!("action script contains no actions");
    }
    Ok(script.actions)
}
