use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{convert::CodecConfig, persist};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// WLA-DX listing (`.dw`/`.db` lines).
    #[default]
    Listing,
    /// Raw CGRAM and VRAM bytes.
    Binary,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub mode: OutputMode,
    #[serde(flatten)]
    pub codec: CodecConfig,
}

pub fn get_global_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "png2snes")
        .context("Unable to open global config directory.")?;
    let config_dir = project_dirs.config_dir();
    let config_path = config_dir.join("config.json");
    Ok(config_path)
}

impl Config {
    /// Defaults, overlaid by the global config file if there is one, then by
    /// `explicit_path`. Command-line flags are applied on top by the caller.
    pub fn load(explicit_path: Option<&Path>) -> Result<Config> {
        let global_path = match get_global_config_path() {
            Ok(path) if path.is_file() => {
                info!("Using global config {}", path.display());
                Some(path)
            }
            Ok(path) => {
                debug!("No global config at {}", path.display());
                None
            }
            Err(e) => {
                debug!("{}", e);
                None
            }
        };
        Self::load_layered(global_path.as_deref(), explicit_path)
    }

    /// Keys in `explicit_path` replace the same keys from `global_path`; keys it
    /// leaves out keep their global value, and anything in neither file takes
    /// its default.
    pub fn load_layered(
        global_path: Option<&Path>,
        explicit_path: Option<&Path>,
    ) -> Result<Config> {
        let mut merged = Map::new();
        if let Some(path) = global_path {
            merged.extend(load_object(path)?);
        }
        if let Some(path) = explicit_path {
            merged.extend(
                load_object(path)
                    .with_context(|| format!("Unable to load config {}", path.display()))?,
            );
        }
        let config: Config = serde_json::from_value(Value::Object(merged))?;
        Ok(config)
    }
}

fn load_object(path: &Path) -> Result<Map<String, Value>> {
    match persist::load_json::<Value>(path)? {
        Value::Object(map) => Ok(map),
        _ => bail!("{} does not hold a JSON object", path.display()),
    }
}
