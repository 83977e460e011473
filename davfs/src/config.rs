use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use davfs_adapter::Mount;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    /// Mounts by id, the id being the first segment of a virtual path
    #[serde(default)]
    pub mounts: HashMap<String, Mount>,
}

pub fn read_config(config_file: PathBuf) -> Result<Config> {
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(config_file.as_path())?;

    let mut config = String::new();
    file.read_to_string(&mut config)?;

    Ok(toml::from_str(&config)?)
}
