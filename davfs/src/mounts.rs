use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};

use davfs_adapter::{VfsAdapter, WebDavAdapter};

use crate::config::Config;

/// Dispatch of mount-qualified virtual paths to their adapter
pub struct MountTable {
    adapters: HashMap<String, Arc<dyn VfsAdapter>>,
}

impl MountTable {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let adapters = config
            .mounts
            .iter()
            .map(|(id, mount)| {
                let adapter: Arc<dyn VfsAdapter> =
                    Arc::new(WebDavAdapter::with_client(mount, client.clone()));
                (id.clone(), adapter)
            })
            .collect::<HashMap<_, _>>();

        tracing::debug!("{} mounts loaded", adapters.len());
        Ok(Self { adapters })
    }

    pub fn get(&self, path: &str) -> Result<Arc<dyn VfsAdapter>> {
        let id = mount_id(path)?;
        self.adapters
            .get(id)
            .cloned()
            .ok_or(anyhow!("unknown mount \"{}\"", id))
    }

    /// Adapter for a two-path operation, both ends must live on the same mount
    pub fn get_pair(&self, src: &str, dest: &str) -> Result<Arc<dyn VfsAdapter>> {
        let (src_id, dest_id) = (mount_id(src)?, mount_id(dest)?);
        if src_id != dest_id {
            bail!(
                "\"{}\" and \"{}\" are on different mounts ({} and {})",
                src,
                dest,
                src_id,
                dest_id
            );
        }
        self.get(src)
    }
}

/// Text before the first `:` of a virtual path
pub fn mount_id(path: &str) -> Result<&str> {
    match path.split_once(':') {
        Some((id, _)) if !id.is_empty() && !id.contains('/') => Ok(id),
        _ => bail!("\"{}\" is not a mount-qualified path (expected mount:/path)", path),
    }
}
