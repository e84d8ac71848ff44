use ::apigen::UnsupportedTypePolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of an `apigen.json` file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApigenConfig {
    pub template_root: Option<PathBuf>,
    #[serde(default)]
    pub package_roots: Vec<PathBuf>,
    pub unsupported_types: Option<UnsupportedTypePolicy>,
}

impl ApigenConfig {
    /// Load a config file. Relative paths inside it are taken relative to the
    /// file's own directory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: ApigenConfig = serde_json::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        if let Some(root) = self.template_root.take() {
            self.template_root = Some(base.join(root));
        }
        for root in &mut self.package_roots {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
    }
}
