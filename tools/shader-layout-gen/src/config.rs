//! Generator configuration (shader-layout-gen.toml)
//!
//! Every field has a default, so a missing or empty file describes the usual
//! layout: both capture tables and both artifacts in the working directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "shader-layout-gen.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Captured tables
    #[serde(default)]
    pub inputs: InputsConfig,
    /// Artifact paths
    #[serde(default)]
    pub outputs: OutputsConfig,
    /// Binary template naming
    #[serde(default)]
    pub template: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputsConfig {
    /// `index,name,hash` table (default: shaderhashes.csv)
    #[serde(default = "default_hashes")]
    pub hashes: PathBuf,
    /// `shader,offset,type,name,componentcount` table (default: shaderinputs.csv)
    #[serde(default = "default_inputs")]
    pub inputs: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputsConfig {
    /// Binary template (default: mt_shared.generated.bt)
    #[serde(default = "default_template")]
    pub template: PathBuf,
    /// Accessor module (default: mfx.py)
    #[serde(default = "default_accessor")]
    pub accessor: PathBuf,
    /// Normalized catalog as JSON; not written unless set
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Include guard macro (default: MT_SHARED_GENERATED_BT)
    #[serde(default = "default_include_guard")]
    pub include_guard: String,
    /// Template that declares the element types (default: mt_shared.bt)
    #[serde(default = "default_include")]
    pub include: String,
}

fn default_hashes() -> PathBuf {
    PathBuf::from("shaderhashes.csv")
}

fn default_inputs() -> PathBuf {
    PathBuf::from("shaderinputs.csv")
}

fn default_template() -> PathBuf {
    PathBuf::from("mt_shared.generated.bt")
}

fn default_accessor() -> PathBuf {
    PathBuf::from("mfx.py")
}

fn default_include_guard() -> String {
    "MT_SHARED_GENERATED_BT".to_string()
}

fn default_include() -> String {
    "mt_shared.bt".to_string()
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            hashes: default_hashes(),
            inputs: default_inputs(),
        }
    }
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            accessor: default_accessor(),
            catalog: None,
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            include_guard: default_include_guard(),
            include: default_include(),
        }
    }
}

impl Config {
    /// Load a config file; relative paths inside it resolve against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid shader-layout-gen config")
    }

    /// Prefix every relative path with `base`
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(&mut self.inputs.hashes);
        resolve(&mut self.inputs.inputs);
        resolve(&mut self.outputs.template);
        resolve(&mut self.outputs.accessor);
        if let Some(catalog) = &mut self.outputs.catalog {
            resolve(catalog);
        }
    }

    /// Move every artifact into `dir`, keeping file names
    pub fn redirect_outputs(&mut self, dir: &Path) {
        let redirect = |path: &mut PathBuf| {
            if let Some(name) = path.file_name() {
                *path = dir.join(name);
            }
        };

        redirect(&mut self.outputs.template);
        redirect(&mut self.outputs.accessor);
        if let Some(catalog) = &mut self.outputs.catalog {
            redirect(catalog);
        }
    }
}
