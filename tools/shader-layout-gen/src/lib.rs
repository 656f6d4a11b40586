//! Vertex shader input layout generator library
//!
//! Merges a captured shader hash table with a per-attribute input layout table
//! into a normalized catalog, then renders it as a binary template and as
//! Python accessor classes.
//!
//! The pipeline is a single forward pass:
//! tables -> [`catalog::build`] -> [`layout::plan`] -> [`generators`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod generators;
pub mod layout;
pub mod model;
pub mod tables;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use config::Config;
pub use error::LayoutError;
pub use model::{Catalog, InputAttribute, ShaderRecord, TypeCode};

/// Rendered artifacts of one run, not yet written anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub template: String,
    pub accessor: String,
    pub catalog_json: Option<String>,
}

impl Artifacts {
    /// Pair each artifact with its configured destination
    fn outputs<'a>(&'a self, config: &'a Config) -> Vec<(&'a Path, &'a str)> {
        let mut outputs = vec![
            (config.outputs.template.as_path(), self.template.as_str()),
            (config.outputs.accessor.as_path(), self.accessor.as_str()),
        ];
        if let (Some(path), Some(json)) = (&config.outputs.catalog, &self.catalog_json) {
            outputs.push((path.as_path(), json.as_str()));
        }
        outputs
    }
}

/// Build the catalog from the text of both tables
pub fn build_catalog(hashes: &str, inputs: &str) -> Result<Catalog, LayoutError> {
    let hash_rows = tables::parse_hash_table(hashes)?;
    let input_rows = tables::parse_input_table(inputs)?;
    catalog::build(&hash_rows, &input_rows)
}

/// Read both configured tables and build the catalog
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    let hashes_path = &config.inputs.hashes;
    let inputs_path = &config.inputs.inputs;

    let hashes = std::fs::read_to_string(hashes_path)
        .with_context(|| format!("Failed to read {}", hashes_path.display()))?;
    let inputs = std::fs::read_to_string(inputs_path)
        .with_context(|| format!("Failed to read {}", inputs_path.display()))?;

    let catalog = build_catalog(&hashes, &inputs).with_context(|| {
        format!(
            "Failed to build shader catalog from {} and {}",
            hashes_path.display(),
            inputs_path.display()
        )
    })?;

    debug!(
        "Parsed {} shaders with {} input attributes",
        catalog.len(),
        catalog.attribute_count()
    );

    Ok(catalog)
}

/// Render every artifact for a catalog
pub fn render(catalog: &Catalog, config: &Config) -> Result<Artifacts> {
    let layouts = layout::plan(catalog);

    let template = generators::template::generate_template(catalog, &layouts, &config.template)
        .context("Failed to generate binary template")?;
    let accessor = generators::accessor::generate_accessors(&layouts)
        .context("Failed to generate accessor code")?;
    let catalog_json = match &config.outputs.catalog {
        Some(_) => Some(
            serde_json::to_string_pretty(catalog).context("Failed to serialize shader catalog")?,
        ),
        None => None,
    };

    info!(
        "Rendered {} vertex layouts ({} shaders without inputs)",
        layouts.len(),
        catalog.len() - layouts.len()
    );

    Ok(Artifacts {
        template,
        accessor,
        catalog_json,
    })
}

/// Run the whole pipeline and write every artifact.
///
/// Nothing is written unless every artifact rendered successfully. Artifacts
/// are staged next to their destinations and only moved into place once all
/// of them are on disk.
pub fn generate(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let artifacts = render(&catalog, config)?;

    let mut staged = Vec::new();
    for (path, content) in artifacts.outputs(config) {
        staged.push(Staged::write(path, content)?);
    }

    for artifact in staged {
        artifact.commit()?;
    }

    Ok(())
}

/// Artifact written to a sibling temporary file, removed unless committed
struct Staged<'a> {
    tmp: PathBuf,
    dest: &'a Path,
}

impl<'a> Staged<'a> {
    fn write(dest: &'a Path, content: &str) -> Result<Self> {
        if dest.is_dir() {
            anyhow::bail!("Failed to write {}: path is a directory", dest.display());
        }
        let Some(file_name) = dest.file_name() else {
            anyhow::bail!("Failed to write {}: not a file path", dest.display());
        };
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let staged = Self {
            tmp: dest.with_file_name(tmp_name),
            dest,
        };
        std::fs::write(&staged.tmp, content)
            .with_context(|| format!("Failed to write {}", staged.tmp.display()))?;

        Ok(staged)
    }

    fn commit(self) -> Result<()> {
        std::fs::rename(&self.tmp, self.dest)
            .with_context(|| format!("Failed to write {}", self.dest.display()))?;
        info!("Generated {}", self.dest.display());
        Ok(())
    }
}

impl Drop for Staged<'_> {
    fn drop(&mut self) {
        // Already gone after a successful commit
        let _ = std::fs::remove_file(&self.tmp);
    }
}

/// Check that the artifacts on disk match a fresh render
pub fn check(config: &Config) -> Result<bool> {
    let catalog = load_catalog(config)?;
    let artifacts = render(&catalog, config)?;

    let mut in_sync = true;
    for (path, fresh) in artifacts.outputs(config) {
        match std::fs::read_to_string(path) {
            Ok(existing) if existing == fresh => {
                println!("✓ In sync: {}", path.display());
            }
            Ok(_) => {
                println!("✗ Out of sync: {}", path.display());
                in_sync = false;
            }
            Err(e) => {
                println!("✗ Missing: {} ({})", path.display(), e);
                in_sync = false;
            }
        }
    }

    Ok(in_sync)
}
