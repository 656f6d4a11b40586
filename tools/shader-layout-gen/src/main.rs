//! shader-layout-gen CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use shader_layout_gen::config::{Config, DEFAULT_CONFIG_FILE};
use shader_layout_gen::generators::template::masked_hash;
use shader_layout_gen::{Catalog, layout};

#[derive(Parser)]
#[command(name = "shader-layout-gen")]
#[command(about = "Generate vertex shader input layouts from captured shader tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ./shader-layout-gen.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Shader hash table (overrides config)
    #[arg(long, global = true)]
    hashes: Option<PathBuf>,

    /// Shader input table (overrides config)
    #[arg(long, global = true)]
    inputs: Option<PathBuf>,

    /// Directory for generated artifacts (overrides config)
    #[arg(short, long, global = true)]
    out_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the binary template and accessor code
    Generate,

    /// Check that generated artifacts are in sync with the tables
    Check,

    /// Print the normalized catalog
    Inspect {
        /// Show the full layout of one shader
        #[arg(short, long)]
        shader: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Generate => {
            shader_layout_gen::generate(&config)?;
            tracing::info!("Done!");
        }
        Commands::Check => {
            if shader_layout_gen::check(&config)? {
                println!("\n✓ All artifacts are in sync!");
            } else {
                anyhow::bail!(
                    "Artifacts are out of sync. Run 'shader-layout-gen generate' to regenerate."
                );
            }
        }
        Commands::Inspect { shader } => {
            let catalog = shader_layout_gen::load_catalog(&config)?;
            match shader {
                Some(name) => print_shader(&catalog, &name)?,
                None => print_summary(&catalog),
            }
        }
    }

    Ok(())
}

/// Config file plus command line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    if let Some(hashes) = &cli.hashes {
        config.inputs.hashes = hashes.clone();
    }
    if let Some(inputs) = &cli.inputs {
        config.inputs.inputs = inputs.clone();
    }
    if let Some(dir) = &cli.out_dir {
        config.redirect_outputs(dir);
    }

    Ok(config)
}

fn print_summary(catalog: &Catalog) {
    println!(
        "{:<40} {:>10} {:>10} {:>7} {:>6}",
        "SHADER", "HASH", "ENUM", "INPUTS", "SIZE"
    );
    for shader in catalog.shaders() {
        let size = layout::struct_end(shader)
            .map(|size| size.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<40} 0x{:08X} 0x{:08X} {:>7} {:>6}",
            shader.name,
            shader.hash,
            masked_hash(shader.hash),
            shader.inputs().len(),
            size
        );
    }

    println!();
    println!(
        "{} shaders, {} input attributes",
        catalog.len(),
        catalog.attribute_count()
    );
    let duplicates = catalog.duplicate_names();
    if !duplicates.is_empty() {
        println!("Duplicate shader names: {}", duplicates.join(", "));
    }
}

fn print_shader(catalog: &Catalog, name: &str) -> Result<()> {
    let Some(shader) = catalog.find_by_name(name) else {
        anyhow::bail!("No shader named '{}'", name);
    };

    println!("{} (index {}, hash 0x{:08X})", shader.name, shader.index, shader.hash);
    match layout::struct_end(shader) {
        Some(size) => println!("size = {}", size),
        None => {
            println!("no inputs");
            return Ok(());
        }
    }
    println!();

    println!(
        "{:>6} {:>4} {:<8} {:>5} {:>5}  {:<24} ALIAS OF",
        "OFFSET", "TYPE", "", "COUNT", "BYTES", "CODE NAME"
    );
    for attr in shader.inputs() {
        let alias = attr
            .alias_of
            .map(|source| shader.inputs()[source].code_name.as_str())
            .unwrap_or("");
        println!(
            "{:>6} {:>4} {:<8} {:>5} {:>5}  {:<24} {}",
            attr.offset,
            attr.type_code.code(),
            attr.type_code.display_name(),
            attr.component_count,
            layout::attribute_size(attr),
            attr.code_name,
            alias
        );
    }

    Ok(())
}
