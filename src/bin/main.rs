//! java2bedrock CLI
//!
//! Convert Minecraft Java resource packs into Bedrock resources and Geyser mappings.

use clap::{Parser, Subcommand, ValueEnum};
use java2bedrock::resolver::StateSpace;
use java2bedrock::{
    load_resource_pack, BlockSchemaTable, Converter, ConverterConfig, RenderMethod, Severity,
    StateSchemaProvider,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "java2bedrock")]
#[command(author, version, about = "Convert Java resource packs for Geyser", long_about = None)]
struct Cli {
    /// Log filter (e.g. "debug" or "java2bedrock=trace")
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a resource pack
    Convert {
        /// Java resource pack to convert (ZIP or directory)
        #[arg(short, long)]
        input: PathBuf,

        /// Vanilla client jar or extracted assets (ZIP or directory)
        #[arg(short, long)]
        vanilla: PathBuf,

        /// Block state table (minecraft-data blocks.json)
        #[arg(short, long)]
        schema: PathBuf,

        /// Output directory, or a .zip/.mcpack file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON config file; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip item conversion
        #[arg(long)]
        no_items: bool,

        /// Skip block conversion
        #[arg(long)]
        no_blocks: bool,

        /// Material used by item attachables
        #[arg(long)]
        attachable_material: Option<String>,

        /// Render method of block material instances
        #[arg(long, value_enum)]
        render_method: Option<RenderMethodArg>,

        /// Print every diagnostic after the summary
        #[arg(long)]
        verbose: bool,
    },

    /// Show information about a resource pack
    Info {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,
    },

    /// List every state of a block
    States {
        /// Block state table (minecraft-data blocks.json)
        #[arg(short, long)]
        schema: PathBuf,

        /// Block name (e.g., "minecraft:oak_log" or "oak_log")
        #[arg(short, long)]
        block: String,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RenderMethodArg {
    Opaque,
    AlphaTest,
    Blend,
    DoubleSided,
}

impl From<RenderMethodArg> for RenderMethod {
    fn from(arg: RenderMethodArg) -> Self {
        match arg {
            RenderMethodArg::Opaque => RenderMethod::Opaque,
            RenderMethodArg::AlphaTest => RenderMethod::AlphaTest,
            RenderMethodArg::Blend => RenderMethod::Blend,
            RenderMethodArg::DoubleSided => RenderMethod::DoubleSided,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log.as_str()))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Convert {
            input,
            vanilla,
            schema,
            output,
            config,
            no_items,
            no_blocks,
            attachable_material,
            render_method,
            verbose,
        } => {
            let mut config = match config {
                Some(path) => ConverterConfig::from_json_file(path)?,
                None => ConverterConfig::default(),
            };
            config.convert_items &= !no_items;
            config.convert_blocks &= !no_blocks;
            if let Some(material) = attachable_material {
                config = config.with_attachable_material(material);
            }
            if let Some(method) = render_method {
                config.block_render_method = method.into();
            }

            convert(&input, &vanilla, &schema, &output, config, verbose)?;
        }
        Commands::Info { resource_pack } => {
            show_pack_info(&resource_pack)?;
        }
        Commands::States { schema, block } => {
            show_states(&schema, &block)?;
        }
    }

    Ok(())
}

fn convert(
    input_path: &Path,
    vanilla_path: &Path,
    schema_path: &Path,
    output_path: &Path,
    config: ConverterConfig,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading resource pack from {:?}...", input_path);
    let input = load_resource_pack(input_path)?;
    println!(
        "  Found {} blockstates, {} models, {} textures",
        input.blockstate_count(),
        input.model_count(),
        input.texture_count()
    );

    println!("Loading vanilla assets from {:?}...", vanilla_path);
    let vanilla = load_resource_pack(vanilla_path)?;
    println!("  Found {} blockstates", vanilla.blockstate_count());

    let schema = BlockSchemaTable::from_json_file(schema_path)?;
    println!("  Loaded states of {} blocks", schema.len());

    let output = Converter::new(&input, &vanilla, &schema, config).convert()?;

    let is_archive = output_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "zip" | "mcpack"));
    if is_archive {
        output.pack.write_zip(output_path)?;
    } else {
        output.pack.write_to_directory(output_path)?;
    }

    let diagnostics = &output.diagnostics;
    println!("\nConversion summary:");
    println!("  Blocks mapped: {}", output.mappings.len());
    println!("  Files written: {}", output.pack.len());
    println!(
        "  Diagnostics: {} critical, {} warnings, {} info",
        diagnostics.count(Severity::Critical),
        diagnostics.count(Severity::Warning),
        diagnostics.count(Severity::Info)
    );

    if verbose {
        for diagnostic in diagnostics.entries() {
            println!("  {}", diagnostic);
        }
    }

    Ok(())
}

fn show_pack_info(resource_pack_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading resource pack from {:?}...", resource_pack_path);
    let pack = load_resource_pack(resource_pack_path)?;

    println!("\nResource Pack Info:");
    println!("  Namespaces: {}", pack.namespaces().join(", "));
    println!("  Blockstates: {}", pack.blockstate_count());
    println!("  Models: {}", pack.model_count());
    println!("  Textures: {}", pack.texture_count());

    Ok(())
}

fn show_states(schema_path: &Path, block: &str) -> Result<(), Box<dyn std::error::Error>> {
    let schema = BlockSchemaTable::from_json_file(schema_path)?;
    let Some(properties) = schema.state_schema(block) else {
        return Err(format!("Unknown block: {}", block).into());
    };

    let space = StateSpace::new(&properties);
    println!("{} has {} states:", block, space.len());
    for state in &space {
        let canonical = state.canonical();
        println!("  {}", if canonical.is_empty() { "(default)" } else { canonical.as_str() });
    }

    Ok(())
}
