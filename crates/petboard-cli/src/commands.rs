use anyhow::Context;
use colored::Colorize;
use petboard_server::{PetboardServer, ServerConfig};
use petboard_store::{JsonFileStore, PetCollection, RecordStore};
use petboard_types::{IndexedPet, Partition};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::List(args) => cmd_list(args),
        Command::Init(args) => cmd_init(args),
    }
}

/// Merge the config file (if any) with command-line overrides.
pub fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(data_file) = &args.data_file {
        config.data_file = data_file.clone();
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    tracing::debug!(?config, "resolved configuration");
    let server = PetboardServer::new(config);
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let store = JsonFileStore::open(&args.data_file)
        .with_context(|| format!("opening {}", args.data_file.display()))?;
    let pets = PetCollection::new(
        store
            .load()
            .with_context(|| format!("reading {}", args.data_file.display()))?,
    );
    let partition = pets.partition();
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&partition)?),
        OutputFormat::Text => print!("{}", render_text(&partition)),
    }
    Ok(())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let existed = args.data_file.exists();
    JsonFileStore::open(&args.data_file)
        .with_context(|| format!("initializing {}", args.data_file.display()))?;
    if existed {
        println!("{} already exists", args.data_file.display().to_string().bold());
    } else {
        println!("{} Created {}", "✓".green().bold(), args.data_file.display().to_string().bold());
    }
    Ok(())
}

fn line(entry: &IndexedPet) -> String {
    format!(
        "  {} {} — {}, {}  {}\n",
        format!("[{}]", entry.index).dimmed(),
        entry.pet.name.bold(),
        entry.pet.breed,
        entry.pet.age,
        entry.pet.id.short_id().cyan()
    )
}

pub fn render_text(partition: &Partition) -> String {
    let mut out = format!("{} ({})\n", "Available".green().bold(), partition.available.len());
    for entry in &partition.available {
        out.push_str(&line(entry));
    }
    out.push_str(&format!("{} ({})\n", "Adopted".yellow().bold(), partition.adopted.len()));
    for entry in &partition.adopted {
        out.push_str(&line(entry));
    }
    out
}
