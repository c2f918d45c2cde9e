use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tc_app::{AppConfig, AppError, AppResult, ConvertTable, LookupDirection, NameLookup, table_service};
use tc_topology::Topology;

#[derive(Parser)]
#[command(name = "tc-cli")]
#[command(about = "topoconv - convert network topologies into an emulated namespace", long_about = None)]
struct Cli {
    /// Config YAML file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a convert table from an original topology
    Table {
        /// Original topology JSON
        topology: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rewrite an original topology into the converted namespace
    Rewrite {
        /// Original topology JSON
        topology: PathBuf,
        /// Use a saved convert table instead of building one
        #[arg(long)]
        table: Option<PathBuf>,
        /// Also save the table that was used
        #[arg(long)]
        save_table: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Keep retained layers without renaming
    Filter {
        /// Topology JSON
        topology: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Emit a ContainerLab topology
    Clab {
        #[command(flatten)]
        source: EmitSource,
        /// Output format
        #[arg(long, value_enum, default_value_t = ClabFormat::Yaml)]
        format: ClabFormat,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Emit Batfish layer-1 topology edges
    Batfish {
        #[command(flatten)]
        source: EmitSource,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Look up a name in a saved convert table
    #[command(subcommand)]
    Lookup(LookupCommands),
}

#[derive(clap::Args)]
struct EmitSource {
    /// Topology JSON
    topology: PathBuf,
    /// Convert table naming the (already rewritten) topology
    #[arg(long, conflicts_with = "rewrite")]
    table: Option<PathBuf>,
    /// Treat the topology as original: build a table and rewrite it first
    #[arg(long)]
    rewrite: bool,
}

#[derive(Subcommand)]
enum LookupCommands {
    /// Look up a node
    Node {
        /// Convert table JSON
        table: PathBuf,
        /// Node name
        name: String,
        /// The name is a converted name
        #[arg(long)]
        reverse: bool,
    },
    /// Look up a term point
    Tp {
        /// Convert table JSON
        table: PathBuf,
        /// Node name
        node: String,
        /// Term point name
        tp: String,
        /// The names are converted names
        #[arg(long)]
        reverse: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ClabFormat {
    Yaml,
    Json,
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = tc_app::load_config_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Table { topology, output } => cmd_table(&config, &topology, output.as_deref()),
        Commands::Rewrite {
            topology,
            table,
            save_table,
            output,
        } => cmd_rewrite(
            &config,
            &topology,
            table.as_deref(),
            save_table.as_deref(),
            output.as_deref(),
        ),
        Commands::Filter { topology, output } => cmd_filter(&config, &topology, output.as_deref()),
        Commands::Clab {
            source,
            format,
            output,
        } => cmd_clab(&config, &source, format, output.as_deref()),
        Commands::Batfish { source, output } => cmd_batfish(&config, &source, output.as_deref()),
        Commands::Lookup(lookup) => match lookup {
            LookupCommands::Node {
                table,
                name,
                reverse,
            } => {
                let table = tc_app::load_table(&table)?;
                print_lookup(&tc_app::lookup_node(&table, &name, direction(reverse))?)
            }
            LookupCommands::Tp {
                table,
                node,
                tp,
                reverse,
            } => {
                let table = tc_app::load_table(&table)?;
                print_lookup(&tc_app::lookup_tp(&table, &node, &tp, direction(reverse))?)
            }
        },
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn direction(reverse: bool) -> LookupDirection {
    if reverse {
        LookupDirection::Reverse
    } else {
        LookupDirection::Forward
    }
}

fn cmd_table(config: &AppConfig, topology_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let topology = tc_app::load_topology(topology_path)?;
    let table = tc_app::build_table(&topology, config)?;
    write_output(output, &tc_app::table_to_json(&table)?)
}

fn cmd_rewrite(
    config: &AppConfig,
    topology_path: &Path,
    table_path: Option<&Path>,
    save_table: Option<&Path>,
    output: Option<&Path>,
) -> AppResult<()> {
    let source = tc_app::load_topology(topology_path)?;
    let table = match table_path {
        Some(path) => tc_app::load_table(path)?,
        None => tc_app::build_table(&source, config)?,
    };
    let emulated = tc_app::rewrite_topology(&source, &table, config)?;
    if let Some(path) = save_table {
        tc_app::save_table(path, &table)?;
    }
    write_topology(output, &emulated)
}

fn cmd_filter(config: &AppConfig, topology_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let source = tc_app::load_topology(topology_path)?;
    let filtered = tc_app::filter_topology(&source, config)?;
    write_topology(output, &filtered)
}

/// Resolve the graph to emit and the table naming it, if any.
fn prepare_emit(
    config: &AppConfig,
    source: &EmitSource,
) -> AppResult<(Topology, Option<ConvertTable>)> {
    let topology = tc_app::load_topology(&source.topology)?;
    if let Some(path) = &source.table {
        return Ok((topology, Some(tc_app::load_table(path)?)));
    }
    if source.rewrite {
        let table = tc_app::build_table(&topology, config)?;
        let emulated = tc_app::rewrite_topology(&topology, &table, config)?;
        return Ok((emulated, Some(table)));
    }
    Ok((topology, None))
}

fn cmd_clab(
    config: &AppConfig,
    source: &EmitSource,
    format: ClabFormat,
    output: Option<&Path>,
) -> AppResult<()> {
    let (topology, table) = prepare_emit(config, source)?;
    let clab = tc_app::emit_containerlab(&topology, table.as_ref(), config)?;
    let content = match format {
        ClabFormat::Yaml => clab.to_yaml(),
        ClabFormat::Json => clab.to_json(),
    }?;
    write_output(output, &content)
}

fn cmd_batfish(config: &AppConfig, source: &EmitSource, output: Option<&Path>) -> AppResult<()> {
    let (topology, table) = prepare_emit(config, source)?;
    let l1 = tc_app::emit_batfish(&topology, table.as_ref(), config)?;
    write_output(output, &l1.to_json()?)
}

fn print_lookup(lookup: &NameLookup) -> AppResult<()> {
    println!("{} -> {}", lookup.original, lookup.converted);
    println!("  l3_model:     {}", lookup.record.l3_model);
    println!("  l1_principal: {}", lookup.record.l1_principal);
    println!("  l1_agent:     {}", lookup.record.l1_agent);
    Ok(())
}

fn write_topology(output: Option<&Path>, topology: &Topology) -> AppResult<()> {
    match output {
        Some(path) => table_service::save_topology(path, topology),
        None => write_output(None, &tc_topology::to_json_string(topology)?),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> AppResult<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).map_err(|e| AppError::FileWrite {
                kind: "output",
                path: path.to_path_buf(),
                source: e,
            })?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
