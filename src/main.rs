use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use json2model::base::constants::STANDARD_LAYERS;
use json2model::export::{export_package, find_package, list_packages, to_json};
use json2model::import::write_changeset;
use json2model::reconcile::{NoPrompt, TerminalPrompter};
use json2model::{
    Error, ImportOptions, ModelAdapter, ModelHost, Policy, apply_file, generate_changeset,
    import_live,
};

/// Convert JSON data-schema documents into a target model.
#[derive(Parser)]
#[command(name = "json2model", version, about = "JSON schema to model converter")]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a schema file or directory into the model
    Import {
        /// Schema file, or directory scanned for *.json
        input: PathBuf,
        /// Model file (.json or .yaml)
        #[arg(short, long)]
        model: PathBuf,
        #[command(flatten)]
        destination: Destination,
        /// Element id of an existing datatypes container
        #[arg(long)]
        types: Option<String>,
        /// Layer or element id below which "Data Types" is found or created
        #[arg(long)]
        types_parent: Option<String>,
        /// Write the YAML change-set here instead of changing the model
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Conflict policy: skip, replace, abort or ask (default: ask on a terminal, else abort)
        #[arg(long)]
        policy: Option<Policy>,
    },

    /// Apply a YAML change-set to a model
    Apply {
        /// Change-set file
        changeset: PathBuf,
        /// Model file (.json or .yaml)
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Convert a model package back into a schema document
    Export {
        /// Model file (.json or .yaml)
        #[arg(short, long)]
        model: PathBuf,
        /// Id or name of the package to export
        #[arg(short, long, required_unless_present = "list", conflicts_with = "list")]
        package: Option<String>,
        /// List every data package in the model
        #[arg(short, long)]
        list: bool,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Indentation width; negative writes a single line
        #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
        indent: i32,
    },

    /// Write an empty model with the standard layers
    Init {
        /// Model file to create (.json or .yaml)
        #[arg(short, long)]
        model: PathBuf,
    },
}

/// Where converted packages go: exactly one of a layer or an element.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Destination {
    /// Layer whose data package receives the packages
    #[arg(long, value_parser = PossibleValuesParser::new(STANDARD_LAYERS.iter().copied()))]
    layer: Option<String>,
    /// Element id of the package that receives the packages
    #[arg(long)]
    root: Option<String>,
}

impl Destination {
    fn anchor(self) -> String {
        self.layer.or(self.root).unwrap_or_default()
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        if e.is_abort() {
            eprintln!("Aborted: {e}");
        } else {
            eprintln!("error: {e}");
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands) -> Result<(), Error> {
    match command {
        Commands::Import {
            input,
            model,
            destination,
            types,
            types_parent,
            output,
            policy,
        } => {
            let policy =
                policy.unwrap_or_else(|| Policy::default_for_terminal(io::stdin().is_terminal()));
            let options = ImportOptions {
                input,
                destination: destination.anchor(),
                types,
                types_parent,
                policy,
            };
            cmd_import(&model, &options, output.as_deref())
        }
        Commands::Apply { changeset, model } => {
            let mut host = ModelHost::open(&model)?;
            let report = apply_file(&mut host, &changeset)?;
            info!(created = report.created, modified = report.modified, "applied");
            host.save()?;
            Ok(())
        }
        Commands::Export {
            model,
            package,
            list,
            output,
            indent,
        } => cmd_export(&model, package.as_deref(), list, output.as_deref(), indent),
        Commands::Init { model } => {
            let mut host = ModelHost::init(&model)?;
            host.save()?;
            Ok(())
        }
    }
}

fn cmd_import(model: &Path, options: &ImportOptions, output: Option<&Path>) -> Result<(), Error> {
    let mut host = ModelHost::open(model)?;

    if let Some(output) = output {
        let changeset = generate_changeset(&host, options)?;
        return write_changeset(&changeset, output);
    }

    let report = match options.policy {
        Policy::Ask => import_live(&mut host, options, TerminalPrompter::stdio())?,
        _ => import_live(&mut host, options, NoPrompt)?,
    };
    info!(
        created = report.created,
        replaced = report.replaced,
        kept = report.kept,
        "import finished"
    );
    host.save()?;
    Ok(())
}

fn cmd_export(
    model: &Path,
    package: Option<&str>,
    list: bool,
    output: Option<&Path>,
    indent: i32,
) -> Result<(), Error> {
    let host = ModelHost::open(model)?;

    if list {
        println!("The following data packages were found in the model:");
        for package in list_packages(host.model()) {
            println!("  {}", package.short_repr());
        }
        return Ok(());
    }

    let query = package.unwrap_or_default();
    let element = find_package(host.model(), query)?;
    let raw = export_package(host.model(), element);
    let indent = usize::try_from(indent).ok();
    let mut text = to_json(&raw, indent)?;
    text.push('\n');

    match output {
        Some(path) => fs::write(path, text).map_err(|e| Error::io(path, e))?,
        None => print!("{text}"),
    }
    Ok(())
}
