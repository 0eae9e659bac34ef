//! schemashift: render migration plans to SQL
//!
//! # Usage
//!
//! ```bash
//! # Print the forward script
//! schemashift forward migrations/20261017093005_users.toml
//!
//! # Print the revert script, skipping inserts
//! schemashift revert migrations/20261017093005_users.toml --allow-partial
//!
//! # Start a new plan file
//! schemashift new add_users
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use schemashift::plan::scaffold;
use schemashift::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemashift")]
#[command(version)]
#[command(about = "Render typed schema changes to forward and revert SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    schemashift forward migrations/20261017093005_users.toml
    schemashift revert migrations/20261017093005_users.toml --terminator ''
    schemashift explain migrations/20261017093005_users.toml
    schemashift new add_users")]
struct Cli {
    /// Config file (defaults to ./schemashift.toml, then the user config dir)
    #[arg(long, env = "SCHEMASHIFT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Sql,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Sql => OutputFormat::Sql,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Args)]
struct ScriptArgs {
    /// Plan file
    plan: PathBuf,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Statement terminator
    #[arg(short, long)]
    terminator: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statements that apply a plan
    Forward {
        #[command(flatten)]
        args: ScriptArgs,
    },
    /// Print the statements that undo a plan, in reverse order
    Revert {
        #[command(flatten)]
        args: ScriptArgs,

        /// Skip changes that cannot be reverted instead of failing
        #[arg(long)]
        allow_partial: bool,
    },
    /// Show each change with its forward and revert SQL
    Explain {
        /// Plan file
        plan: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new, empty plan file
    New {
        /// Migration name (letters, digits, underscores)
        name: String,

        /// Directory to write into
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Show the supported data types and referential actions
    Types,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;

    match &cli.command {
        Commands::Forward { args } => {
            let (plan, config) = prepare(args, config)?;
            print_script(&plan.forward_statements(), &config)
        }
        Commands::Revert {
            args,
            allow_partial,
        } => {
            let (plan, config) = prepare(args, config)?;
            let statements = if *allow_partial || config.allow_partial_revert {
                let (statements, skipped) = plan.revert_statements_lossy();
                for index in skipped {
                    eprintln!(
                        "{} change #{} cannot be reverted, skipped",
                        "⚠".yellow(),
                        index
                    );
                }
                statements
            } else {
                plan.revert_statements()
                    .context("Use --allow-partial to skip irreversible changes")?
            };
            print_script(&statements, &config)
        }
        Commands::Explain { plan, json } => explain_plan(plan, *json),
        Commands::New { name, dir } => {
            let dir = dir.clone().unwrap_or(config.migrations_dir);
            create_plan(name, &dir)
        }
        Commands::Types => {
            show_types();
            Ok(())
        }
    }
}

/// Load the plan and apply command line overrides to the config.
fn prepare(args: &ScriptArgs, mut config: Config) -> Result<(MigrationPlan, Config)> {
    let plan = schemashift::load_plan(&args.plan)
        .with_context(|| format!("Failed to load plan {}", args.plan.display()))?;

    if let Some(format) = args.format {
        config.format = format.into();
    }
    if let Some(terminator) = &args.terminator {
        config.terminator = terminator.clone();
    }

    Ok((plan, config))
}

fn print_script(statements: &[String], config: &Config) -> Result<()> {
    match config.format {
        OutputFormat::Sql => {
            if !statements.is_empty() {
                println!("{}", config.script(statements));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(statements)?);
        }
    }
    Ok(())
}

fn explain_plan(path: &Path, json: bool) -> Result<()> {
    let plan = schemashift::load_plan(path)
        .with_context(|| format!("Failed to load plan {}", path.display()))?;
    let rendered = plan.render();

    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    println!("{}", "Migration Plan".cyan().bold());
    if let Some(name) = &plan.name {
        println!("  {} {}", "Name:".dimmed(), name.white());
    }
    if let Some(description) = &plan.description {
        println!("  {} {}", "Description:".dimmed(), description.white());
    }
    println!();

    for change in &rendered {
        println!(
            "{} {}",
            format!("#{}", change.index).cyan(),
            change.kind.white().bold()
        );
        println!("  {} {}", "forward:".dimmed(), change.forward.green());
        match &change.revert {
            Some(sql) => println!("  {} {}", "revert: ".dimmed(), sql.yellow()),
            None => println!("  {} {}", "revert: ".dimmed(), "irreversible".red()),
        }
    }

    let warnings = plan.lint();
    if !warnings.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    Ok(())
}

fn create_plan(name: &str, dir: &Path) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!(
            "Invalid migration name '{}': use letters, digits and underscores",
            name
        );
    }

    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        println!("  Created {} directory", dir.display().to_string().yellow());
    }

    let (file_name, content) = scaffold(name, &chrono::Local::now());
    let path = dir.join(file_name);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} {}", "✓ Created:".green(), path.display());

    Ok(())
}

fn show_types() {
    println!("{}", "Data Types".cyan().bold());
    println!();
    println!(
        "{:26} {:26} {}",
        "Type".white().bold(),
        "SQL".white().bold(),
        "Plan spelling".white().bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    let rows = [
        (DataType::varchar(255), "varchar(N), string(N)"),
        (DataType::text(), "varchar, string"),
        (DataType::Timestamp, "timestamp"),
        (
            DataType::TimestampWithTimeZone,
            "timestamp with time zone, timestamptz",
        ),
        (DataType::Interval, "interval"),
        (DataType::IpAddress, "inet, ip_address"),
        (DataType::Date, "date"),
        (DataType::Bool, "boolean, bool"),
        (DataType::Serial, "serial"),
        (DataType::Integer, "integer, int"),
        (DataType::Double, "double precision, double"),
    ];

    for (ty, spelling) in rows {
        println!(
            "{:26} {:26} {}",
            ty.name().yellow(),
            ty.to_sql().cyan(),
            spelling.dimmed()
        );
    }

    println!();
    println!("{}", "Referential Actions".cyan().bold());
    println!();
    for action in Action::ALL {
        println!("  {}", action.keyword().yellow());
    }
}
