use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tal",
    about = "Talent Ledger — one talent profile per identity",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Registry snapshot file
    #[arg(long, global = true, default_value = ".tal/registry.json")]
    pub store: PathBuf,

    /// Principal the command runs as
    #[arg(long, global = true)]
    pub caller: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register the caller's profile
    Create(ProfileArgs),
    /// Replace the caller's profile
    Modify(ProfileArgs),
    /// Show the full stored record
    Show(ReadArgs),
    /// Show the personal identifier
    Identifier(ReadArgs),
    /// Show the base region
    Region(ReadArgs),
    /// Show the expertise areas
    Expertise(ReadArgs),
    /// Show the weekly capacity
    Capacity(ReadArgs),
    /// Count the expertise areas
    CountExpertise(ReadArgs),
    /// Check that at least one expertise area is stored
    ExpertiseNonempty(ReadArgs),
    /// Whether the identity is registered (true/false)
    Exists(ReadArgs),
    /// Registration status as text
    Status(ReadArgs),
    /// Identifier, region and expertise count
    Summary(ReadArgs),
    /// Region and expertise areas
    RegionExpertise(ReadArgs),
    /// Every field under its view name
    Profile(ReadArgs),
    /// Print the caller id of --caller
    Whoami,
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub identifier: String,
    #[arg(long)]
    pub region: String,
    #[arg(short, long = "expertise")]
    pub expertise: Vec<String>,
    #[arg(long)]
    pub capacity: u64,
}

#[derive(Args)]
pub struct ReadArgs {
    /// Caller id to read (defaults to the id of --caller)
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<String>,
}
