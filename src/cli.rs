use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Export(ExportArgs),
    Check(CheckArgs),
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory of department JSON files.
    #[arg(long)]
    pub departments: String,

    /// Output directory for `courses.json` and `course-map.json`.
    #[arg(long)]
    pub out: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory of department JSON files.
    #[arg(long)]
    pub departments: String,

    /// Directory of degree-structure JSON files.
    #[arg(long)]
    pub degrees: String,

    /// Write the Markdown report here instead of stdout.
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Directory of department JSON files.
    #[arg(long)]
    pub departments: String,

    /// Query string; empty lists the first `--limit` courses.
    #[arg(long, default_value = "")]
    pub query: String,

    /// Maximum number of results.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}
