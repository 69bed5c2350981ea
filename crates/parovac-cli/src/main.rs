//! CLI application for pairing bank payments with unpaid invoices.

mod commands;
mod http;
mod maildir;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, invoices, mark_paid, statements};

/// Pair bank payment notifications with unpaid invoices
#[derive(Parser)]
#[command(name = "parovac")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List unpaid invoices from the invoicing service
    Invoices(invoices::InvoicesArgs),

    /// Extract payment events from mailbox messages
    Statements(statements::StatementsArgs),

    /// Fire the pay event on a single invoice
    MarkPaid(mark_paid::MarkPaidArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Every command runs synchronously; remote fetches block until the
    // service answers.
    match cli.command {
        Commands::Invoices(args) => invoices::run(args, cli.config.as_deref()),
        Commands::Statements(args) => statements::run(args, cli.config.as_deref()),
        Commands::MarkPaid(args) => mark_paid::run(args, cli.config.as_deref()),
        Commands::Config(args) => config::run(args),
    }
}
