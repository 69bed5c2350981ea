//! Statements command - extract payment events from a mailbox directory.

use std::path::PathBuf;

use clap::Args;
use console::style;

use parovac_core::{CsobEmailStatement, PaymentEvent, StatementSource};

use super::OutputFormat;
use crate::maildir::EmlMailbox;

/// Arguments for the statements command.
#[derive(Args)]
pub struct StatementsArgs {
    /// Mailbox directory with .eml files (default: from config)
    #[arg(short, long)]
    mailbox: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: StatementsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let dir = args.mailbox.unwrap_or_else(|| config.mailbox_dir.clone());
    let mailbox = EmlMailbox::open(&dir)?;

    let sources: Vec<Box<dyn StatementSource>> = vec![Box::new(CsobEmailStatement::new())];

    let mut payments: Vec<PaymentEvent> = Vec::new();
    for (index, message) in mailbox.messages().iter().enumerate() {
        let sequence = index as u32 + 1;
        for source in &sources {
            // The first source that finds the message applicable wins.
            if let Some(found) =
                source.process_message(sequence, message.headers(), &message.body_source())?
            {
                payments.extend(found);
                break;
            }
        }
    }

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&payments)?);
        }
        OutputFormat::Text => {
            if payments.is_empty() {
                println!("{} No payments found.", style("ℹ").blue());
                return Ok(());
            }
            for payment in &payments {
                println!(
                    "{}  VS {:>10}  {:>12}",
                    payment.date, payment.variable_symbol, payment.amount
                );
            }
            println!(
                "\n{} {} payment(s) extracted; matching against unpaid invoices is not performed",
                style("✓").green(),
                payments.len()
            );
        }
    }

    Ok(())
}
