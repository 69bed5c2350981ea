//! Invoices command - list unpaid invoices from the invoicing service.

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use parovac_core::InvoiceClient;

use super::OutputFormat;
use crate::http::HttpTransport;

/// Arguments for the invoices command.
#[derive(Args)]
pub struct InvoicesArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: InvoicesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let transport = HttpTransport::from_config(&config)?;
    let mut client = InvoiceClient::new(transport);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Fetching unpaid invoices...");
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let invoices = client.list_unpaid()?;
    pb.finish_and_clear();

    match args.format {
        OutputFormat::Json => {
            let values: Vec<_> = invoices.values().collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Text => {
            if invoices.is_empty() {
                println!("{} No unpaid invoices.", style("ℹ").blue());
                return Ok(());
            }
            for invoice in invoices.values() {
                let number = invoice.record.field_str("number").unwrap_or("-");
                let total = invoice.record.field_str("total").unwrap_or("-");
                println!(
                    "{:>8}  {:<16} {:<10} {:>12}",
                    invoice.id, number, invoice.status, total
                );
            }
            println!(
                "\n{} {} unpaid invoice(s)",
                style("✓").green(),
                invoices.len()
            );
        }
    }

    Ok(())
}
