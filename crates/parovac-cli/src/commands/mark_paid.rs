//! Mark-paid command - fire the pay event on one invoice.

use clap::Args;
use console::style;

use parovac_core::{InvoiceClient, parse_invoice_id};

use crate::http::HttpTransport;

/// Arguments for the mark-paid command.
#[derive(Args)]
pub struct MarkPaidArgs {
    /// Invoice identifier
    #[arg(required = true)]
    id: String,
}

pub fn run(args: MarkPaidArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    // Reject bad identifiers before touching config or network.
    let invoice_id = parse_invoice_id(&args.id)?;

    let config = super::load_config(config_path)?;
    let transport = HttpTransport::from_config(&config)?;
    let mut client = InvoiceClient::new(transport);

    if client.mark_paid(invoice_id)? {
        println!(
            "{} Invoice {} marked as paid.",
            style("✓").green(),
            invoice_id
        );
    } else {
        println!(
            "{} Service returned an empty response for invoice {}.",
            style("⚠").yellow(),
            invoice_id
        );
    }

    Ok(())
}
