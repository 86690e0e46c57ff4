use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::fetch::{TicketFormat, fetch_ticket};

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Jira ticket key (e.g., PROJ-123).
    #[arg(short, long)]
    pub ticket: String,
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = TicketFormat::Markdown)]
    pub format: TicketFormat,
    /// Write to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Append the transitions available from the current status.
    #[arg(long)]
    pub show_transitions: bool,
    /// Jira profile from the config file.
    #[arg(short, long)]
    pub profile: Option<String>,
}

pub async fn run(ctx: &AppContext, args: FetchArgs) -> AppResult<()> {
    println!("Fetching ticket {}...\n", args.ticket);
    let rendered = fetch_ticket(ctx, &args.ticket, args.format, args.show_transitions).await?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)?;
            println!("Saved to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    println!("\nTicket {} fetched successfully", args.ticket);
    Ok(())
}
