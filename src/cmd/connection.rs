use std::io;

use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::connection::test_connection;

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Jira profile from the config file.
    #[arg(short, long)]
    pub profile: Option<String>,
}

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let mut stdout = io::stdout();
    test_connection(ctx, &mut stdout).await
}
