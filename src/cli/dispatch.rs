use anyhow::Result;

use super::click::{cmd_click, cmd_row};
use super::commands::Commands;
use super::env::CliArgs;
use super::inspect::{cmd_expand, cmd_parse};
use crate::config::Config;

pub async fn dispatch(cli: &CliArgs, config: &Config) -> Result<()> {
    match cli.command.clone() {
        Commands::Click(args) => cmd_click(args, config, cli.output).await,
        Commands::Row(args) => cmd_row(args, config, cli.output).await,
        Commands::Expand(args) => cmd_expand(args, config, cli.output),
        Commands::Parse(args) => cmd_parse(args, cli.output),
    }
}
