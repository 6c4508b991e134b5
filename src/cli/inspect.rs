//! Offline commands: no browser needed

use std::sync::Arc;

use anyhow::Result;
use intent_locator::{parse_table_intent, IntentExpander};

use super::commands::{ExpandArgs, ParseArgs};
use super::output::{print_expansion, print_parse, OutputFormat};
use crate::config::Config;

pub fn cmd_expand(args: ExpandArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let expander = IntentExpander::new(Arc::new(config.synonym_table()));
    let expanded = expander.expand(&args.keyword);
    print_expansion(&expanded, format)
}

pub fn cmd_parse(args: ParseArgs, format: OutputFormat) -> Result<()> {
    let table = parse_table_intent(&args.intent);
    print_parse(&args.intent, table.as_ref(), format)
}
