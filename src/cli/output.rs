use anyhow::Result;
use clap::ValueEnum;
use intent_locator::{Activation, ExpandedIntent, IntentMatch, TableIntent};
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

pub fn print_activation(activation: &Activation, format: OutputFormat) -> Result<()> {
    let resolution = &activation.resolution;
    match format {
        OutputFormat::Json => print_json(&json!({
            "node": resolution.node,
            "score": resolution.score,
            "text": resolution.text,
            "source": resolution.source,
            "sweeps": resolution.sweeps,
            "elapsed_ms": resolution.elapsed.as_millis() as u64,
            "table": activation.table.as_ref().map(table_value),
        })),
        OutputFormat::Human => {
            match &activation.table {
                Some(table) if table.action.is_empty() => println!("Clicked row {}", table.row),
                Some(table) => println!("Clicked {} in row {}", table.action, table.row),
                None => println!("Clicked element"),
            }
            if !resolution.text.is_empty() {
                println!("  matched: \"{}\"", resolution.text);
            }
            println!("  score:   {:.2}", resolution.score);
            println!("  via:     {}", resolution.source);
            println!(
                "  after:   {} sweep(s), {}ms",
                resolution.sweeps,
                resolution.elapsed.as_millis()
            );
            Ok(())
        }
    }
}

pub fn print_expansion(expanded: &ExpandedIntent, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(expanded)?),
        OutputFormat::Human => {
            let source = match expanded.matched() {
                Some(IntentMatch::Exact { canonical }) => format!("exact match on \"{canonical}\""),
                Some(IntentMatch::Fuzzy { canonical, score }) => {
                    format!("fuzzy match on \"{canonical}\" ({score:.2})")
                }
                None => "no synonym group".to_string(),
            };
            println!("{} -> {}", expanded.keyword(), source);
            for term in expanded.iter() {
                println!("  {term}");
            }
            Ok(())
        }
    }
}

pub fn print_parse(intent: &str, table: Option<&TableIntent>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "intent": intent,
            "table": table.map(table_value),
        })),
        OutputFormat::Human => {
            match table {
                Some(table) => println!("row {} / action \"{}\"", table.row, table.action),
                None => println!("free-form: \"{}\"", intent.trim()),
            }
            Ok(())
        }
    }
}

fn table_value(table: &TableIntent) -> Value {
    json!({ "row": table.row, "action": table.action })
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
