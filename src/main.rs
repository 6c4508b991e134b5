use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    intentclick_cli::cli::app::run().await
}
