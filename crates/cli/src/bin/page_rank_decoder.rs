use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    decoder_cli::main_entry().await
}
