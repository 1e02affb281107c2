//! gwblock - Gateway DNS blocklist synchronizer

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    gwblock_cli::run().await
}
