// demos/wrap_unwrap/src/main.rs

use common::{init_logging, load_config_or_exit, wrap_unwrap_flow};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    // Load .env (PRIVATE_KEY, RPC_URL, WRAP_AMOUNT_LAMPORTS)
    let cfg = load_config_or_exit();

    // Wrap, wait for confirmation, then unwrap
    wrap_unwrap_flow(&cfg).await?;

    Ok(())
}
