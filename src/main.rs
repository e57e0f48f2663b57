/*
 * Responsibility
 * - tokio runtime bootstrap
 * - call app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    catalog_api::app::run().await
}
