//! Storage cleanup for disabled algorithms

use super::App;
use anyhow::Result;

/// Drop digest columns for algorithms no longer in the enabled set.
pub async fn run(app: &App) -> Result<()> {
    let purged = app.store.purge_disabled_columns().await?;
    if purged.is_empty() {
        println!("Nothing to clean.");
    } else {
        for algo in &purged {
            println!("Dropped stored {} digests.", algo.display_name());
        }
    }
    Ok(())
}
