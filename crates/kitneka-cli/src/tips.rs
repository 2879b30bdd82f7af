//! `tips` command: seasonal buying advice from the backend.

use kitneka_client::DiscoveryClient;
use kitneka_core::SeasonalTip;

pub(crate) fn format_tip(tip: &SeasonalTip) -> String {
    if tip.description.trim().is_empty() {
        tip.title.clone()
    } else {
        format!("{}: {}", tip.title, tip.description.trim())
    }
}

/// Prints the current seasonal tips.
///
/// # Errors
///
/// Returns an error if the tips request fails.
pub(crate) async fn run_tips(client: &DiscoveryClient) -> anyhow::Result<()> {
    let tips = client.seasonal_tips().await?;
    tracing::info!(count = tips.len(), "seasonal tips loaded");

    if tips.is_empty() {
        println!("No buying tips right now.");
        return Ok(());
    }
    for tip in &tips {
        println!("- {}", format_tip(tip));
    }

    Ok(())
}
