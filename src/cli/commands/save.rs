use anyhow::Context;
use colored::Colorize;

use crate::cli::ApiClient;

pub async fn cmd_save(client: &ApiClient, url: &str, tags: &[String]) -> anyhow::Result<()> {
    println!("Saving URL: {}", url.bright_blue());
    if !tags.is_empty() {
        println!("Tags: {}", tags.join(", ").dimmed());
    }

    let saved = client
        .save(url, tags)
        .await
        .with_context(|| format!("Failed to save {url}"))?;

    println!(
        "{} Saved \"{}\" with ID: {}",
        "✓".green().bold(),
        saved.title,
        saved.id.to_string().bright_green()
    );
    println!("  {}", client.page_url(saved.id).bright_purple());
    Ok(())
}
