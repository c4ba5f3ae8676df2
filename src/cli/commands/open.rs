use anyhow::Context;

use crate::cli::ApiClient;

pub async fn cmd_open(client: &ApiClient, id: i32, original: bool) -> anyhow::Result<()> {
    let url = if original {
        client.get_original_url(id).await?
    } else {
        client.page_url(id)
    };

    webbrowser::open(&url).with_context(|| format!("Failed to open browser to {url}"))?;
    println!("Opened browser to {url}");
    Ok(())
}
