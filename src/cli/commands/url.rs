use crate::cli::ApiClient;

pub async fn cmd_url(client: &ApiClient, id: i32) -> anyhow::Result<()> {
    let url = client.get_original_url(id).await?;
    println!("{url}");
    Ok(())
}
