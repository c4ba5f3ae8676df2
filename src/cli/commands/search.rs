use crate::cli::{ApiClient, display};
use crate::matching::{MatchMode, Matcher};
use crate::models::TextField;

pub struct SearchArgs {
    pub query: String,
    pub limit: Option<usize>,
    pub tags: Vec<String>,
    pub mode: MatchMode,
    pub field: TextField,
}

pub async fn cmd_search(client: &ApiClient, args: &SearchArgs) -> anyhow::Result<()> {
    let results = client
        .search(args.field, &args.query, args.mode, args.limit, &args.tags)
        .await?;

    if results.is_empty() {
        display::print_no_results(&args.query, &args.tags);
        return Ok(());
    }

    // Title searches have no body text worth quoting.
    let matcher = match args.field {
        TextField::Content => Matcher::new(&args.query, args.mode),
        TextField::Title => None,
    };

    display::print_results(&results, matcher.as_ref(), client.server_url());
    Ok(())
}
