mod open;
mod save;
mod search;
mod url;

pub use open::cmd_open;
pub use save::cmd_save;
pub use search::{SearchArgs, cmd_search};
pub use url::cmd_url;
