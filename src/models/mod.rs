pub mod site;
pub mod tags;

pub use site::{NO_TITLE, NewSite, Site, TextField};
pub use tags::{TAG_SEPARATOR, TagFilter, TagMatch, normalize_tags, split_tags};
