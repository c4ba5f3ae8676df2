pub mod prelude;

pub mod sites;
