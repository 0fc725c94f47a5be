//! Terminal views, one per dashboard page.

pub mod industries;
pub mod market;
pub mod overview;
pub mod setup;
pub mod site;
pub mod statistics;
pub mod ui;
