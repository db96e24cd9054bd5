pub mod archive;
pub mod audit;
pub mod config;
pub mod entry;
pub mod paths;
pub mod store;
pub mod util;
pub mod warn;
