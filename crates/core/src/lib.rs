pub mod config;
pub mod error;
pub mod filter;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod types;

pub use config::parse_site_toml;
pub use error::{Error, Result};
pub use filter::{ActiveFilter, FilterIndex, TaggedEntry, parse_tags};
pub use types::*;
