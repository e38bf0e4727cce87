pub mod templates;
mod types;

pub use types::*;
