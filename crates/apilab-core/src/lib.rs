pub mod analysis;
pub mod classify;
pub mod coordinator;
pub mod error;
pub mod export;
pub mod filter;
pub mod invoke;
pub mod model;
pub mod persist;
pub mod store;
pub mod validate;

pub use coordinator::Coordinator;
pub use error::{Error, Result};
pub use invoke::{CallRequest, Invoker};
pub use model::{Button, Call, HttpMethod, Template};
