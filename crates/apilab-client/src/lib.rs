// HTTP execution of API Lab buttons

pub mod error;
pub mod invoker;

pub use error::{Error, Result};
pub use invoker::HttpInvoker;
