pub mod client;
pub mod http_client;
pub mod invoker;
pub mod prompts;

pub use client::*;
pub use invoker::*;
pub use prompts::*;
