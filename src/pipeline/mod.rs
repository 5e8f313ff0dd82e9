pub mod job;
pub mod paths;
pub mod runner;
pub mod scanner;
pub mod writer;

pub use job::*;
pub use paths::*;
pub use runner::*;
pub use scanner::*;
pub use writer::*;
