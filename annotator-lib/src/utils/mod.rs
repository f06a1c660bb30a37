mod datetime;
mod filesystem;

pub use datetime::*;
pub use filesystem::*;
