pub mod log;
pub mod telegram;

pub use log::*;
pub use telegram::*;
