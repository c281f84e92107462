mod command_result;
pub mod extract;
pub mod init;
pub mod scan;

pub use command_result::*;
