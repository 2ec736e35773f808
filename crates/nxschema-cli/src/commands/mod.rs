//! Command implementations for nxschema-cli

pub mod convert;
pub mod print_config;
pub mod sync;

pub use convert::run_convert;
pub use print_config::run_print_config;
pub use sync::{run_check, run_sync};
