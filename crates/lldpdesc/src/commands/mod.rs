//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod decode;
pub mod sync;
