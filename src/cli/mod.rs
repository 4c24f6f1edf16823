pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, OutputFormatArg, StageArgs};
pub use handlers::{handle_config, handle_stage, run};
pub use output::{OutputFormat, OutputFormatter};
