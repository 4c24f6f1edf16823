use deploy_fs::cli::{run, CliArgs};
use deploy_fs::util::logging::{self, LoggingConfig};
use deploy_fs::{FsConfig, HostFilesystem, VERSION};

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    let config = FsConfig::load();
    init_logging_from_args(&args, config.as_ref().ok());

    debug!("deploy-fs v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = run(&args, &HostFilesystem::new(), config);

    std::process::exit(exit_code);
}

/// Command-line flags override the level from `DEPLOY_FS_LOG_LEVEL`.
/// An invalid configuration logs at the default level; `run` reports it.
fn init_logging_from_args(args: &CliArgs, config: Option<&FsConfig>) {
    let mut logging_config = config
        .map(LoggingConfig::from_fs_config)
        .unwrap_or_default();

    if let Some(level_str) = &args.log_level {
        logging_config.level = logging::parse_level(level_str);
    } else if args.verbose {
        logging_config.level = Level::DEBUG;
    } else if args.quiet {
        logging_config.level = Level::ERROR;
    }

    logging::init_logging(logging_config);
}
