use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stage deployment manifests through a substitutable filesystem layer
#[derive(Parser, Debug)]
#[command(
    name = "deploy-fs",
    about = "Collect deployment manifests and stage them into an output directory",
    version,
    author
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Collect manifests and stage them",
        long_about = "Reads a manifest file, or every .yaml/.yml/.json file in a directory, \
                      and writes copies into the output directory. Without --output a fresh \
                      directory is created under DEPLOY_FS_TEMP_ROOT.\n\n\
                      Examples:\n  \
                      deploy-fs stage ./k8s\n  \
                      deploy-fs stage ./k8s --output ./out\n  \
                      deploy-fs stage deployment.yaml --format json"
    )]
    Stage(StageArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct StageArgs {
    #[arg(value_name = "PATH", help = "Manifest file or directory")]
    pub path: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Output directory (must be missing or empty)"
    )]
    pub output: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stage() {
        let args = CliArgs::try_parse_from(["deploy-fs", "stage", "./k8s", "-o", "out"]).unwrap();

        match args.command {
            Commands::Stage(stage) => {
                assert_eq!(stage.path, PathBuf::from("./k8s"));
                assert_eq!(stage.output, Some(PathBuf::from("out")));
                assert_eq!(stage.format, OutputFormatArg::Human);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_json() {
        let args = CliArgs::try_parse_from(["deploy-fs", "config", "--format", "json"]).unwrap();

        assert!(matches!(
            args.command,
            Commands::Config(ConfigArgs {
                format: OutputFormatArg::Json
            })
        ));
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::try_parse_from(["deploy-fs", "config", "--log-level", "trace"]).unwrap();
        assert_eq!(args.log_level.as_deref(), Some("trace"));

        let args = CliArgs::try_parse_from(["deploy-fs", "-v", "config"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["deploy-fs", "-v", "-q", "config"]).is_err());
    }

    #[test]
    fn test_stage_requires_path() {
        assert!(CliArgs::try_parse_from(["deploy-fs", "stage"]).is_err());
    }
}
