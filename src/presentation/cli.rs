// Command line arguments
use crate::infrastructure::config::{RunArgs, DEFAULT_SOURCE_PATH};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "grafana-deploy",
    version,
    about = "Deploys dashboards from a folder tree to grafana",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // deploy is the default command, so its flags are also accepted without naming it
    #[command(flatten)]
    deploy: DeployArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deploys to grafana
    Deploy(DeployArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Performs a dry run of the deployment
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Specifies the source path to deploy
    #[arg(short = 's', long = "sourcePath", value_name = "path", default_value = DEFAULT_SOURCE_PATH)]
    source_path: PathBuf,
}

impl Cli {
    pub fn into_run_args(self) -> RunArgs {
        let args = match self.command {
            Some(Command::Deploy(args)) => args,
            None => self.deploy,
        };

        RunArgs {
            source_path: args.source_path,
            dry_run: args.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunArgs {
        Cli::try_parse_from(args).unwrap().into_run_args()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&["grafana-deploy"]), RunArgs::default());
        assert_eq!(parse(&["grafana-deploy", "deploy"]), RunArgs::default());
    }

    #[test]
    fn test_deploy_flags() {
        let expected = RunArgs {
            source_path: PathBuf::from("dashboards"),
            dry_run: true,
        };
        assert_eq!(
            parse(&["grafana-deploy", "deploy", "--dry-run", "--sourcePath", "dashboards"]),
            expected
        );
        assert_eq!(parse(&["grafana-deploy", "-d", "-s", "dashboards"]), expected);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["grafana-deploy", "--force"]).is_err());
    }
}
