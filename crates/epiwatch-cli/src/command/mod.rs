use clap::{Parser, Subcommand};

use self::{analyze::AnalyzeArg, show_config::ShowConfigArg};

mod analyze;
mod config;
mod show_config;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Arguments of the default `analyze` mode
    #[clap(flatten)]
    analyze: AnalyzeArg,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the ICU occupancy analysis and render its charts (default)
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Print the effective analysis configuration as JSON
    ShowConfig(#[clap(flatten)] ShowConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Analyze(args.analyze)) {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::ShowConfig(arg) => show_config::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_runs_analyze() {
        let args = CommandArgs::try_parse_from(["epiwatch", "--subject", "Chile"]).unwrap();
        assert!(args.mode.is_none());
        assert_eq!(args.analyze.config.subject.as_deref(), Some("Chile"));
    }

    #[test]
    fn test_show_config_subcommand() {
        let args =
            CommandArgs::try_parse_from(["epiwatch", "show-config", "--percentile", "90"]).unwrap();
        let Some(Mode::ShowConfig(arg)) = args.mode else {
            panic!("expected show-config mode");
        };
        assert_eq!(arg.config.percentile, Some(90.0));
    }
}
