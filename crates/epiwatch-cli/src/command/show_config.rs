use std::path::PathBuf;

use clap::Args;

use crate::{command::config::ConfigArg, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct ShowConfigArg {
    #[clap(flatten)]
    pub config: ConfigArg,

    /// Output file path (default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ShowConfigArg) -> anyhow::Result<()> {
    let config = arg.config.resolve()?;
    util::save_json(&config, arg.output.as_deref())
}
