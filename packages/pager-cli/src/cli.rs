pub(crate) use crate::commands::{check, page};
use clap::{Parser, Subcommand};
use pager_lib::config::PagerArgs;

#[derive(Parser, Debug)]
#[clap(
    name = "pager",
    about = "Seek-based cursor pagination over relational associations",
    version,
    rename_all = "kebab-case"
)]
pub struct Opt {
    #[clap(subcommand)]
    command: Pager,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Subcommand)]
pub enum Pager {
    /// Print one page of a configured relation as JSON.
    Page(page::Command),
    /// Check that the configured database is reachable.
    Check(PagerArgs),
}

pub async fn run_cli() -> anyhow::Result<()> {
    let opt = Opt::try_parse();

    match opt {
        Ok(opt) => match opt.command {
            Pager::Page(command) => page::exec(command).await,
            Pager::Check(args) => check::exec(args).await,
        },
        Err(e) => {
            // Prints the error and exits.
            e.exit()
        }
    }
}
