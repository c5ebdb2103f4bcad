use clap::Parser;

#[derive(Debug, Parser)]
#[clap(name = "threebar", version)]
pub struct Cli {
    /// Watch the A.* feed as well, which can overwhelm and back up during
    /// active times
    #[clap(long, short = 'a')]
    pub all: bool,

    /// Print debug messages
    #[clap(long)]
    pub debug: bool,
}
