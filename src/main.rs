mod cli;
mod commands;

use anyhow::Context;
use padfind::config::RcLoader;
use padfind::view::MatchListView;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("padfind=warn");
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .with_context(|| format!("invalid log level '{log_directive}'"))?,
            ),
        )
        .init();

    // Load RC configuration, preferring an explicit --config path
    let config = match &args.config {
        Some(path) => RcLoader::load_from(path)?,
        None => RcLoader::load_config(),
    };

    let width = crossterm::terminal::size()
        .map(|(columns, _)| usize::from(columns))
        .unwrap_or(100);
    let view = MatchListView::new(width, io::stdout().is_terminal());

    let mut stdout = io::stdout().lock();
    commands::run(&args.command, &config, view, &mut stdout)
}
