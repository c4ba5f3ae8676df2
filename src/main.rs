use clap::Parser;
use recall::{Cli, Commands, Config, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `init` must work even when the config it is about to create is absent.
    let config_source = match cli.command {
        Commands::Init => None,
        _ => Config::locate(cli.config.as_deref()),
    };
    let config = Config::load(config_source.as_deref())?;
    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(cli, config, config_source))
}
