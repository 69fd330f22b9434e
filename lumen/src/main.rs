use clap::Parser;
use lumen::cli::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = lumen::run(cli) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
