use clap::Parser;
use tradeledger::cli::{Cli, load_config, run};
use tradeledger::logging::init_tracing;
use tradeledger::ports::config_port::ConfigPort;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let level = config.get_string_or("logging", "level", "info");
    let format = config.get_string_or("logging", "format", "text");
    let ansi = config.get_bool("logging", "ansi", true);
    if let Err(e) = init_tracing(&level, &format, ansi) {
        eprintln!("error: {e}");
        return std::process::ExitCode::from(2);
    }

    run(cli.command, &config)
}
