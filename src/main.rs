use std::process::ExitCode;

use gif2header::config::parse_builtin_config;

fn run() -> eyre::Result<()> {
    let config = parse_builtin_config()?;
    let run_dir = std::env::current_dir()?;

    config.run(&run_dir)?;

    Ok(())
}

fn main() -> ExitCode {
    // Log to stderr, `RUST_LOG=debug` for more.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let err_exit = ExitCode::from(1);
    let ok_exit = ExitCode::from(0);

    match run() {
        Ok(_) => ok_exit,
        Err(err) => {
            log::error!("{:?}", err);
            err_exit
        }
    }
}
