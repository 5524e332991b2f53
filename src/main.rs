#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mangodiag::cli::{Cli, execute};
use mangodiag::error::Error;
use mangodiag::report::render;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("error: {err:#}");
            let code = err.downcast_ref::<Error>().map(Error::exit_code).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = cli.load_settings()?;
    let invocation = cli.resolve(&settings)?;
    log::debug!("Running {:?} as {}", invocation.operation, invocation.format.label());

    let report = execute(&invocation)?;
    let output = render(&report, invocation.format);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes()).context("Failed to write report")?;
    stdout.flush().context("Failed to write report")?;
    Ok(())
}
