use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use graphdot::{Cli, run_main};
use graphdot_core::{CachingResolver, GoListResolver, Result};

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    let opts = args.to_options(std::env::current_dir()?);
    let resolver = CachingResolver::new(GoListResolver::new(args.go.clone()));
    tracing::debug!(go = %resolver.inner().go_binary().display(), "resolver");

    let output = run_main(&opts, &resolver)?;
    tracing::info!(packages = resolver.cached(), "resolved");

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!(path = %path.display(), "output written");
    } else {
        print!("{output}");
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

pub fn main() -> ExitCode {
    let args = Cli::parse();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, "execution failed");
            ExitCode::from(e.exit_code())
        }
    }
}
