// src/main.rs

use jorun::host::Shutdown;
use jorun::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(Shutdown::Normal) => {}
        Ok(Shutdown::Interrupted) => std::process::exit(130),
        Err(err) => {
            eprintln!("jorun error: {err}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> jorun::errors::Result<Shutdown> {
    let args = cli::parse();
    logging::init_logging(args.level).map_err(jorun::errors::JorunError::Other)?;
    run(args).await
}
