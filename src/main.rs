use exec_worker::telemetry::setup_tracing;
use exec_worker::Config;

use std::env;
use std::io::Write;

use anyhow::Result;
use dotenv::dotenv;
use tracing::{error, info};

const CONFIG_PATH: &str = "exec-worker.toml";

#[tracing::instrument(err)]
fn load_config() -> Result<Config> {
    let path = env::current_dir()?.join(CONFIG_PATH);

    info!("loading config from {}", path.display());
    let config = Config::from_file(&path)?;
    info!("config is loaded:\n{:#?}", config);

    Ok(config)
}

async fn run() -> Result<i32> {
    let config = load_config()?;
    let rendered = exec_worker::run(config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(rendered.text.as_bytes())?;
    if !rendered.text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(rendered.exit_status)
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    setup_tracing();

    let status = match run().await {
        Ok(status) => status,
        Err(err) => {
            error!("{:?}", err);
            1
        }
    };

    std::process::exit(status);
}
