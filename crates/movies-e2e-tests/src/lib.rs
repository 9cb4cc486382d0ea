pub mod rest;

use std::time::Duration;

use anyhow::{anyhow, Result};
use movies_server::config::{Parser, ServerConfig};
use rand::Rng as _;
use tempfile::TempDir;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix(format!("{}_", test_name))?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?;
    let port = port.to_string();
    let base_url = format!("http://localhost:{}/", port);
    let args = &[
        "movies-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
        "--base-url",
        &base_url,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

/// Builds state for given config, spawns the server and waits until it
/// answers on /health. Server runs until the test process ends.
pub async fn launch_env(args: ServerConfig) -> Result<reqwest::Client> {
    let base_url = args.base_url.clone();
    let state = movies_server::build_state(&args).await?;
    tokio::spawn(movies_server::run_graceful_with_state(
        args,
        state,
        futures::future::pending(),
    ));

    let client = reqwest::Client::new();
    let health_url = base_url.join("health")?;
    for _ in 0..100 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Ok(client),
            _ => tokio::time::sleep(Duration::from_millis(50)).await,
        }
    }
    Err(anyhow!("Server did not come up on {}", health_url))
}
