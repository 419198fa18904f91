use wheelhub::{ServerConfig, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wheelhub=info,tower_http=info".into()),
        )
        .init();

    let mut config = ServerConfig::default();
    if let Ok(bind) = std::env::var("WHEELHUB_BIND") {
        config.bind = bind;
    }
    if let Ok(host) = std::env::var("WHEELHUB_TELEMETRY_HOST") {
        config.telemetry_host = host;
    }
    if let Ok(port) = std::env::var("WHEELHUB_TELEMETRY_PORT") {
        config.telemetry_port = port.parse()?;
    }

    run_server(config).await
}
