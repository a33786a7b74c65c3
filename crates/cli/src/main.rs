use clap::Parser;
use dns_intercept_domain::CliOverrides;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dns-intercept")]
#[command(version)]
#[command(about = "DNS Intercept - answers matching queries from local policy")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Intercept directive file, replacing `intercept.rules_file`
    #[arg(short = 'r', long, value_name = "FILE")]
    rules: Option<String>,

    /// Validate configuration and rules, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        rules_file: cli.rules.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting DNS Intercept v{}", env!("CARGO_PKG_VERSION"));

    let services = di::InterceptServices::new(&config).map_err(|e| {
        error!(error = %e, "Failed to load intercept rules");
        e
    })?;

    if cli.check {
        info!(
            rules = services.rules,
            policies = services.policies,
            "Configuration is valid"
        );
        return Ok(());
    }

    let bind_ip: IpAddr = config.server.bind_address.parse()?;
    let dns_addr = SocketAddr::new(bind_ip, config.server.dns_port);
    server::start_dns_server(
        dns_addr,
        services.handler,
        Duration::from_secs(config.server.tcp_timeout_secs),
    )
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
