//! Web server command.

use console::style;

use wikilinker::config::Config;

use crate::cli::icons::{arrow, warning};

/// Default port when the bind address names only a host.
const DEFAULT_PORT: u16 = 3030;

/// Start the web server.
pub async fn cmd_serve(config: &Config, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    if config.llm.default_api_key().is_none() {
        println!(
            "{} No default API key configured; requests must carry credentials",
            warning()
        );
    }

    println!(
        "{} Starting wikilinker server at http://{}:{}",
        arrow(),
        host,
        port
    );
    println!("  {} POST /api/generate, GET /api/result", style("→").dim());
    println!("  Press Ctrl+C to stop");

    wikilinker::server::serve(config, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Bind address is empty");
    }

    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
        if !host.is_empty() && !host.contains(':') {
            anyhow::bail!("Invalid port in bind address: {}", bind);
        }
    }

    Ok((bind.to_string(), DEFAULT_PORT))
}
