//! Server command implementation

use anyhow::Result;
use sift_server::ServerConfig;

/// Start the HTTP API server
pub async fn cmd_serve(host: &str, port: u16, cors_origins: Vec<String>) -> Result<()> {
    println!("🚀 Starting Sift web server...");
    println!("   Listening: http://{}:{}", host, port);
    if cors_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS origins: {}", cors_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = ServerConfig {
        allowed_origins: cors_origins,
    };

    sift_server::serve_with_config(host, port, config).await?;

    Ok(())
}
