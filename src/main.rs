use clap::Parser;
use collection_store::config::ServerConfig;
use collection_store::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    logging::init(config.log_format);
    server::serve(config).await
}
