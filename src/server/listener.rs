use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::files::FileHandler;
use crate::http::connection::{Connection, Services};
use crate::inspect::RequestLogger;

pub async fn bind(cfg: &Config) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!(
        "Serving {} on http://{}",
        cfg.files.root.display(),
        listener.local_addr()?
    );
    Ok(listener)
}

pub fn services(cfg: &Config) -> Arc<Services> {
    Arc::new(Services {
        files: FileHandler::new(cfg.files.clone()),
        logger: RequestLogger::new(cfg.verbose),
    })
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, services: Arc<Services>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        tracing::debug!("Accepted connection from {}", peer);

        let services = services.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, peer, services);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
