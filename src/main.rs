use goshs::config::Config;
use goshs::privilege::{self, DropOutcome, PrivilegeDrop};
use goshs::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    logging::init(cfg.debug);

    let listener = server::listener::bind(&cfg).await?;

    if let Some(user) = cfg.drop_user.as_deref() {
        match privilege::platform().drop_to(user) {
            Ok(DropOutcome::Dropped { .. }) => {}
            Ok(DropOutcome::Unsupported) => {
                tracing::warn!("Continuing as the current user");
            }
            Err(err) => {
                tracing::error!("Fatal: {}", err);
                std::process::exit(1);
            }
        }
    }

    let services = server::listener::services(&cfg);

    tokio::select! {
        res = server::listener::serve(listener, services) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
