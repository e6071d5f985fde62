use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::modules::auth::CredentialStore;

/// Periodically purges expired verification codes and refresh tokens.
/// Lookups already ignore expired rows; this only bounds table growth.
pub struct CredentialSweeper {
    store: Arc<dyn CredentialStore>,
    check_interval: Duration,
}

impl CredentialSweeper {
    pub fn new(store: Arc<dyn CredentialStore>, check_interval: Duration) -> Self {
        Self {
            store,
            check_interval,
        }
    }

    /// Background loop. Runs until the task is aborted.
    pub async fn run(&self) {
        tracing::info!(interval_secs = self.check_interval.as_secs(), "credential sweeper started");
        let mut tick = interval(self.check_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tick.tick().await;
            self.sweep_once().await;
        }
    }

    pub async fn sweep_once(&self) -> u64 {
        match self.store.delete_expired().await {
            Ok(0) => 0,
            Ok(removed) => {
                tracing::info!(removed, "purged expired credentials");
                removed
            }
            Err(e) => {
                tracing::error!(error = %e, "credential sweep failed");
                0
            }
        }
    }
}

/// Spawns the sweeper unless the interval is zero.
pub fn spawn_credential_sweeper(
    store: Arc<dyn CredentialStore>,
    every_minutes: u64,
) -> Option<tokio::task::JoinHandle<()>> {
    if every_minutes == 0 {
        tracing::info!("credential sweeper disabled");
        return None;
    }

    let sweeper = CredentialSweeper::new(store, Duration::from_secs(every_minutes * 60));
    Some(tokio::spawn(async move { sweeper.run().await }))
}
