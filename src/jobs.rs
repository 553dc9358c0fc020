/// Background jobs
///
/// The actor weighted-rating refresh used to run inline on every actor
/// listing page view, N write calls per read. It is now a periodic sweep
/// so the read path only reads.
use crate::context::AppContext;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

/// Job scheduler for background tasks
pub struct JobScheduler {
    context: Arc<AppContext>,
}

impl JobScheduler {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    /// Start all background jobs
    pub fn start(self: Arc<Self>) {
        if self.context.config.jobs.actor_refresh_interval_secs == 0 {
            info!("Actor rating refresh job disabled");
            return;
        }

        tokio::spawn(Self::actor_rating_refresh_job(Arc::clone(&self)));
        info!("Background jobs started");
    }

    /// Periodically refresh actor weighted ratings, batch by batch
    async fn actor_rating_refresh_job(scheduler: Arc<Self>) {
        let config = &scheduler.context.config.jobs;
        let mut interval = interval(Duration::from_secs(config.actor_refresh_interval_secs));
        let batch_size = config.actor_refresh_batch_size;

        loop {
            interval.tick().await;
            info!("Running actor rating refresh");

            let mut offset = 0;
            let mut refreshed = 0usize;
            loop {
                match scheduler
                    .context
                    .actors
                    .refresh_ratings_batch(batch_size, offset)
                    .await
                {
                    Ok(0) => break,
                    Ok(count) => {
                        refreshed += count;
                        offset += batch_size;
                    }
                    Err(e) => {
                        // Abandon this sweep; the next tick starts over.
                        error!("Actor rating refresh failed at offset {}: {}", offset, e);
                        break;
                    }
                }
            }

            if refreshed > 0 {
                info!("Refreshed ratings for {} actors", refreshed);
            }
        }
    }
}
