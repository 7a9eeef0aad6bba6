//! Periodic publish sweep using tokio-cron-scheduler.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use cadence_core::services::SchedulingEngine;

use super::SchedulerConfig;

/// Runs [`SchedulingEngine::sweep`] on a fixed interval until shut down.
pub struct SweepScheduler {
    inner: JobScheduler,
    config: SchedulerConfig,
}

impl SweepScheduler {
    /// Create the scheduler and register the sweep job.
    pub async fn new(
        config: SchedulerConfig,
        engine: Arc<SchedulingEngine>,
    ) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;

        let job = Job::new_repeated_async(config.interval, move |_uuid, _lock| {
            let engine = engine.clone();
            Box::pin(async move {
                // Outcome is logged by the engine; a failed tick is retried next interval.
                engine.sweep().await;
            })
        })?;

        let id = inner.add(job).await?;
        tracing::info!(
            interval_secs = config.interval.as_secs(),
            job_id = %id,
            "Publish sweep registered"
        );

        Ok(Self { inner, config })
    }

    /// Start ticking. No-op when the sweep is disabled.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        if !self.config.enabled {
            tracing::info!("Publish sweep disabled");
            return Ok(());
        }

        self.inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(())
    }

    /// Stop ticking. A sweep already in flight finishes on its own.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}
