//! Self-check that polls the server's own landing page until it answers.

use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::ReadinessConfig;

/// How a probe run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    Ready { attempts: u32 },
    GaveUp { attempts: u32 },
    Cancelled { attempts: u32 },
}

/// Polls `url` every `interval` until a 2xx, `max_attempts` or cancellation.
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    url: String,
    interval: Duration,
    max_attempts: u32,
    request_timeout: Duration,
}

impl ReadinessProbe {
    pub fn new(
        url: impl Into<String>,
        interval: Duration,
        max_attempts: u32,
        request_timeout: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            interval,
            max_attempts,
            request_timeout,
        }
    }

    pub fn from_config(config: &ReadinessConfig, host: &str, port: u16) -> Self {
        Self::new(
            format!("http://{host}:{port}/"),
            Duration::from_millis(config.interval_ms),
            config.max_attempts,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Runs the probe on a background task.
    pub fn spawn(self) -> ReadinessHandle {
        let (cancel, cancelled) = watch::channel(false);
        let task = tokio::spawn(self.run(cancelled));
        ReadinessHandle { cancel, task }
    }

    /// Runs the probe to completion. A `true` on `cancelled`, or dropping its
    /// sender, stops it at the next await point.
    pub async fn run(self, mut cancelled: watch::Receiver<bool>) -> ReadinessOutcome {
        info!(url = %self.url, "INIT - Initializing readiness probe");

        let client = match Client::builder().timeout(self.request_timeout).build() {
            Ok(client) => client,
            Err(err) => {
                error!(%err, "Could not build readiness HTTP client");
                return ReadinessOutcome::GaveUp { attempts: 0 };
            }
        };

        let mut attempts = 0;
        while attempts < self.max_attempts {
            if *cancelled.borrow() {
                return ReadinessOutcome::Cancelled { attempts };
            }
            attempts += 1;
            info!(attempt = attempts, url = %self.url, "Checking server readiness");

            tokio::select! {
                result = client.get(&self.url).send() => match result {
                    Ok(response) if response.status().is_success() => {
                        info!(url = %self.url, attempts, "INIT - Pan-Tort server started");
                        return ReadinessOutcome::Ready { attempts };
                    }
                    Ok(response) => {
                        info!(status = response.status().as_u16(), "INIT - Server not ready yet");
                    }
                    Err(err) => {
                        info!(%err, "INIT - Server not yet started");
                    }
                },
                _ = cancelled.changed() => return ReadinessOutcome::Cancelled { attempts },
            }

            if attempts == self.max_attempts {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancelled.changed() => return ReadinessOutcome::Cancelled { attempts },
            }
        }

        error!(url = %self.url, attempts, "Server did not become ready, giving up");
        ReadinessOutcome::GaveUp { attempts }
    }
}

/// Handle to a spawned probe. Dropping it cancels the probe.
pub struct ReadinessHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<ReadinessOutcome>,
}

impl ReadinessHandle {
    pub fn cancel(&self) {
        // Receiver gone means the probe already finished
        let _ = self.cancel.send(true);
    }

    /// Waits for the probe to end. A panicked or aborted task counts as cancelled.
    pub async fn wait(self) -> ReadinessOutcome {
        let ReadinessHandle { cancel, task } = self;
        let outcome = task
            .await
            .unwrap_or(ReadinessOutcome::Cancelled { attempts: 0 });
        drop(cancel);
        outcome
    }
}
