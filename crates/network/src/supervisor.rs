use crate::NetworkStatus;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Port implemented by a venue session
///
/// `start_session` must be idempotent: a flapping connection re-invokes it
/// on every transition back into `Connected`.
#[async_trait]
pub trait ConnectionHandler: Send + Sync {
    /// Cheap liveness probe against the venue
    ///
    /// `Ok` means connected. An error means the probe itself broke, which is
    /// treated as more severe than a timeout.
    async fn check_connection(&self) -> anyhow::Result<()>;

    /// Invoked on the transition into `Connected`
    async fn start_session(&self);

    /// Invoked on the transition out of `Connected`, and once more on `stop`
    async fn stop_session(&self);
}

/// Probe cadence and timeouts
#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    /// Delay between probes while things are healthy or merely timing out
    pub check_interval: Duration,
    /// Upper bound on a single probe
    pub check_timeout: Duration,
    /// Delay after a probe returns an error (not a timeout)
    pub error_backoff: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            check_interval: Duration::from_secs(10),
            check_timeout: Duration::from_secs(5),
            error_backoff: Duration::from_secs(30),
        }
    }
}

/// Owns the connectivity state machine for one venue session
///
/// A spawned loop probes the handler each cycle; status transitions and the
/// session start/stop hooks happen only inside that loop (plus the forced
/// final `stop_session` on [`stop`](Self::stop)).
pub struct ConnectionSupervisor {
    name: String,
    handler: Arc<dyn ConnectionHandler>,
    config: SupervisorConfig,
    status: Arc<RwLock<NetworkStatus>>,
    loop_task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionSupervisor {
    pub fn new(name: impl Into<String>, handler: Arc<dyn ConnectionHandler>) -> Self {
        Self::with_config(name, handler, SupervisorConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        handler: Arc<dyn ConnectionHandler>,
        config: SupervisorConfig,
    ) -> Self {
        ConnectionSupervisor {
            name: name.into(),
            handler,
            config,
            status: Arc::new(RwLock::new(NetworkStatus::Stopped)),
            loop_task: Mutex::new(None),
        }
    }

    /// Current connectivity state, readable from any task
    pub fn status(&self) -> NetworkStatus {
        *self.status.read()
    }

    /// Spawn the supervision loop. No-op if it is already running.
    pub fn start(&self) {
        let mut loop_task = self.loop_task.lock();
        if loop_task.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        *self.status.write() = NetworkStatus::NotConnected;
        let name = self.name.clone();
        let handler = Arc::clone(&self.handler);
        let status = Arc::clone(&self.status);
        let config = self.config;
        tracing::info!(session = %self.name, "connection supervisor started");
        *loop_task = Some(tokio::spawn(async move {
            run_loop(name, handler, status, config).await;
        }));
    }

    /// Abort the loop (cancelling any in-flight probe), force a final
    /// `stop_session`, and settle in `Stopped`
    pub async fn stop(&self) {
        let task = self.loop_task.lock().take();
        if let Some(task) = task {
            task.abort();
            let _ = task.await;
        }
        *self.status.write() = NetworkStatus::Stopped;
        self.handler.stop_session().await;
        tracing::info!(session = %self.name, "connection supervisor stopped");
    }
}

async fn run_loop(
    name: String,
    handler: Arc<dyn ConnectionHandler>,
    status: Arc<RwLock<NetworkStatus>>,
    config: SupervisorConfig,
) {
    loop {
        let probe = tokio::time::timeout(config.check_timeout, handler.check_connection()).await;
        let (new_status, delay) = match probe {
            Ok(Ok(())) => (NetworkStatus::Connected, config.check_interval),
            Ok(Err(error)) => {
                // Probe failed outright: bug or protocol break, back off hard
                tracing::error!(session = %name, %error, "connection check failed");
                (NetworkStatus::NotConnected, config.error_backoff)
            }
            Err(_) => {
                tracing::warn!(
                    session = %name,
                    timeout = ?config.check_timeout,
                    "connection check timed out"
                );
                (NetworkStatus::NotConnected, config.check_interval)
            }
        };

        let previous = {
            let mut current = status.write();
            let previous = *current;
            *current = new_status;
            previous
        };
        if previous != NetworkStatus::Connected && new_status == NetworkStatus::Connected {
            tracing::info!(session = %name, "connection established");
            handler.start_session().await;
        } else if previous == NetworkStatus::Connected && new_status != NetworkStatus::Connected {
            tracing::warn!(session = %name, "connection lost");
            handler.stop_session().await;
        }

        tokio::time::sleep(delay).await;
    }
}
