//! Startup probe and shutdown handshake for the transcode subsystem.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::capabilities;
use super::config::TranscodeConfig;
use super::factory::TranscoderFactory;
use super::registry::CapabilityRegistry;

type StopRequest = oneshot::Sender<()>;

/// Owns the capability registry and the probe that fills it.
///
/// `start` returns immediately; the probe runs in the background and the registry reads
/// as disabled until it settles. In-flight transcodes belong to their callers and are not
/// tracked here.
pub struct TranscodeManager {
    config: Arc<TranscodeConfig>,
    registry: Arc<CapabilityRegistry>,
}

impl TranscodeManager {
    /// Creates a manager with an unsettled registry.
    pub fn new(config: TranscodeConfig) -> Self {
        Self::with_registry(config, Arc::new(CapabilityRegistry::new()))
    }

    /// Creates a manager that publishes into an existing registry.
    pub fn with_registry(config: TranscodeConfig, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            registry,
        }
    }

    pub fn registry(&self) -> Arc<CapabilityRegistry> {
        Arc::clone(&self.registry)
    }

    /// A factory reading from this manager's registry.
    pub fn factory(&self) -> TranscoderFactory {
        TranscoderFactory::new(Arc::clone(&self.registry), Arc::clone(&self.config))
    }

    /// Runs the probe inline and publishes the result.
    ///
    /// Returns false if the registry had already been settled, in which case the new
    /// result is discarded.
    pub async fn probe_now(&self) -> bool {
        run_probe(&self.config, &self.registry).await
    }

    /// Spawns the manager task, which launches the probe and then waits for a stop request.
    pub fn start(&self) -> TranscodeManagerHandle {
        let (stop_tx, stop_rx) = mpsc::channel(1);
        let task = tokio::spawn(run(
            Arc::clone(&self.config),
            Arc::clone(&self.registry),
            stop_rx,
        ));

        TranscodeManagerHandle { stop_tx, task }
    }
}

async fn run_probe(config: &TranscodeConfig, registry: &CapabilityRegistry) -> bool {
    let capabilities = capabilities::probe(config).await;
    let enabled = capabilities.is_enabled();
    let codecs = capabilities.codecs().len();

    if !registry.publish(capabilities) {
        warn!("Transcode capabilities already published, ignoring probe result");
        return false;
    }

    if enabled {
        info!("Transcoding ready ({} codecs available)", codecs);
    } else {
        info!("Transcoding disabled");
    }
    true
}

async fn run(
    config: Arc<TranscodeConfig>,
    registry: Arc<CapabilityRegistry>,
    mut stop_rx: mpsc::Receiver<StopRequest>,
) {
    info!("Starting transcode manager");

    tokio::spawn(async move {
        run_probe(&config, &registry).await;
    });

    match stop_rx.recv().await {
        Some(ack) => {
            info!("Transcode manager stopped");
            let _ = ack.send(());
        }
        None => {
            info!("Transcode manager handle dropped, stopping");
        }
    }
}

/// Handle for stopping a running [`TranscodeManager`].
pub struct TranscodeManagerHandle {
    stop_tx: mpsc::Sender<StopRequest>,
    task: JoinHandle<()>,
}

impl TranscodeManagerHandle {
    /// Asks the manager to stop and waits until it acknowledges.
    pub async fn stop(self) {
        let (ack_tx, ack_rx) = oneshot::channel();

        if self.stop_tx.send(ack_tx).await.is_err() {
            warn!("Transcode manager already stopped");
        } else if ack_rx.await.is_err() {
            warn!("Transcode manager exited without acknowledging stop");
        }

        let _ = self.task.await;
    }
}
