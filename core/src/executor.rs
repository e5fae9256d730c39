//! # Fan-Out Executor
//!
//! Runs one action against every selected device and reports exactly one
//! result per device. A failing device never aborts its siblings; the
//! caller always gets `devices.len()` results back.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use reactorctl_common::config::ExecMode;
use reactorctl_common::device::Device;
use reactorctl_common::{error, info};

/// One unit of work, invoked once per selected device.
///
/// `Ok` carries the success message, `Err` the failure text; either way
/// the executor turns the outcome into exactly one [`OperationResult`].
#[async_trait]
pub trait DeviceAction: Send + Sync {
    async fn run(&self, device: &Device) -> anyhow::Result<String>;
}

/// Outcome of one action on one device.
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub device: Device,
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    fn succeeded(device: Device, message: String) -> Self {
        Self { device, success: true, message }
    }

    fn failed(device: Device, message: String) -> Self {
        Self { device, success: false, message }
    }
}

/// Runs `action` against every device in `devices`.
///
/// Sequential mode awaits one device at a time in list order. Parallel
/// mode spawns one task per device behind a worker pool sized by
/// `ExecMode::Parallel { workers }`, defaulting to the device count.
/// Both modes return results in device order, one per device.
pub async fn run_all(
    devices: &[Device],
    action: Arc<dyn DeviceAction>,
    mode: ExecMode,
) -> Vec<OperationResult> {
    match mode {
        ExecMode::Sequential => run_sequential(devices, action).await,
        ExecMode::Parallel { workers } => run_parallel(devices, action, workers).await,
    }
}

async fn run_sequential(devices: &[Device], action: Arc<dyn DeviceAction>) -> Vec<OperationResult> {
    let mut results: Vec<OperationResult> = Vec::with_capacity(devices.len());
    for device in devices {
        results.push(run_one(device.clone(), action.as_ref()).await);
    }
    results
}

async fn run_parallel(
    devices: &[Device],
    action: Arc<dyn DeviceAction>,
    workers: Option<usize>,
) -> Vec<OperationResult> {
    let pool: usize = workers
        .unwrap_or(devices.len())
        .clamp(1, devices.len().max(1));
    let gate = Arc::new(Semaphore::new(pool));

    let handles: Vec<JoinHandle<OperationResult>> = devices
        .iter()
        .cloned()
        .map(|device| {
            let action = Arc::clone(&action);
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let _permit = gate
                    .acquire_owned()
                    .await
                    .expect("executor semaphore is never closed");
                run_one(device, action.as_ref()).await
            })
        })
        .collect();

    // Awaiting in submission order keeps the aggregate deterministic even
    // though completion order is not. A panicked worker still yields a
    // failed result for its device.
    let mut results: Vec<OperationResult> = Vec::with_capacity(devices.len());
    for (handle, device) in handles.into_iter().zip(devices.iter()) {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => results.push(OperationResult::failed(
                device.clone(),
                format!("worker crashed: {e}"),
            )),
        }
    }
    results
}

async fn run_one(device: Device, action: &dyn DeviceAction) -> OperationResult {
    match action.run(&device).await {
        Ok(message) => {
            info!("{device}: done");
            OperationResult::succeeded(device, message)
        }
        Err(e) => {
            error!("{device}: {e:#}");
            OperationResult::failed(device, format!("{e:#}"))
        }
    }
}

/// A sequence of named steps run per device, in order, skipping the
/// remaining steps as soon as one fails. The last step's message becomes
/// the device's result.
pub struct Pipeline {
    steps: Vec<Step>,
}

struct Step {
    name: &'static str,
    action: Box<dyn DeviceAction>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn step(mut self, name: &'static str, action: impl DeviceAction + 'static) -> Self {
        self.steps.push(Step { name, action: Box::new(action) });
        self
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceAction for Pipeline {
    async fn run(&self, device: &Device) -> anyhow::Result<String> {
        let mut message = String::new();
        for step in &self.steps {
            message = step
                .action
                .run(device)
                .await
                .map_err(|e| e.context(format!("step '{}'", step.name)))?;
        }
        Ok(message)
    }
}
