#![cfg(test)]
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use reactorctl_common::config::{Credentials, ExecMode};
use reactorctl_common::device::Device;
use reactorctl_common::range;
use reactorctl_core::executor::{self, DeviceAction};
use reactorctl_core::ops::{self, ExecuteCommand, OpsError, UploadFile};
use reactorctl_core::session::SessionFactory;
use reactorctl_core::session::mock::{Script, ScriptedFactory};

fn credentials() -> Credentials {
    Credentials {
        username: "reactor".to_string(),
        password: "grow".to_string(),
    }
}

fn device(hostname: &str, last_octet: u8) -> Device {
    Device::new(
        hostname,
        IpAddr::V4(Ipv4Addr::new(192, 168, 1, last_octet)),
        9000,
    )
}

fn fleet() -> Vec<Device> {
    vec![device("alpha1", 11), device("beta2", 12), device("gamma3", 13)]
}

#[tokio::test]
async fn command_fans_out_to_every_device() {
    let factory = Arc::new(
        ScriptedFactory::new()
            .script("alpha1", Script::Healthy { stdout: "up 1 day".to_string() })
            .script("beta2", Script::Healthy { stdout: "up 2 days".to_string() })
            .script("gamma3", Script::Healthy { stdout: "up 3 days".to_string() }),
    );
    let log = factory.log();

    let action: Arc<dyn DeviceAction> =
        Arc::new(ExecuteCommand::new(factory, credentials(), "uptime"));
    let results = executor::run_all(&fleet(), action, ExecMode::Sequential).await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.success));
    assert_eq!(results[0].message, "up 1 day");

    let log = log.lock().unwrap();
    assert_eq!(log.commands.len(), 3);
    assert!(log.commands.iter().all(|(_, cmd)| cmd == "uptime"));
}

#[tokio::test]
async fn unreachable_device_does_not_block_siblings() {
    for mode in [ExecMode::Sequential, ExecMode::Parallel { workers: None }] {
        let factory = Arc::new(
            ScriptedFactory::new().script("beta2", Script::Unreachable),
        );

        let action: Arc<dyn DeviceAction> =
            Arc::new(ExecuteCommand::new(factory, credentials(), "uptime"));
        let results = executor::run_all(&fleet(), action, mode).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.success).count(), 2);
        let down: Vec<&str> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.device.hostname.as_str())
            .collect();
        assert_eq!(down, ["beta2"]);
    }
}

#[tokio::test]
async fn parallel_and_sequential_agree_on_the_result_set() {
    let scripted = || {
        Arc::new(
            ScriptedFactory::new()
                .script("alpha1", Script::Healthy { stdout: "ok".to_string() })
                .script("beta2", Script::Faulty { stderr: "sensor fault".to_string() })
                .script("gamma3", Script::Healthy { stdout: "ok".to_string() }),
        )
    };

    let sequential = executor::run_all(
        &fleet(),
        Arc::new(ExecuteCommand::new(scripted(), credentials(), "status")),
        ExecMode::Sequential,
    )
    .await;
    let parallel = executor::run_all(
        &fleet(),
        Arc::new(ExecuteCommand::new(scripted(), credentials(), "status")),
        ExecMode::Parallel { workers: Some(2) },
    )
    .await;

    let as_set = |results: &[executor::OperationResult]| {
        let mut pairs: Vec<(String, bool)> = results
            .iter()
            .map(|r| (r.device.hostname.clone(), r.success))
            .collect();
        pairs.sort();
        pairs
    };

    assert_eq!(as_set(&sequential), as_set(&parallel));

    // Sequential mode additionally promises device-list order.
    let order: Vec<&str> = sequential
        .iter()
        .map(|r| r.device.hostname.as_str())
        .collect();
    assert_eq!(order, ["alpha1", "beta2", "gamma3"]);
}

#[tokio::test]
async fn upload_preflight_never_contacts_devices() {
    let factory = Arc::new(ScriptedFactory::new());

    let result = UploadFile::new(
        Arc::clone(&factory) as Arc<dyn SessionFactory>,
        credentials(),
        "/definitely/not/here.yaml",
        "/tmp/target.yaml",
    );

    assert!(matches!(result, Err(OpsError::LocalFileMissing(_))));
    assert_eq!(factory.connect_count(), 0);
}

#[tokio::test]
async fn recipe_load_targets_the_fixed_destination() {
    let recipe = tempfile::NamedTempFile::new().unwrap();
    let factory = Arc::new(ScriptedFactory::new());
    let log = factory.log();

    let action = ops::load_recipe(
        Arc::clone(&factory) as Arc<dyn SessionFactory>,
        credentials(),
        recipe.path().to_path_buf(),
    )
    .unwrap();

    let results = executor::run_all(&fleet(), Arc::new(action), ExecMode::Sequential).await;
    assert!(results.iter().all(|r| r.success));

    let log = log.lock().unwrap();
    assert_eq!(log.uploads.len(), 3);
    assert!(
        log.uploads
            .iter()
            .all(|(_, _, remote)| remote.to_str() == Some(ops::recipe::RECIPE_DEST))
    );
}

#[tokio::test]
async fn firmware_pipeline_short_circuits_failed_uploads() {
    let staging = tempfile::tempdir().unwrap();
    let archive = staging.path().join("reactor-fw.tar.gz");
    std::fs::write(&archive, b"firmware bytes").unwrap();

    let factory = Arc::new(
        ScriptedFactory::new()
            .script("alpha1", Script::Healthy { stdout: "installed".to_string() })
            .script("gamma3", Script::Faulty { stderr: "disk full".to_string() }),
    );
    let log = factory.log();

    let action: Arc<dyn DeviceAction> = Arc::from(
        ops::update_firmware(
            Arc::clone(&factory) as Arc<dyn SessionFactory>,
            credentials(),
            Some(archive),
        )
        .unwrap(),
    );

    let devices = vec![device("alpha1", 11), device("gamma3", 13)];
    let results = executor::run_all(&devices, action, ExecMode::Sequential).await;

    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[1].message.contains("upload archive"));

    let log = log.lock().unwrap();
    // Upload was attempted everywhere; the installer only ran where the
    // upload landed.
    assert_eq!(log.uploads.len(), 2);
    let installed_on: Vec<&str> = log.commands.iter().map(|(host, _)| host.as_str()).collect();
    assert_eq!(installed_on, ["alpha1"]);
    assert!(
        log.commands[0]
            .1
            .contains("/home/reactor/firmware/reactor-fw.tar.gz")
    );
}

#[tokio::test]
async fn range_selects_the_fleet_subset_end_to_end() {
    let selected = range::parse_range("1,3").unwrap();
    let targets = range::filter_by_ordinal(fleet(), &selected);
    let names: Vec<&str> = targets.iter().map(|d| d.hostname.as_str()).collect();
    assert_eq!(names, ["alpha1", "gamma3"]);

    let factory = Arc::new(
        ScriptedFactory::new()
            .script("alpha1", Script::Healthy { stdout: "ok".to_string() })
            .script("gamma3", Script::Faulty { stderr: "pump jammed".to_string() }),
    );

    let action: Arc<dyn DeviceAction> =
        Arc::new(ExecuteCommand::new(factory, credentials(), "status"));
    let results = executor::run_all(&targets, action, ExecMode::Sequential).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].device.hostname, "alpha1");
    assert!(results[0].success);
    assert_eq!(results[1].device.hostname, "gamma3");
    assert!(!results[1].success);
    assert!(results[1].message.contains("pump jammed"));
}
