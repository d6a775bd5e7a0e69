// CLASSIFICATION: COMMUNITY
// Filename: dump_dir_config.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

use std::fs;

use serial_test::serial;
use tempfile::tempdir;
use tensordump::config::{LOAD_GRAPHS_ENV, PARALLEL_SCAN_ENV};
use tensordump::naming::encode_device;
use tensordump::{DumpDir, DumpDirBuilder, DumpDirConfig, DumpError};

fn device(i: usize) -> String {
    format!("/job:worker/replica:0/task:{i}/gpu:0")
}

#[test]
#[serial]
fn config_reads_environment() {
    std::env::set_var(PARALLEL_SCAN_ENV, "yes");
    std::env::set_var(LOAD_GRAPHS_ENV, "0");
    let cfg = DumpDirConfig::default();
    std::env::remove_var(PARALLEL_SCAN_ENV);
    std::env::remove_var(LOAD_GRAPHS_ENV);
    assert!(cfg.parallel_scan);
    assert!(!cfg.load_graphs);
}

#[test]
#[serial]
fn config_defaults_without_environment() {
    std::env::remove_var(PARALLEL_SCAN_ENV);
    std::env::set_var(LOAD_GRAPHS_ENV, "sometimes");
    let cfg = DumpDirConfig::default();
    std::env::remove_var(LOAD_GRAPHS_ENV);
    assert_eq!(
        cfg,
        DumpDirConfig {
            parallel_scan: false,
            load_graphs: true,
        }
    );
}

#[test]
#[serial]
fn parallel_scan_matches_sequential_scan() {
    let dir = tempdir().unwrap();
    for i in 0..8 {
        let device_dir = dir.path().join(encode_device(&device(i)));
        fs::create_dir_all(device_dir.join("scope")).unwrap();
        for step in 0..5u64 {
            let ts = 1_000 + step * 10 + i as u64;
            fs::write(device_dir.join(format!("scope/op_{i}_0_DebugIdentity_{ts}")), b"").unwrap();
        }
    }

    let build = |parallel_scan| {
        DumpDirBuilder::new(dir.path())
            .config(DumpDirConfig {
                parallel_scan,
                load_graphs: true,
            })
            .build()
            .unwrap()
    };
    let sequential = build(false);
    let parallel = build(true);

    assert_eq!(sequential.size(), 40);
    assert_eq!(sequential.devices(), parallel.devices());
    assert_eq!(sequential.dumped_tensor_data(), parallel.dumped_tensor_data());
    assert_eq!(parallel.t0(), Some(1_000));
}

#[test]
#[serial]
fn parallel_scan_reports_bad_file() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        let device_dir = dir.path().join(encode_device(&device(i)));
        fs::create_dir_all(&device_dir).unwrap();
        fs::write(device_dir.join("op_0_DebugIdentity_1"), b"").unwrap();
    }
    fs::write(
        dir.path().join(encode_device(&device(2))).join("op_DebugIdentity"),
        b"",
    )
    .unwrap();

    std::env::set_var(PARALLEL_SCAN_ENV, "1");
    let result = DumpDir::open(dir.path());
    std::env::remove_var(PARALLEL_SCAN_ENV);
    assert!(matches!(result, Err(DumpError::Format(_))));
}
