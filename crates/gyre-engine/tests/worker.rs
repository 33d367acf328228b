use std::fs;
use std::io::Write;

use gyre_core::Options;
use gyre_engine::{DistributedWorker, DriverError, EnsembleConfig, RedirectedOutput, WorkerRank};

fn shared() -> Options {
    Options::parse("-tfinal=1 -samples=10 -skip=4")
}

#[test]
fn each_worker_writes_its_own_file() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("gyrons");
    fs::write(dir.path().join("gyrons-0"), "-qu=0.1\n-qu=0.2\n").unwrap();
    fs::write(dir.path().join("gyrons-1"), "# second shard\n-qu=0.3\n").unwrap();

    // Run rank 1 first: order must not matter.
    for rank in [1, 0] {
        let worker = DistributedWorker::new(
            &prefix,
            WorkerRank::new(rank, 2).unwrap(),
            EnsembleConfig::default(),
        );
        let status = worker.run(&shared()).unwrap();
        assert!(status.is_success());
        assert_eq!(status.tasks, 2 - rank);
    }

    let out0 = fs::read_to_string(dir.path().join("gyrons-0.out")).unwrap();
    let out1 = fs::read_to_string(dir.path().join("gyrons-1.out")).unwrap();
    for (text, tasks) in [(&out0, 2), (&out1, 1)] {
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("# gyre -- "));
        assert_eq!(lines[2], "# args: -tfinal=1 -samples=10 -skip=4");
        assert_eq!(text.matches("# fields: ").count(), tasks);
        // skip=4 over 11 observations: t = 0, 0.5, 1.0.
        assert_eq!(
            lines.iter().filter(|l| !l.starts_with('#')).count(),
            3 * tasks
        );
    }
    assert!(out1.contains("# task 0: -qu=0.3\n"));
}

#[test]
fn missing_shard_is_fatal_and_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let worker = DistributedWorker::new(
        dir.path().join("absent"),
        WorkerRank::singleton(),
        EnsembleConfig::default(),
    );
    let err = worker.run(&shared()).unwrap_err();
    match &err {
        DriverError::Resource { path, .. } => assert_eq!(path, &dir.path().join("absent-0")),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);
    assert!(!worker.output_path().exists());
}

#[test]
fn task_failure_still_closes_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("mixed");
    fs::write(dir.path().join("mixed-0"), "-qu=0.1\n-pusher=none\n-qu=0.2\n").unwrap();
    let worker = DistributedWorker::new(&prefix, WorkerRank::singleton(), EnsembleConfig::default());
    let status = worker.run(&shared()).unwrap();
    assert_eq!(status.exit_code(), 1);
    let text = fs::read_to_string(worker.output_path()).unwrap();
    assert!(text.contains("# task 1 failed: "));
    assert!(text.contains("# task 2: -qu=0.2\n"));
}

#[test]
fn redirected_output_flushes_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.out");
    {
        let mut output = RedirectedOutput::create(&path).unwrap();
        writeln!(output.writer().unwrap(), "# partial").unwrap();
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "# partial\n");
}

#[test]
fn unwritable_output_is_a_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RedirectedOutput::create(dir.path().join("no/such/dir/out")).err();
    assert!(matches!(err, Some(DriverError::Resource { .. })));
}
