use gyre_engine::{
    read_ensemble, EnsembleConfig, EnsembleStrategy, RunStatus, Sequential, Task, TaskError,
    TaskId, ThreadParallel,
};

const SHARED: &str = "-tfinal=1 -samples=20 -skip=3";

fn tasks(lines: &str) -> Vec<Task> {
    read_ensemble(lines.as_bytes()).unwrap()
}

fn run(strategy: &dyn EnsembleStrategy, tasks: &[Task]) -> (RunStatus, String) {
    let mut out = Vec::new();
    let status = strategy.run(SHARED, tasks, &mut out).unwrap();
    (status, String::from_utf8(out).unwrap())
}

/// Split output into task blocks, each starting at its `# task` line.
fn blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    for line in text.lines() {
        let starts_block = line.starts_with("# task ") && !line.contains(" failed: ");
        if starts_block || blocks.is_empty() {
            blocks.push(String::new());
        }
        if let Some(block) = blocks.last_mut() {
            block.push_str(line);
            block.push('\n');
        }
    }
    blocks.sort();
    blocks
}

fn parallel(threads: usize) -> ThreadParallel {
    ThreadParallel::new(EnsembleConfig {
        threads: Some(threads),
        ..EnsembleConfig::default()
    })
}

const ENSEMBLE: &str = "\
-qu=0.0 -pitch=0.1
-qu=0.1 -pitch=0.2
-qu=0.2 -pitch=0.3 -pusher=guiding-centre
-qu=0.3 -pitch=-0.4 -observer=region -qumax=0.3
-qu=0.4 -pitch=0.5 -pkin -pb
-qu=0.5 -pitch=0.6 -pusher=guiding-centre -stepper=heun
-qu=0.6 -pitch=0.7 -phires
-qu=0.7 -pitch=0.8
";

#[test]
fn sequential_is_idempotent() {
    let t = tasks(ENSEMBLE);
    let (first_status, first) = run(&Sequential::default(), &t);
    let (_, second) = run(&Sequential::default(), &t);
    assert!(first_status.is_success());
    assert_eq!(first, second);
}

#[test]
fn sequential_writes_blocks_in_input_order() {
    let t = tasks(ENSEMBLE);
    let (_, text) = run(&Sequential::default(), &t);
    let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("# task ")).collect();
    assert_eq!(headers.len(), 8);
    for (i, h) in headers.iter().enumerate() {
        assert!(h.starts_with(&format!("# task {i}: ")));
    }
}

#[test]
fn parallel_produces_the_same_blocks_as_sequential() {
    let t = tasks(ENSEMBLE);
    let (_, reference) = run(&Sequential::default(), &t);
    for threads in [1, 3, 8, 32] {
        let (status, text) = run(&parallel(threads), &t);
        assert!(status.is_success());
        assert_eq!(blocks(&text), blocks(&reference), "threads = {threads}");
    }
}

#[test]
fn malformed_line_fails_only_its_own_task() {
    let broken = ENSEMBLE.replace("-qu=0.2 -pitch=0.3", "-qu=zero -pitch=0.3");
    let good = tasks(ENSEMBLE);
    let bad = tasks(&broken);
    let (_, reference) = run(&Sequential::default(), &good);
    let reference_blocks = blocks(&reference);

    for strategy in [&Sequential::default() as &dyn EnsembleStrategy, &parallel(4)] {
        let (status, text) = run(strategy, &bad);
        assert_eq!(status.tasks, 8);
        assert_eq!(status.failures.len(), 1);
        assert_eq!(status.failures[0].task, TaskId(2));
        assert!(matches!(status.failures[0].error, TaskError::Config(_)));
        assert_eq!(status.exit_code(), 1);

        let got = blocks(&text);
        assert!(got
            .iter()
            .any(|b| b.contains("# task 2 failed: configuration error: invalid value 'zero' for -qu")));
        let intact = got
            .iter()
            .filter(|b| reference_blocks.contains(b))
            .count();
        assert_eq!(intact, 7);
    }
}

#[test]
fn empty_ensemble_succeeds_with_no_output() {
    for strategy in [&Sequential::default() as &dyn EnsembleStrategy, &parallel(4)] {
        let (status, text) = run(strategy, &[]);
        assert_eq!(status.tasks, 0);
        assert!(status.is_success());
        assert!(text.is_empty());
    }
}

#[test]
fn stepping_error_fails_only_its_own_task() {
    // E parallel to B at 1e300 accelerates the gyron until the
    // position overflows on the second push.
    let good = tasks("-qu=0.1\n-qu=0.3\n");
    let mixed = tasks("-qu=0.1\n-tfinal=4 -samples=4 -ez=1e300\n-qu=0.3\n");
    let (_, reference) = run(&Sequential::default(), &good);
    let reference_blocks: Vec<String> = blocks(&reference)
        .into_iter()
        .map(|b| b.replace("# task 1: ", "# task 2: "))
        .collect();

    for strategy in [&Sequential::default() as &dyn EnsembleStrategy, &parallel(3)] {
        let (status, text) = run(strategy, &mixed);
        assert_eq!(status.tasks, 3);
        assert_eq!(status.failures.len(), 1, "{}", strategy.name());
        assert_eq!(status.failures[0].task, TaskId(1));
        assert!(matches!(status.failures[0].error, TaskError::Step(_)));
        assert_eq!(status.exit_code(), 1);

        let got = blocks(&text);
        let failed: Vec<&String> = got.iter().filter(|b| b.starts_with("# task 1: ")).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].contains("# task 1 failed: stepping error: "));
        let intact = got.iter().filter(|b| reference_blocks.contains(b)).count();
        assert_eq!(intact, 2, "{}", strategy.name());
    }
}
