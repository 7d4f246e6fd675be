mod common;

use std::sync::Arc;

use async_trait::async_trait;
use ckptmerge_core::error::DispatchError;
use ckptmerge_core::runner::{ExternalOutcome, ExternalRunner};
use ckptmerge_core::{parse_steps, DispatchOpts, Dispatcher, StepOutcome};
use common::{capture_logs, Fixture, RecordingRunner};
use pretty_assertions::assert_eq;

fn dispatcher(runner: Arc<RecordingRunner>, parallelism: usize) -> Dispatcher {
    let opts = DispatchOpts {
        available_parallelism: Some(parallelism),
        ..DispatchOpts::default()
    };
    Dispatcher::new(runner, Default::default(), opts)
}

#[tokio::test]
async fn duplicate_steps_collapse_with_warning() {
    let fx = Fixture::new("v1");
    fx.add_input(10);
    fx.add_input(11);
    let runner = Arc::new(RecordingRunner::new());
    let (logs, _guard) = capture_logs();

    let steps = parse_steps("10,10,11").unwrap();
    let report = dispatcher(runner.clone(), 8)
        .run(&steps, &fx.layout)
        .await
        .unwrap();

    assert_eq!(report.outcomes.keys().copied().collect::<Vec<_>>(), vec![10, 11]);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.workers, 2);
    assert_eq!(runner.calls().len(), 2);
    assert!(logs.contents().contains("duplicate"));
}

#[tokio::test]
async fn missing_input_runs_nothing_and_creates_nothing() {
    let fx = Fixture::new("v1");
    let runner = Arc::new(RecordingRunner::new());
    let (logs, _guard) = capture_logs();

    let steps = parse_steps("42").unwrap();
    let report = dispatcher(runner.clone(), 4)
        .run(&steps, &fx.layout)
        .await
        .unwrap();

    assert_eq!(report.outcomes[&42], StepOutcome::MissingInput);
    assert!(runner.calls().is_empty());
    assert!(!fx.output_exists(42));

    // a missing step is an expected skip, not a warning
    let logs = logs.contents();
    let line = logs
        .lines()
        .find(|l| l.contains("step 42 missing"))
        .expect("missing-step log line");
    assert!(line.contains("INFO"), "{line}");
}

#[tokio::test]
async fn second_run_does_no_redundant_work() {
    let fx = Fixture::new("v1");
    fx.add_input(1);
    fx.add_input(2);
    fx.add_output(2);
    let steps = parse_steps("1,2").unwrap();

    let first = Arc::new(RecordingRunner::new());
    let report = dispatcher(first.clone(), 4)
        .run(&steps, &fx.layout)
        .await
        .unwrap();
    assert!(matches!(report.outcomes[&1], StepOutcome::Converted { .. }));
    assert_eq!(report.outcomes[&2], StepOutcome::AlreadyDone);
    assert_eq!(first.calls().len(), 1);

    let second = Arc::new(RecordingRunner::new());
    let report = dispatcher(second.clone(), 4)
        .run(&steps, &fx.layout)
        .await
        .unwrap();
    assert_eq!(report.already_done(), 2);
    assert!(second.calls().is_empty());
    assert!(fx.output_exists(1));
    assert!(fx.output_exists(2));
}

#[tokio::test]
async fn converter_gets_input_dir_output_path_and_empty_tag() {
    let fx = Fixture::new("qwen-7b");
    fx.add_input(140);
    let runner = Arc::new(RecordingRunner::new());

    let steps = parse_steps("140").unwrap();
    dispatcher(runner.clone(), 4)
        .run(&steps, &fx.layout)
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let argv = &calls[0];
    let n = argv.len();
    assert_eq!(
        argv[n - 4..].to_vec(),
        vec![
            fx.layout.step_dir(140).to_string_lossy().to_string(),
            fx.layout.output_file(140).to_string_lossy().to_string(),
            "--tag".to_string(),
            String::new(),
        ]
    );
}

#[tokio::test]
async fn failing_step_does_not_stop_its_siblings() {
    let fx = Fixture::new("v1");
    fx.add_input(100);
    fx.add_input(200);
    let runner = Arc::new(RecordingRunner::failing_on(&[100]));

    let steps = parse_steps("100,200").unwrap();
    let report = dispatcher(runner.clone(), 1)
        .run(&steps, &fx.layout)
        .await
        .unwrap();

    assert_eq!(runner.calls().len(), 2);
    assert!(!fx.output_exists(100));
    assert!(fx.output_exists(200));
    assert_eq!(report.failed_steps(), vec![100]);
    match &report.outcomes[&100] {
        StepOutcome::Failed { exit_code, stderr } => {
            assert_eq!(*exit_code, 1);
            assert!(stderr.contains("corrupt shard"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn worker_count_respects_parallelism_and_step_count() {
    let fx = Fixture::new("v1");
    let runner = Arc::new(RecordingRunner::new());

    let many = parse_steps(
        &(0..200)
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(","),
    )
    .unwrap();
    let report = dispatcher(runner.clone(), 8)
        .run(&many, &fx.layout)
        .await
        .unwrap();
    assert_eq!(report.workers, 8);
    assert_eq!(report.missing(), 200);

    let few = parse_steps("1,2,3").unwrap();
    let report = dispatcher(runner, 8).run(&few, &fx.layout).await.unwrap();
    assert!(report.workers <= 3);
}

#[tokio::test]
async fn configured_cap_lowers_worker_count() {
    let fx = Fixture::new("v1");
    let opts = DispatchOpts {
        max_workers: 2,
        available_parallelism: Some(16),
        progress_bar: false,
    };
    let d = Dispatcher::new(Arc::new(RecordingRunner::new()), Default::default(), opts);

    let report = d
        .run(&parse_steps("1,2,3,4,5").unwrap(), &fx.layout)
        .await
        .unwrap();
    assert_eq!(report.workers, 2);
}

#[tokio::test]
async fn empty_step_list_is_a_clean_noop() {
    let fx = Fixture::new("v1");
    let runner = Arc::new(RecordingRunner::new());

    let steps = ckptmerge_core::StepList::from_steps(Vec::new());
    let report = dispatcher(runner.clone(), 8)
        .run(&steps, &fx.layout)
        .await
        .unwrap();

    assert_eq!(report.workers, 0);
    assert_eq!(report.total(), 0);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn unwritable_output_root_aborts_before_any_work() {
    let fx = Fixture::new("v1");
    fx.add_input(1);
    let blocker = fx.tmp.path().join("blocked");
    std::fs::write(&blocker, b"file").unwrap();
    let layout = ckptmerge_core::RunLayout::new(fx.tmp.path().join("ckpts"), &blocker, "v1");
    let runner = Arc::new(RecordingRunner::new());

    let err = dispatcher(runner.clone(), 4)
        .run(&parse_steps("1").unwrap(), &layout)
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::OutputDir { .. }));
    assert!(runner.calls().is_empty());
}

/// Panics while converting one step, succeeds on the others.
struct PanicOnStep(u64);

#[async_trait]
impl ExternalRunner for PanicOnStep {
    fn name(&self) -> &str {
        "panic-on-step"
    }

    async fn run(&self, argv: &[String]) -> anyhow::Result<ExternalOutcome> {
        let marker = format!("global_step{}", self.0);
        if argv.iter().any(|a| a.ends_with(&marker)) {
            panic!("boom");
        }
        Ok(ExternalOutcome::success())
    }
}

#[tokio::test]
async fn worker_panic_is_recorded_against_its_own_step() {
    let fx = Fixture::new("v1");
    for step in [5, 7, 9] {
        fx.add_input(step);
    }
    let opts = DispatchOpts {
        available_parallelism: Some(2),
        ..DispatchOpts::default()
    };
    let d = Dispatcher::new(Arc::new(PanicOnStep(7)), Default::default(), opts);

    let report = d
        .run(&parse_steps("5,7,9").unwrap(), &fx.layout)
        .await
        .unwrap();

    assert_eq!(report.total(), 3);
    assert!(matches!(report.outcomes[&5], StepOutcome::Converted { .. }));
    assert!(matches!(report.outcomes[&9], StepOutcome::Converted { .. }));
    match &report.outcomes[&7] {
        StepOutcome::Errored { message } => {
            assert!(message.contains("worker crashed"));
            assert!(message.contains("boom"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.failed_steps(), vec![7]);
}
