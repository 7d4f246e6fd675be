#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ckptmerge_core::runner::{ExternalOutcome, ExternalRunner};
use ckptmerge_core::{RunLayout, Step};

/// Stands in for the converter: records every argv and, unless the step is
/// marked as failing, writes the output file like the real tool would.
#[derive(Default)]
pub struct RecordingRunner {
    failing: HashSet<Step>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(steps: &[Step]) -> Self {
        Self {
            failing: steps.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

fn step_of(input_dir: &str) -> Option<Step> {
    input_dir.rsplit("global_step").next()?.parse().ok()
}

#[async_trait]
impl ExternalRunner for RecordingRunner {
    fn name(&self) -> &str {
        "recording"
    }

    async fn run(&self, argv: &[String]) -> anyhow::Result<ExternalOutcome> {
        self.calls.lock().unwrap().push(argv.to_vec());

        let n = argv.len();
        anyhow::ensure!(n >= 4, "argv too short: {argv:?}");
        let input_dir = &argv[n - 4];
        let output = PathBuf::from(&argv[n - 3]);

        if step_of(input_dir).is_some_and(|s| self.failing.contains(&s)) {
            return Ok(ExternalOutcome::failure(1, "RuntimeError: corrupt shard"));
        }

        std::fs::write(&output, b"fp32 weights")?;
        Ok(ExternalOutcome::success())
    }
}

/// Temporary checkpoint and model roots for one version.
pub struct Fixture {
    pub tmp: tempfile::TempDir,
    pub layout: RunLayout,
}

impl Fixture {
    pub fn new(version: &str) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let layout = RunLayout::new(tmp.path().join("ckpts"), tmp.path().join("model"), version);
        Self { tmp, layout }
    }

    pub fn add_input(&self, step: Step) {
        std::fs::create_dir_all(self.layout.step_dir(step)).unwrap();
    }

    pub fn add_output(&self, step: Step) {
        std::fs::create_dir_all(self.layout.output_base()).unwrap();
        std::fs::write(self.layout.output_file(step), b"old weights").unwrap();
    }

    pub fn output_exists(&self, step: Step) -> bool {
        self.layout.output_file(step).exists()
    }
}

/// Log sink for asserting on emitted messages.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buf, guard)
}
