//! Runs the `tree-explorer` binary for the integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub(crate) struct Run {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
}

/// Run the binary with `args`; `name` keeps the output files of concurrently running tests apart.
pub(crate) fn run_explorer<'a>(name: &str, args: impl IntoIterator<Item = &'a str>) -> Run {
    let explorer = PathBuf::from(env!("CARGO_BIN_EXE_tree-explorer"));
    let log_file_path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(format!("{name}.log"));

    let mut child = Command::new(explorer)
        .args(args)
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run explorer.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => {
            let _ = child.kill();
            panic!("explorer took more than {} seconds", TEST_TIMEOUT.as_secs())
        }
        Ok(Some(status)) => status,
        Err(e) => panic!("error starting explorer: {e}"),
    };

    let stdout = std::fs::read_to_string(&log_file_path).expect("Failed to read log file.");
    std::fs::remove_file(&log_file_path).expect("Failed to remove log file.");

    Run { status, stdout }
}

/// Run the binary and expect it to succeed.
pub(crate) fn run_successfully<'a>(name: &str, args: impl IntoIterator<Item = &'a str>) -> String {
    let run = run_explorer(name, args);
    assert!(run.status.success(), "explorer failed:\n{}", run.stdout);
    run.stdout
}
