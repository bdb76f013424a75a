//! Seed scenario 4 (spec §8 / §7): a task with `completion_pattern` set
//! whose child exits before matching produces exactly one pattern-miss log
//! and no COMPLETED event; its dependents never start.

mod common;

use jorun_test_utils::builders::{ConfigFileBuilder, TaskDefBuilder};

use common::Harness;
use jorun::bus::{StreamKind, TaskStatus};

fn config() -> jorun::config::ConfigFile {
    ConfigFileBuilder::new()
        .with_task(
            "a",
            TaskDefBuilder::shell_argv(&["false"])
                .completion_pattern("ready")
                .build(),
        )
        .with_task(
            "b",
            TaskDefBuilder::shell_line("echo ready; sleep 2")
                .indefinite()
                .completion_pattern("^ready$")
                .depends_on("a")
                .build(),
        )
        .build()
}

#[tokio::test]
async fn pattern_miss_blocks_dependents() {
    let cfg = config();
    let mut harness = Harness::spawn(&cfg);

    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("a", TaskStatus::Started));

    // `a` exits without ever matching: Stopped, no Completed, and nothing
    // reaches `b`.
    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("a", TaskStatus::Stopped));

    // Drain the error log produced for the pattern-miss.
    let log = tokio::time::timeout(std::time::Duration::from_secs(5), harness.log_rx.recv())
        .await
        .expect("timed out waiting for the pattern-miss log")
        .expect("log channel closed");
    assert_eq!(log.task_name, "a");
    assert_eq!(log.stream, StreamKind::Stderr);
    assert!(log.message.contains("pattern"));

    // `b` never starts: give the supervisor a beat, then shut down cleanly
    // and confirm no further events arrived for either task.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    harness.shutdown_and_collect_stopped(0).await;
}
