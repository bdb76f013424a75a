//! Seed scenario 1 (spec §8): `A`, `B(depends=[A])`, `C(depends=[B])`, all
//! shell/indefinite, each printing a line that matches its readiness
//! pattern and then sleeping. Expect STARTED/COMPLETED strictly in chain
//! order, then STOPPED in reverse admission order on shutdown.

mod common;

use jorun_test_utils::builders::{ConfigFileBuilder, TaskDefBuilder};

use common::Harness;
use jorun::bus::TaskStatus;

fn chain_config() -> jorun::config::ConfigFile {
    ConfigFileBuilder::new()
        .with_task(
            "a",
            TaskDefBuilder::shell_line("echo ready; sleep 2")
                .indefinite()
                .completion_pattern("^ready$")
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
        .with_task(
            "c",
            TaskDefBuilder::shell_line("echo ready; sleep 2")
                .indefinite()
                .completion_pattern("^ready$")
                .depends_on("b")
                .build(),
        )
        .build()
}

#[tokio::test]
async fn linear_chain_admits_and_completes_in_order() {
    let cfg = chain_config();
    let mut harness = Harness::spawn(&cfg);

    let expected = [
        ("a", TaskStatus::Started),
        ("a", TaskStatus::Completed),
        ("b", TaskStatus::Started),
        ("b", TaskStatus::Completed),
        ("c", TaskStatus::Started),
        ("c", TaskStatus::Completed),
    ];

    for (name, status) in expected {
        let ev = harness.next_status().await;
        assert_eq!(ev.name, name);
        assert_eq!(ev.status, status);
    }

    let stopped = harness.shutdown_and_collect_stopped(3).await;
    assert_eq!(stopped, vec!["c".to_string(), "b".to_string(), "a".to_string()]);
}
