//! Seed scenario 3 (spec §8): `A`, `B` each shell with readiness patterns;
//! `G(type=group, depends=[A,B])` fires COMPLETED without spawning any
//! child, as soon as both `A` and `B` are complete.

mod common;

use std::collections::HashSet;

use jorun_test_utils::builders::{ConfigFileBuilder, TaskDefBuilder};

use common::Harness;
use jorun::bus::TaskStatus;

fn config() -> jorun::config::ConfigFile {
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
                .build(),
        )
        .with_task(
            "g",
            TaskDefBuilder::group()
                .depends_on("a")
                .depends_on("b")
                .build(),
        )
        .build()
}

#[tokio::test]
async fn group_joins_without_spawning_a_child() {
    let cfg = config();
    let mut harness = Harness::spawn(&cfg);

    let mut started: HashSet<String> = HashSet::new();
    let mut completed: HashSet<String> = HashSet::new();
    for _ in 0..4 {
        let ev = harness.next_status().await;
        assert!(ev.name == "a" || ev.name == "b");
        match ev.status {
            TaskStatus::Started => {
                started.insert(ev.name);
            }
            TaskStatus::Completed => {
                completed.insert(ev.name);
            }
            other => panic!("unexpected status for {}: {:?}", ev.name, other),
        }
    }
    assert_eq!(started, HashSet::from(["a".to_string(), "b".to_string()]));
    assert_eq!(completed, HashSet::from(["a".to_string(), "b".to_string()]));

    // Group has no child: it reports Started then Completed back-to-back,
    // with no intervening log output of its own, and then immediately
    // Stopped since there was never a live process to terminate.
    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("g", TaskStatus::Started));
    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("g", TaskStatus::Completed));
    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("g", TaskStatus::Stopped));

    // Only a and b still have a live Runner for shutdown to stop.
    harness.shutdown_and_collect_stopped(2).await;
}
