//! Seed scenario 2 (spec §8): `A`; `B(depends=[A])`, `C(depends=[A])`;
//! `D(depends=[B,C])`. Both `B` and `C` become eligible in the same
//! admission batch once `A` completes; `D` must never start before both
//! `B` and `C` have reported completion.

mod common;

use std::collections::HashSet;

use jorun_test_utils::builders::{ConfigFileBuilder, TaskDefBuilder};

use common::Harness;
use jorun::bus::TaskStatus;

fn diamond_config() -> jorun::config::ConfigFile {
    let ready = |deps: &[&str]| {
        let mut b = TaskDefBuilder::shell_line("echo ready; sleep 2")
            .indefinite()
            .completion_pattern("^ready$");
        for d in deps {
            b = b.depends_on(d);
        }
        b.build()
    };

    ConfigFileBuilder::new()
        .with_task("a", ready(&[]))
        .with_task("b", ready(&["a"]))
        .with_task("c", ready(&["a"]))
        .with_task("d", ready(&["b", "c"]))
        .build()
}

#[tokio::test]
async fn diamond_admits_d_only_after_both_sides_complete() {
    let cfg = diamond_config();
    let mut harness = Harness::spawn(&cfg);

    // A starts and completes alone.
    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("a", TaskStatus::Started));
    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("a", TaskStatus::Completed));

    // B and C are admitted together; order between them is unspecified.
    let mut started: HashSet<String> = HashSet::new();
    for _ in 0..2 {
        let ev = harness.next_status().await;
        assert_eq!(ev.status, TaskStatus::Started);
        assert!(ev.name == "b" || ev.name == "c");
        started.insert(ev.name);
    }
    assert_eq!(started, HashSet::from(["b".to_string(), "c".to_string()]));

    // Both must complete before D is admitted.
    let mut completed: HashSet<String> = HashSet::new();
    for _ in 0..2 {
        let ev = harness.next_status().await;
        assert_eq!(ev.status, TaskStatus::Completed);
        completed.insert(ev.name);
    }
    assert_eq!(completed, HashSet::from(["b".to_string(), "c".to_string()]));

    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("d", TaskStatus::Started));
    let ev = harness.next_status().await;
    assert_eq!((ev.name.as_str(), ev.status), ("d", TaskStatus::Completed));

    let stopped = harness.shutdown_and_collect_stopped(4).await;
    assert_eq!(stopped.first().unwrap(), "d");
    assert_eq!(stopped.last().unwrap(), "a");
}
