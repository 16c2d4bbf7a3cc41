// tests/series_parallel.rs

mod common;
use crate::common::{compile_plain, init_tracing, with_timeout, Journal, TestServices};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Barrier;

use pipedag::{Callback, Configuration, Descriptor, PipedagError};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn series_runs_members_in_order() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    // The slow first member must finish before the fast second one starts.
    let config = Configuration::new()
        .task("slow", journal.record_slow("t1", 50))
        .task("fast", journal.record_slow("t2", 0))
        .task("default", Descriptor::series(["slow", "fast"]));

    let actions = compile_plain(config, &t)?;
    with_timeout(5, actions["default"].run()).await??;

    assert_eq!(
        journal.entries(),
        vec!["start:t1", "end:t1", "start:t2", "end:t2"]
    );
    Ok(())
}

#[tokio::test]
async fn series_stops_at_first_failure() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new().task(
        "default",
        Descriptor::series([
            journal.record("one"),
            journal.failing("two"),
            journal.record("three"),
        ]),
    );

    let actions = compile_plain(config, &t)?;
    let err = actions["default"].run().await.expect_err("second member fails");

    assert!(err.to_string().contains("two failed"), "{err}");
    assert_eq!(journal.entries(), vec!["one", "two"]);
    Ok(())
}

#[tokio::test]
async fn parallel_members_run_concurrently() -> TestResult {
    init_tracing();
    let t = TestServices::new();

    // Each member waits for the other; this only completes if both are
    // in flight at the same time.
    let barrier = Arc::new(Barrier::new(2));
    let member = || {
        let barrier = Arc::clone(&barrier);
        Callback::future(move || {
            let barrier = Arc::clone(&barrier);
            async move {
                barrier.wait().await;
                Ok::<(), anyhow::Error>(())
            }
        })
    };

    let config = Configuration::new().task("both", Descriptor::parallel([member(), member()]));

    let actions = compile_plain(config, &t)?;
    with_timeout(5, actions["both"].run()).await??;
    Ok(())
}

#[tokio::test]
async fn parallel_reports_member_failure() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new().task(
        "both",
        Descriptor::parallel([journal.record("ok"), journal.failing("bad")]),
    );

    let actions = compile_plain(config, &t)?;
    let result = actions["both"].run().await;

    assert!(matches!(result, Err(PipedagError::Other(_))));
    Ok(())
}

#[tokio::test]
async fn wrapper_runs_its_inner_task() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("inner", journal.record("inner"))
        .task("outer", Descriptor::wrap("inner"))
        .task("anonymous", Descriptor::wrap(journal.record("anon")));

    let actions = compile_plain(config, &t)?;
    assert!(actions["outer"].ptr_eq(&actions["inner"]));

    actions["anonymous"].run().await?;
    actions["outer"].run().await?;
    assert_eq!(journal.entries(), vec!["anon", "inner"]);
    Ok(())
}

#[tokio::test]
async fn done_signal_completes_the_task() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let signalled = {
        let journal = journal.clone();
        Callback::with_done(move |done| {
            let journal = journal.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                journal.push("signalled");
                done.finish();
            });
        })
    };

    let config = Configuration::new().task(
        "default",
        Descriptor::series([signalled, journal.record("after")]),
    );

    let actions = compile_plain(config, &t)?;
    with_timeout(5, actions["default"].run()).await??;

    assert_eq!(journal.entries(), vec!["signalled", "after"]);
    Ok(())
}

#[tokio::test]
async fn done_signal_failure_and_drop_fail_the_task() -> TestResult {
    init_tracing();
    let t = TestServices::new();

    let config = Configuration::new()
        .task(
            "fails",
            Callback::with_done(|done| done.fail(anyhow::anyhow!("nope"))),
        )
        .task("dropped", Callback::with_done(drop));

    let actions = compile_plain(config, &t)?;

    let err = actions["fails"].run().await.expect_err("fail() fails the task");
    assert!(err.to_string().contains("nope"));
    assert!(actions["dropped"].run().await.is_err());
    Ok(())
}

#[tokio::test]
async fn actions_can_be_run_repeatedly() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new().task("tick", Descriptor::series([journal.record("tick")]));

    let actions = compile_plain(config, &t)?;
    actions["tick"].run().await?;
    actions["tick"].run().await?;

    assert_eq!(journal.entries(), vec!["tick", "tick"]);
    Ok(())
}
