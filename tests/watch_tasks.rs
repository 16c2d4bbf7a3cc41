// tests/watch_tasks.rs

mod common;
use crate::common::{compile_plain, init_tracing, with_timeout, Journal, TestServices};

use std::error::Error;
use std::sync::Arc;

use tokio::sync::Barrier;

use pipedag::patterns::build_globset;
use pipedag::watch::WatchIndex;
use pipedag::{build_table, Callback, Configuration, Descriptor, Destination, Watch, WATCH_TASK_NAME};

type TestResult = Result<(), Box<dyn Error>>;

fn watching(paths: &[&str], task: impl Into<pipedag::RawTask>) -> Descriptor {
    Descriptor {
        watch: Some(Watch::Paths(paths.iter().map(|p| p.to_string()).collect())),
        ..Descriptor::wrap(task)
    }
}

#[test]
fn index_keeps_declaration_order() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("x", watching(&["src/a.txt"], journal.record("x")))
        .task("y", watching(&["src/a.txt", "src/b.txt"], journal.record("y")))
        .task("z", journal.record("z"));

    let table = build_table(config, &t.services)?;
    let index = WatchIndex::from_table(&table);

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("src/a.txt"), Some(&["x".to_string(), "y".to_string()][..]));
    assert_eq!(index.get("src/b.txt"), Some(&["y".to_string()][..]));
    assert!(table.contains(WATCH_TASK_NAME));
    Ok(())
}

#[test]
fn no_watch_declarations_means_no_watch_task() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let actions = compile_plain(Configuration::new().task("a", journal.record("a")), &t)?;

    assert!(!actions.contains_key(WATCH_TASK_NAME));
    Ok(())
}

#[tokio::test]
async fn change_runs_every_watching_task_concurrently() -> TestResult {
    init_tracing();
    let t = TestServices::new();

    let barrier = Arc::new(Barrier::new(2));
    let waiter = || {
        let barrier = Arc::clone(&barrier);
        Callback::future(move || {
            let barrier = Arc::clone(&barrier);
            async move {
                barrier.wait().await;
                Ok::<(), anyhow::Error>(())
            }
        })
    };

    let config = Configuration::new()
        .task("x", watching(&["src/a.txt"], waiter()))
        .task("y", watching(&["src/a.txt"], waiter()));

    let actions = compile_plain(config, &t)?;
    actions[WATCH_TASK_NAME].run().await?;

    assert_eq!(t.watcher.patterns(), vec![vec!["src/a.txt".to_string()]]);

    let results = with_timeout(5, t.watcher.trigger("src/a.txt")).await?;
    assert_eq!(results.len(), 1);
    for result in results {
        result?;
    }
    Ok(())
}

#[tokio::test]
async fn one_watcher_per_path() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("x", watching(&["a", "b"], journal.record("x")))
        .task("y", watching(&["b"], journal.record("y")));

    let actions = compile_plain(config, &t)?;
    actions[WATCH_TASK_NAME].run().await?;

    assert_eq!(
        t.watcher.patterns(),
        vec![vec!["a".to_string()], vec!["b".to_string()]]
    );

    t.watcher.trigger("a").await;
    assert_eq!(journal.entries(), vec!["x"]);

    t.watcher.trigger("b").await;
    let mut entries = journal.entries();
    entries.sort();
    assert_eq!(entries, vec!["x", "x", "y"]);
    Ok(())
}

#[tokio::test]
async fn watch_true_follows_the_source() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    t.add_file("src/a.txt", "one");

    let config = Configuration::new().task(
        "copy",
        Descriptor {
            watch: Some(Watch::Source),
            destination: Some(Destination::Directory("dist".into())),
            ..Descriptor::source("src/*.txt")
        },
    );

    let actions = compile_plain(config, &t)?;
    actions[WATCH_TASK_NAME].run().await?;
    assert_eq!(t.watcher.patterns(), vec![vec!["src/*.txt".to_string()]]);

    // The watcher reruns the same composed pipeline.
    t.add_file("src/a.txt", "two");
    let registration = t.watcher.registrations().remove(0);
    (registration.on_change)("src/a.txt");
    registration.action.run().await?;

    assert_eq!(t.read("dist/a.txt").as_deref(), Some("two"));
    Ok(())
}

#[tokio::test]
async fn declared_watch_task_suppresses_the_synthetic_one() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("x", watching(&["src/a.txt"], journal.record("x")))
        .task(WATCH_TASK_NAME, journal.record("mine"));

    let actions = compile_plain(config, &t)?;
    actions[WATCH_TASK_NAME].run().await?;

    assert_eq!(journal.entries(), vec!["mine"]);
    assert!(t.watcher.registrations().is_empty());
    Ok(())
}

#[tokio::test]
async fn nested_watch_declarations_are_not_indexed() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new().task(
        "outer",
        Descriptor::series([watching(&["src/a.txt"], journal.record("inner"))]),
    );

    let actions = compile_plain(config, &t)?;
    assert!(!actions.contains_key(WATCH_TASK_NAME));
    Ok(())
}

#[tokio::test]
async fn watch_task_is_registered_with_the_rest() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new().task("x", watching(&["src/a.txt"], journal.record("x")));

    pipedag::compile(
        config,
        &pipedag::CompileOptions { register: true },
        &t.services,
    )?;

    assert_eq!(t.registry.names(), vec!["x", WATCH_TASK_NAME]);
    t.registry.run(WATCH_TASK_NAME).await?;
    assert_eq!(t.watcher.registrations().len(), 1);
    Ok(())
}

#[test]
fn watch_off_overrides_the_template() -> TestResult {
    init_tracing();
    let t = TestServices::new();

    let config = Configuration::new()
        .template(Descriptor {
            watch: Some(Watch::Source),
            ..Descriptor::default()
        })
        .task(
            "quiet",
            Descriptor {
                watch: Some(Watch::Off),
                ..Descriptor::source("src/*.txt")
            },
        )
        .task("loud", Descriptor::source("src/*.css"));

    let table = build_table(config, &t.services)?;
    let index = WatchIndex::from_table(&table);

    assert_eq!(index.len(), 1);
    assert_eq!(index.get("src/*.css"), Some(&["loud".to_string()][..]));
    assert!(table.get("quiet").ok_or("quiet")?.watch().is_empty());
    Ok(())
}

#[tokio::test]
async fn dot_slash_watch_patterns_match_changed_paths() -> TestResult {
    init_tracing();
    let t = TestServices::new();

    let config = Configuration::new().task(
        "copy",
        Descriptor {
            watch: Some(Watch::Source),
            ..Descriptor::source("./src/*.txt")
        },
    );

    let actions = compile_plain(config, &t)?;
    actions[WATCH_TASK_NAME].run().await?;

    let patterns = t.watcher.patterns();
    assert_eq!(patterns, vec![vec!["./src/*.txt".to_string()]]);

    // The same matcher the notify watcher builds for these patterns.
    let matcher = build_globset(&patterns[0])?;
    assert!(matcher.is_match("src/a.txt"));
    assert!(!matcher.is_match("lib/a.txt"));
    Ok(())
}
