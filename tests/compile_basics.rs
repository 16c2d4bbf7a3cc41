// tests/compile_basics.rs

mod common;
use crate::common::{compile_plain, init_tracing, Journal, TestServices};

use std::error::Error;

use pipedag::{
    compile, Callback, CompileOptions, Configuration, Descriptor, PipedagError, Scheduler,
};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn empty_configuration_compiles_to_nothing() -> TestResult {
    init_tracing();
    let t = TestServices::new();

    let actions = compile(
        Configuration::new(),
        &CompileOptions { register: true },
        &t.services,
    )?;

    assert!(actions.is_empty());
    assert!(t.registry.names().is_empty());
    Ok(())
}

#[test]
fn alias_chain_yields_the_target_action() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("b", "c")
        .task("c", Descriptor::series([journal.record("one")]));

    let actions = compile_plain(config, &t)?;

    assert!(actions["b"].ptr_eq(&actions["c"]));
    Ok(())
}

#[test]
fn forward_references_resolve() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("default", Descriptor::series(["later"]))
        .task("later", journal.record("later"));

    let actions = compile_plain(config, &t)?;
    assert_eq!(actions.len(), 2);
    Ok(())
}

#[test]
fn self_alias_is_circular() {
    init_tracing();
    let t = TestServices::new();

    let result = compile_plain(Configuration::new().task("a", "a"), &t);

    match result {
        Err(PipedagError::CircularAlias(name)) => assert_eq!(name, "a"),
        other => panic!("expected CircularAlias, got {other:?}"),
    }
}

#[test]
fn longer_alias_cycle_is_circular() {
    init_tracing();
    let t = TestServices::new();

    let config = Configuration::new()
        .task("a", "b")
        .task("b", "c")
        .task("c", "a");

    assert!(matches!(
        compile_plain(config, &t),
        Err(PipedagError::CircularAlias(_))
    ));
}

#[test]
fn series_containing_itself_is_circular() {
    init_tracing();
    let t = TestServices::new();

    let config = Configuration::new().task("a", Descriptor::series(["a"]));

    assert!(matches!(
        compile_plain(config, &t),
        Err(PipedagError::CircularAlias(_))
    ));
}

#[test]
fn missing_alias_target_is_unknown() {
    init_tracing();
    let t = TestServices::new();

    let result = compile_plain(Configuration::new().task("a", "b"), &t);

    match result {
        Err(PipedagError::UnknownTask(name)) => assert_eq!(name, "b"),
        other => panic!("expected UnknownTask, got {other:?}"),
    }
}

#[test]
fn missing_nested_reference_is_unknown() {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("ok", journal.record("ok"))
        .task("build", Descriptor::parallel(["ok", "nope"]));

    assert!(matches!(
        compile_plain(config, &t),
        Err(PipedagError::UnknownTask(name)) if name == "nope"
    ));
}

#[test]
fn register_option_controls_registration() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let config = || {
        Configuration::new()
            .task("first", journal.record("first"))
            .task("second", "first")
    };

    let t = TestServices::new();
    compile(config(), &CompileOptions::default(), &t.services)?;
    assert!(t.registry.names().is_empty());

    let t = TestServices::new();
    let actions = compile(config(), &CompileOptions { register: true }, &t.services)?;
    assert_eq!(t.registry.names(), vec!["first", "second"]);

    let registered = t.registry.task("second").ok_or("second not registered")?;
    assert!(registered.ptr_eq(&actions["first"]));
    Ok(())
}

#[test]
fn failed_compile_registers_nothing() {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("fine", journal.record("fine"))
        .task("broken", "missing");

    let result = compile(config, &CompileOptions { register: true }, &t.services);

    assert!(result.is_err());
    assert!(t.registry.names().is_empty());
}

#[tokio::test]
async fn separate_compiles_do_not_share_state() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let first = compile_plain(Configuration::new().task("a", journal.record("a")), &t)?;
    let second = compile_plain(Configuration::new().task("b", journal.record("b")), &t)?;

    assert_eq!(first.keys().collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(second.keys().collect::<Vec<_>>(), vec!["b"]);

    // Same declaration compiled twice gets two distinct actions.
    let shared = journal.record("shared");
    let x = compile_plain(Configuration::new().task("s", shared.clone()), &t)?;
    let y = compile_plain(Configuration::new().task("s", shared), &t)?;
    assert!(!x["s"].ptr_eq(&y["s"]));

    second["b"].run().await?;
    assert_eq!(journal.entries(), vec!["b"]);
    Ok(())
}

#[tokio::test]
async fn shared_member_runs_at_every_reference() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("leaf", journal.record("leaf"))
        .task("one", Descriptor::series(["leaf"]))
        .task("two", Descriptor::parallel(["leaf", "one"]));

    let actions = compile_plain(config, &t)?;
    actions["two"].run().await?;

    let mut entries = journal.entries();
    entries.sort();
    assert_eq!(entries, vec!["leaf", "leaf"]);
    Ok(())
}

#[tokio::test]
async fn callbacks_run_through_the_registry() -> TestResult {
    init_tracing();
    let t = TestServices::new();
    let journal = Journal::new();

    let config = Configuration::new()
        .task("sync", journal.record("sync"))
        .task(
            "later",
            Callback::future({
                let journal = journal.clone();
                move || {
                    let journal = journal.clone();
                    async move {
                        journal.push("future");
                        Ok::<(), anyhow::Error>(())
                    }
                }
            }),
        )
        .task("default", Descriptor::series(["sync", "later"]));

    compile(config, &CompileOptions { register: true }, &t.services)?;
    t.registry.run("default").await?;

    assert_eq!(journal.entries(), vec!["sync", "future"]);
    assert!(matches!(
        t.registry.run("absent").await,
        Err(PipedagError::UnknownTask(_))
    ));
    Ok(())
}
