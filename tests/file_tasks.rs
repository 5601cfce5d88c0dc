// tests/file_tasks.rs

mod common;
use crate::common::{mock_scheduler, ActionLog, TaskBuilder};

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use drake::fs::mock::{at, MockFileSystem};
use drake::{action, touch, DrakeError, MemoryReporter, Registry, RunOptions, Scheduler};

type TestResult = Result<(), Box<dyn Error>>;

/// app <- (main.o <- main.c, util.o <- util.c)
fn program(log: &ActionLog) -> Registry {
    let registry = Registry::new();
    TaskBuilder::new("main.o").prereq("main.c").records(log).register(&registry);
    TaskBuilder::new("util.o").prereq("util.c").records(log).register(&registry);
    TaskBuilder::new("./app")
        .prereqs(&["main.o", "util.o"])
        .records(log)
        .register(&registry);
    registry
}

#[tokio::test]
async fn only_stale_targets_are_rebuilt() -> TestResult {
    let log = ActionLog::new();
    let registry = program(&log);
    let fs = MockFileSystem::new();
    fs.add_file("main.c", at(10));
    fs.add_file("util.c", at(10));
    fs.add_file("main.o", at(20));
    fs.add_file("util.o", at(5));
    fs.add_file("app", at(30));
    let (scheduler, reporter) = mock_scheduler(&registry, &fs);

    scheduler.run(&["./app"], &RunOptions::default()).await?;

    // Recording actions leave the mock timestamps alone, so app stays newer
    // than both objects.
    assert_eq!(log.entries(), ["./util.o"]);
    assert!(reporter
        .lines()
        .contains(&"./main.o skipped: up to date".to_string()));
    assert!(reporter
        .lines()
        .contains(&"./app skipped: up to date".to_string()));
    Ok(())
}

#[tokio::test]
async fn missing_target_is_built() -> TestResult {
    let log = ActionLog::new();
    let registry = program(&log);
    let fs = MockFileSystem::new();
    fs.add_file("main.c", at(10));
    fs.add_file("util.c", at(10));
    fs.add_file("main.o", at(20));
    fs.add_file("util.o", at(20));
    let (scheduler, _) = mock_scheduler(&registry, &fs);

    scheduler.run(&["./app"], &RunOptions::default()).await?;

    assert_eq!(log.entries(), ["./app"]);
    Ok(())
}

#[tokio::test]
async fn missing_prerequisite_file_fails_the_run() {
    let log = ActionLog::new();
    let registry = program(&log);
    let fs = MockFileSystem::new();
    fs.add_file("util.c", at(10));
    let (scheduler, _) = mock_scheduler(&registry, &fs);

    let err = scheduler
        .run(&["./app"], &RunOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DrakeError::MissingPrerequisite(ref p) if p == "./main.c"));
    assert_eq!(err.to_string(), "outOfDate: missing prerequisite file: ./main.c");
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn normal_task_prerequisites_do_not_count_for_staleness() -> TestResult {
    let log = ActionLog::new();
    let registry = Registry::new();
    TaskBuilder::new("prepare").records(&log).register(&registry);
    TaskBuilder::new("out.txt")
        .prereqs(&["prepare", "in.txt"])
        .records(&log)
        .register(&registry);
    let fs = MockFileSystem::new();
    fs.add_file("in.txt", at(1));
    fs.add_file("out.txt", at(2));
    let (scheduler, _) = mock_scheduler(&registry, &fs);

    scheduler.run(&["out.txt"], &RunOptions::default()).await?;

    assert_eq!(log.entries(), ["prepare"]);
    Ok(())
}

#[tokio::test]
async fn always_make_rebuilds_everything() -> TestResult {
    let log = ActionLog::new();
    let registry = program(&log);
    let fs = MockFileSystem::new();
    for (path, t) in [("main.c", 1), ("util.c", 1), ("main.o", 2), ("util.o", 2), ("app", 3)] {
        fs.add_file(path, at(t));
    }
    let (scheduler, _) = mock_scheduler(&registry, &fs);

    let options = RunOptions {
        always_make: true,
        ..RunOptions::default()
    };
    scheduler.run(&["./app"], &options).await?;

    assert_eq!(log.entries(), ["./main.o", "./util.o", "./app"]);
    Ok(())
}

#[tokio::test]
async fn dry_run_still_checks_staleness() -> TestResult {
    let log = ActionLog::new();
    let registry = program(&log);
    let fs = MockFileSystem::new();
    fs.add_file("main.c", at(10));
    fs.add_file("util.c", at(10));
    fs.add_file("main.o", at(20));
    let (scheduler, reporter) = mock_scheduler(&registry, &fs);

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    scheduler.run(&["./app"], &options).await?;

    assert!(log.entries().is_empty());
    assert_eq!(
        reporter.lines(),
        [
            "./main.o skipped: up to date",
            "./util.o skipped: dry run",
            "./app skipped: dry run",
        ]
    );
    Ok(())
}

fn set_mtime(path: &Path, time: SystemTime) {
    OpenOptions::new()
        .append(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

#[tokio::test]
async fn real_files_are_built_then_up_to_date() -> TestResult {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join("src/input.txt");
    let target = dir.path().join("build/output.txt");
    touch([&source])?;
    set_mtime(&source, SystemTime::now() - Duration::from_secs(60));

    let log = ActionLog::new();
    let registry = Registry::new();
    let built = log.clone();
    TaskBuilder::new(target.to_str().unwrap())
        .prereq(source.to_str().unwrap())
        .action(action(move |ctx| {
            let built = built.clone();
            async move {
                built.record("build");
                drake::write_file(&ctx.name, "built")?;
                Ok(())
            }
        }))
        .register(&registry);

    let reporter = MemoryReporter::new();
    let scheduler = Scheduler::new(registry).with_reporter(Arc::new(reporter.clone()));
    let target_name = target.to_str().unwrap();

    scheduler.run(&[target_name], &RunOptions::default()).await?;
    assert_eq!(log.entries(), ["build"]);
    assert_eq!(std::fs::read_to_string(&target)?, "built");

    scheduler.run(&[target_name], &RunOptions::default()).await?;
    assert_eq!(log.entries(), ["build"]);

    // A newer prerequisite makes the target stale again.
    set_mtime(&target, SystemTime::now() - Duration::from_secs(120));
    scheduler.run(&[target_name], &RunOptions::default()).await?;
    assert_eq!(log.entries(), ["build", "build"]);
    Ok(())
}

#[tokio::test]
async fn wildcard_matches_may_contain_glob_characters() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("a.c"), "")?;
    std::fs::write(dir.path().join("x[1].c"), "")?;
    let root = drake::task::normalize_path(&dir.path().to_string_lossy());

    let seen = ActionLog::new();
    let registry = Registry::new();
    let record = seen.clone();
    TaskBuilder::new("all")
        .prereq(&format!("{root}/*.c"))
        .action(action(move |ctx| {
            let record = record.clone();
            async move {
                for p in ctx.prerequisites {
                    record.record(p);
                }
                Ok(())
            }
        }))
        .register(&registry);

    let scheduler =
        Scheduler::new(registry).with_reporter(Arc::new(MemoryReporter::new()));
    scheduler.run(&["all"], &RunOptions::default()).await?;

    assert_eq!(seen.entries(), [format!("{root}/a.c"), format!("{root}/x[1].c")]);
    Ok(())
}
