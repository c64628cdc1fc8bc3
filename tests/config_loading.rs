// tests/config_loading.rs

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use threadme::cli::CliArgs;
use threadme::config::{load_and_validate, load_from_path, resolve, RawRunConfig, RunConfig};
use threadme::errors::ThreadmeError;
use threadme::source::SourceSpec;
use threadme_test_utils::builders::RunConfigBuilder;
use threadme_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn job_file_is_parsed_and_validated() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("job.toml");
    fs::write(
        &path,
        r#"
cmd = "curl -s https://example.test/{{LINE}}"
file = "ids.txt"
concurrency = 8
delay_ms = -3
timeout_ms = 0
stop_on = "429"
while = "200"
shell = "/bin/bash"
"#,
    )?;

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.command, "curl -s https://example.test/{{LINE}}");
    assert_eq!(cfg.source, SourceSpec::Lines(PathBuf::from("ids.txt")));
    assert_eq!(cfg.concurrency, 8);
    assert_eq!(cfg.delay, Duration::from_millis(1));
    assert!(cfg.timeout.is_zero());
    assert_eq!(cfg.triggers.stop_on(), Some("429"));
    assert_eq!(cfg.triggers.continue_while(), Some("200"));
    assert_eq!(cfg.interpreter.program(), PathBuf::from("/bin/bash").as_path());
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("job.toml");
    fs::write(&path, "cmd = \"true\"\nthreads = 4\n")?;

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ThreadmeError::TomlError(_)));
    Ok(())
}

#[test]
fn missing_job_file_is_an_io_error() {
    init_tracing();

    let err = load_from_path("/no/such/dir/job.toml").unwrap_err();
    assert!(matches!(err, ThreadmeError::IoError(_)));
}

#[test]
fn cli_values_override_the_job_file() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("job.toml");
    fs::write(&path, "cmd = \"echo file\"\nconcurrency = 8\ncount = 3\n")?;

    let args = CliArgs {
        config: Some(path),
        cmd: Some("echo cli".into()),
        forever: true,
        ..CliArgs::default()
    };

    let cfg = resolve(&args)?;
    assert_eq!(cfg.command, "echo cli");
    assert_eq!(cfg.concurrency, 8);
    assert_eq!(cfg.source, SourceSpec::Forever);
    Ok(())
}

#[test]
fn no_forever_flag_overrides_the_job_file() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("job.toml");
    fs::write(&path, "cmd = \"true\"\nforever = true\ncount = 4\n")?;

    let from_file = resolve(&CliArgs {
        config: Some(path.clone()),
        ..CliArgs::default()
    })?;
    assert_eq!(from_file.source, SourceSpec::Forever);

    let overridden = resolve(&CliArgs {
        config: Some(path),
        no_forever: true,
        ..CliArgs::default()
    })?;
    assert_eq!(overridden.source, SourceSpec::Count(4));
    Ok(())
}

#[test]
fn forever_flag_conflicts_with_file_from_job_file() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("job.toml");
    fs::write(&path, "cmd = \"true\"\nfile = \"ids.txt\"\n")?;

    let args = CliArgs {
        config: Some(path),
        forever: true,
        ..CliArgs::default()
    };

    assert!(matches!(resolve(&args), Err(ThreadmeError::ConfigError(_))));
    Ok(())
}

#[test]
fn configuration_errors_are_reported() {
    init_tracing();

    let cases = [
        RunConfigBuilder::new("").raw(),
        RunConfigBuilder::new("true").concurrency(1).raw(),
        RunConfigBuilder::new("true").concurrency(0).raw(),
        RunConfigBuilder::new("true").file("ids.txt").forever().raw(),
    ];

    for raw in cases {
        let res = RunConfig::try_from(raw.clone());
        assert!(
            matches!(res, Err(ThreadmeError::ConfigError(_))),
            "expected config error for {raw:?}"
        );
    }
}

#[test]
fn or_fills_only_missing_fields() {
    let cli = RawRunConfig {
        cmd: Some("cli".into()),
        ..RawRunConfig::default()
    };
    let file = RawRunConfig {
        cmd: Some("file".into()),
        count: Some(9),
        ..RawRunConfig::default()
    };

    let merged = cli.or(file);
    assert_eq!(merged.cmd.as_deref(), Some("cli"));
    assert_eq!(merged.count, Some(9));
}
