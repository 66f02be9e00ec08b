use std::{fs, path::PathBuf};

use tempfile::tempdir;

use arbor::ArborError;
use arbor_cli::{Args, CliError, OutputFormat, run};

fn fixtures(kind: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(kind)
}

/// Collects all .toml files from a directory
fn collect_toml_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args(input: &PathBuf, output: PathBuf, format: OutputFormat) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        format,
        config: None,
        strict: false,
        diff: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid = collect_toml_files(fixtures("valid"));
    assert!(!valid.is_empty(), "No valid fixtures found");

    let mut failed = Vec::new();

    for path in &valid {
        let stem = path.file_stem().unwrap().to_string_lossy().to_string();
        for (format, extension) in [
            (OutputFormat::Svg, "svg"),
            (OutputFormat::Mermaid, "mmd"),
            (OutputFormat::Plantuml, "puml"),
        ] {
            let output = temp_dir.path().join(format!("{stem}.{extension}"));
            match run(&args(path, output.clone(), format)) {
                Ok(()) => {
                    let content = fs::read_to_string(&output).expect("output written");
                    assert!(!content.is_empty(), "{} is empty", output.display());
                }
                Err(e) => failed.push((path.clone(), format, e)),
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid fixtures that failed:");
        for (path, format, err) in &failed {
            eprintln!("  - {} ({format}): {err}", path.display());
        }
        panic!("{} valid fixture run(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let errors = collect_toml_files(fixtures("errors"));
    assert!(!errors.is_empty(), "No error fixtures found");

    let mut unexpectedly_succeeded = Vec::new();

    for path in &errors {
        let output = temp_dir.path().join(format!(
            "error_{}.svg",
            path.file_stem().unwrap().to_string_lossy()
        ));
        if run(&args(path, output, OutputFormat::Svg)).is_ok() {
            unexpectedly_succeeded.push(path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError fixtures that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error fixture(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_error_kinds() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let run_fixture = |name: &str| {
        let input = fixtures("errors").join(name);
        run(&args(&input, temp_dir.path().join("out.svg"), OutputFormat::Svg))
            .expect_err("fixture must fail")
    };

    assert!(matches!(
        run_fixture("duplicate_name.toml"),
        CliError::Arbor(ArborError::DuplicateResourceName { name }) if name == "dup"
    ));
    assert!(matches!(
        run_fixture("missing_target.toml"),
        CliError::Arbor(ArborError::ConnectionTargetNotFound { name, .. }) if name == "missing"
    ));
    assert!(matches!(run_fixture("malformed.toml"), CliError::Input { .. }));
    assert!(matches!(
        run_fixture("bad_color.toml"),
        CliError::Arbor(ArborError::Config(_))
    ));
}

#[test]
fn e2e_strict_icons_fail_without_icon_directories() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = fixtures("valid").join("layered.toml");
    let mut args = args(&input, temp_dir.path().join("out.svg"), OutputFormat::Svg);
    args.strict = true;

    assert!(matches!(
        run(&args),
        Err(CliError::Arbor(ArborError::IconNotFound { .. }))
    ));
}

#[test]
fn e2e_config_icon_directory() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let icons = temp_dir.path().join("icons");
    fs::create_dir(&icons).expect("create icon dir");
    fs::write(icons.join("10021-icon-service-Virtual-Machine.svg"), "<svg/>").expect("icon");

    let config = temp_dir.path().join("arbor.toml");
    fs::write(
        &config,
        format!(
            "[[icons.directories]]\nnamespace = \"azure\"\npath = {:?}\n",
            icons.display().to_string()
        ),
    )
    .expect("config");

    let input = temp_dir.path().join("vm.toml");
    fs::write(&input, "[[resources]]\ntype = \"azure/vm\"\nname = \"vm1\"\n").expect("input");

    let output = temp_dir.path().join("vm.svg");
    let mut args = args(&input, output.clone(), OutputFormat::Svg);
    args.config = Some(config.to_string_lossy().to_string());
    args.strict = true;

    run(&args).expect("vm icon resolves");
    let svg = fs::read_to_string(&output).expect("output written");
    assert!(svg.contains("<image"));
}

#[test]
fn e2e_diff_against_previous_version() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = fixtures("valid").join("hub_spoke.toml");
    let old = temp_dir.path().join("old.toml");
    fs::write(&old, "[[resources]]\ntype = \"azure/vm\"\nname = \"legacy\"\n").expect("old");

    let output = temp_dir.path().join("hub_spoke.puml");
    let mut args = args(&input, output.clone(), OutputFormat::Plantuml);
    args.diff = Some(old.to_string_lossy().to_string());

    run(&args).expect("diff does not affect rendering");
    let content = fs::read_to_string(&output).expect("output written");
    assert!(content.starts_with("@startuml\n"));

    // A broken previous version is reported like a broken input
    fs::write(&old, "[[resources]]\ntype = \"azure/vm\"\n").expect("old");
    assert!(matches!(run(&args), Err(CliError::Input { .. })));
}
