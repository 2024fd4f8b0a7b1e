use std::{fs, path::PathBuf};

use tempfile::tempdir;

use tagflow_cli::{Args, ReportStyle, run};

/// Collects all .tflow files from a directory
fn collect_tflow_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("tflow")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos live at the workspace root, not inside the crate
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: Option<PathBuf>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.map(|path| path.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
        report: ReportStyle::Short,
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_tflow_files(demos_dir());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.toml",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match run(&args_for(demo_path, Some(output_path.clone()))) {
            Ok(_) => {
                let written = fs::read_to_string(&output_path).unwrap_or_default();
                if !written.contains("title = ") {
                    failed_demos.push((demo_path.clone(), "missing TOML output".to_string()));
                }
            }
            Err(e) => failed_demos.push((demo_path.clone(), e.to_string())),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let error_demos = collect_tflow_files(demos_dir().join("errors"));
    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        match run(&args_for(demo_path, None)) {
            Ok(_) => unexpectedly_succeeded.push(demo_path.clone()),
            Err(err) => assert!(
                err.diagnostic().is_some(),
                "{} failed without a diagnostic: {err}",
                demo_path.display()
            ),
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_demo_output_lists_every_object() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("demo.toml");

    let compilation = run(&args_for(
        &demos_dir().join("demo.tflow"),
        Some(output_path.clone()),
    ))
    .unwrap();
    assert_eq!(compilation.diagram().objects().len(), 3);
    assert!(compilation.warnings().is_empty());

    let written = fs::read_to_string(&output_path).unwrap();
    assert!(written.contains("title = \"Demo\""));
    for symbol in ["s1", "s1.a", "s1.b"] {
        assert!(written.contains(&format!("symbol = \"{symbol}\"")));
    }
}

#[test]
fn e2e_explicit_config_is_used() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("tagflow.toml");
    fs::write(&config_path, "[layout]\nmin_columns = 1\nrows_per_subprocess = 5\n").unwrap();

    let mut args = args_for(&demos_dir().join("demo.tflow"), None);
    args.config = Some(config_path.to_string_lossy().to_string());

    let compilation = run(&args).unwrap();
    assert_eq!(compilation.diagram().grid().columns(), 2);
    assert_eq!(compilation.diagram().grid().rows(), 5);
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().unwrap();
    let err = run(&args_for(&temp_dir.path().join("absent.tflow"), None)).unwrap_err();
    assert!(matches!(err, tagflow::TagflowError::Io(_)));
}
