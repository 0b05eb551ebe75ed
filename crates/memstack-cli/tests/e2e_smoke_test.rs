use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use memstack_cli::Args;

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

/// Collects all .csv files from a directory
fn collect_csv_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("csv")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_csv_files(demos_dir());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match memstack_cli::run(&args_for(demo_path, &output_path)) {
            Ok(()) => {
                let written = fs::read_to_string(&output_path).expect("output was not written");
                assert!(written.contains("\"regions\""), "{}", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_csv_files(demos_dir().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if memstack_cli::run(&args_for(demo_path, &output_path)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(
            !output_path.exists(),
            "{} wrote output despite failing",
            demo_path.display()
        );
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

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.csv");
    let output = temp_dir.path().join("out.json");

    let err = memstack_cli::run(&args_for(&missing, &output)).unwrap_err();

    assert!(matches!(err, memstack::MemstackError::Io(_)), "{err:?}");
}
