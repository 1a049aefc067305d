use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn folder_digest(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("folder-digest").unwrap();
    cmd.current_dir(cwd);
    cmd
}

fn sample_project(parent: &Path) -> PathBuf {
    let root = parent.join("proj");
    fs::create_dir_all(root.join("venv")).unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("notes.md"), "# Notes\n").unwrap();
    fs::write(root.join("script.py"), "print(1)\n").unwrap();
    fs::write(root.join("venv/lib.py"), "import os\n").unwrap();
    fs::write(root.join("docs/guide.txt"), "Read me first.").unwrap();
    fs::write(root.join("logo.png"), [137u8, 80, 78, 71]).unwrap();
    root
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn combines_folder_into_markdown() {
    let temp_dir = TempDir::new().unwrap();
    let root = sample_project(temp_dir.path());

    folder_digest(temp_dir.path())
        .arg(&root)
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPLETED:"));

    let document = fs::read_to_string(temp_dir.path().join("combined_proj.md")).unwrap();

    assert!(document.starts_with("# Contents of proj\n\n## Folder Structure\n- **proj/**\n"));
    assert!(document.contains("  - [notes.md](#notes.md)\n  - [script.py](#script.py)\n  - **docs/**\n    - [guide.txt](#docs-guide.txt)"));
    assert!(document.contains("<a id='docs-guide.txt'></a>\n### docs/guide.txt\n\n"));
    assert!(document.contains("```python\nprint(1)\n\n```"));
    assert!(!document.contains("venv"));
    assert!(!document.contains("logo.png"));
}

#[test]
fn every_outline_link_has_an_anchor() {
    let temp_dir = TempDir::new().unwrap();
    let root = sample_project(temp_dir.path());

    folder_digest(temp_dir.path()).arg(&root).arg("-q").assert().success();

    let document = fs::read_to_string(temp_dir.path().join("combined_proj.md")).unwrap();
    let links: Vec<&str> = document
        .lines()
        .filter_map(|line| line.split_once("](#").map(|(_, rest)| rest.trim_end_matches(')')))
        .collect();

    assert_eq!(links.len(), 3);
    for anchor in links {
        assert!(
            document.contains(&format!("<a id='{}'></a>", anchor)),
            "missing anchor {}",
            anchor
        );
    }
}

#[test]
fn repeated_runs_are_identical() {
    let temp_dir = TempDir::new().unwrap();
    let root = sample_project(temp_dir.path());
    let output = temp_dir.path().join("combined_proj.md");

    folder_digest(temp_dir.path()).arg(&root).arg("-q").assert().success();
    let first = fs::read(&output).unwrap();

    folder_digest(temp_dir.path()).arg(&root).arg("-q").assert().success();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn exclude_flag_replaces_default_exclusions() {
    let temp_dir = TempDir::new().unwrap();
    let root = sample_project(temp_dir.path());

    folder_digest(temp_dir.path())
        .arg(&root)
        .args(["--exclude", "docs", "-q"])
        .assert()
        .success();

    let document = fs::read_to_string(temp_dir.path().join("combined_proj.md")).unwrap();
    assert!(document.contains("### venv/lib.py"));
    assert!(!document.contains("guide.txt"));
}

#[test]
fn output_name_and_directory_flags() {
    let temp_dir = TempDir::new().unwrap();
    let root = sample_project(temp_dir.path());
    let out_dir = temp_dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    folder_digest(temp_dir.path())
        .arg(&root)
        .args(["-o", "handbook", "-q", "--output-dir"])
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.join("handbook.md").exists());
    assert!(!temp_dir.path().join("combined_proj.md").exists());
}

#[test]
fn combines_zip_archive_named_after_stem() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("bundle.zip");
    write_zip(
        &zip_path,
        &[
            ("readme.md", b"# Bundle".as_slice()),
            ("src/app.js", b"run();".as_slice()),
            ("__pycache__/x.py", b"cached".as_slice()),
        ],
    );

    folder_digest(temp_dir.path())
        .arg(&zip_path)
        .arg("-q")
        .assert()
        .success();

    let document = fs::read_to_string(temp_dir.path().join("combined_bundle.md")).unwrap();
    assert!(document.starts_with("# Contents of bundle\n"));
    assert!(document.contains("- **bundle/**"));
    assert!(document.contains("```javascript\nrun();\n```"));
    assert!(!document.contains("cached"));
}

#[test]
fn missing_path_exits_with_two() {
    let temp_dir = TempDir::new().unwrap();

    folder_digest(temp_dir.path())
        .arg("does-not-exist")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid input path"));
}

#[test]
fn plain_file_input_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();

    folder_digest(temp_dir.path())
        .arg("notes.txt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected a folder or a zip archive"));
}

#[test]
fn corrupt_archive_exits_with_three() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("broken.zip"), b"PK\x03\x04garbage").unwrap();

    folder_digest(temp_dir.path())
        .arg("broken.zip")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Archive could not be processed"));

    assert!(!temp_dir.path().join("combined_broken.md").exists());
}

#[test]
fn invalid_config_exits_with_four() {
    let temp_dir = TempDir::new().unwrap();
    let root = sample_project(temp_dir.path());
    fs::write(temp_dir.path().join("bad.toml"), "[filters]\nmax_depth = 0\n").unwrap();

    folder_digest(temp_dir.path())
        .arg(&root)
        .args(["--config", "bad.toml"])
        .assert()
        .code(4);
}

#[test]
fn dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let root = sample_project(temp_dir.path());

    folder_digest(temp_dir.path())
        .arg(&root)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Files to include: 3"))
        .stdout(predicate::str::contains("- [script.py](#script.py)"));

    assert!(!temp_dir.path().join("combined_proj.md").exists());
}

#[test]
fn json_report_lists_counts() {
    let temp_dir = TempDir::new().unwrap();
    let root = sample_project(temp_dir.path());

    folder_digest(temp_dir.path())
        .arg(&root)
        .args(["--output-format", "json", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"files_written\": 3"))
        .stdout(predicate::str::contains("\"source_code\": 1"));
}

#[test]
fn latin1_text_is_decoded() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("legacy");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("menu.txt"), b"caf\xe9 cr\xe8me").unwrap();

    folder_digest(temp_dir.path()).arg(&root).arg("-q").assert().success();

    let document = fs::read_to_string(temp_dir.path().join("combined_legacy.md")).unwrap();
    assert!(document.contains("café crème"));
}

#[test]
fn extraction_failures_are_reported_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("office");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("broken.docx"), b"not a word document").unwrap();
    fs::write(root.join("notes.txt"), "fine").unwrap();

    folder_digest(temp_dir.path())
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("broken.docx"));

    folder_digest(temp_dir.path())
        .arg(&root)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("broken.docx").not());

    let document = fs::read_to_string(temp_dir.path().join("combined_office.md")).unwrap();
    assert!(document.contains("### broken.docx"));
    assert!(document.contains("Error extracting DOCX content"));
}

#[test]
fn medical_report_gets_structured_layout() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("clinic");
    fs::create_dir(&root).unwrap();
    fs::write(
        root.join("zprava.txt"),
        "Pacient: Jan Novák\nDatum: 1.1.2024\nDg.: J06.9\n",
    )
    .unwrap();

    folder_digest(temp_dir.path()).arg(&root).arg("-q").assert().success();

    let document = fs::read_to_string(temp_dir.path().join("combined_clinic.md")).unwrap();
    assert!(document.contains("# LÉKAŘSKÁ ZPRÁVA"));
    assert!(document.contains("| Pacient | Jan Novák |"));
    assert!(document.contains("## Výsledky vyšetření\n```\nDg.: J06.9\n```"));
}

#[test]
fn generate_config_writes_sample() {
    let temp_dir = TempDir::new().unwrap();

    folder_digest(temp_dir.path())
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("folder-digest.toml"));

    let content = fs::read_to_string(temp_dir.path().join("folder-digest.toml")).unwrap();
    assert!(content.contains("exclude_dirs"));
}
