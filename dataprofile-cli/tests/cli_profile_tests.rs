use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE_TSV: &str = "nconst\tprimaryName\tbirthYear\tdeathYear\tprimaryProfession\n\
nm0000001\tFred Astaire\t1899\t1987\tactor,miscellaneous,producer\n\
nm0000002\tLauren Bacall\t1924\t2014\tactress,soundtrack,archive_footage\n\
nm0000003\tBrigitte Bardot\t1934\tNA\tactress,music_department,producer\n\
nm0000004\tJohn Belushi\t1949\t1982\tactor,writer,music_department\n";

fn write_sample(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, SAMPLE_TSV).unwrap();
    path
}

fn dataprofile() -> Command {
    let mut cmd = Command::cargo_bin("dataprofile").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("DATAPROFILE_INPUT")
        .env_remove("DATAPROFILE_OUTPUT")
        .env_remove("DATAPROFILE_TITLE");
    cmd
}

#[test]
fn test_missing_input_prints_message_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.html");

    dataprofile()
        .arg("--input")
        .arg(dir.path().join("absent.tsv"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "❌ Error: File not found! Check the file path.",
        ))
        .stdout(predicate::str::contains("Proceeding").not());

    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_no_arguments_uses_builtin_paths() {
    let dir = TempDir::new().unwrap();

    dataprofile()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("File not found"));

    write_sample(dir.path(), "name.basics.tsv");
    dataprofile()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✅ Report Generated Successfully! Saved at: name_basics_report.html",
        ));

    let report = fs::read_to_string(dir.path().join("name_basics_report.html")).unwrap();
    assert!(report.contains("IMDB Data Profiling Report"));
}

#[test]
fn test_generates_html_report() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "names.tsv");
    let output = dir.path().join("names_report.html");

    dataprofile()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✅ File found. Proceeding with data loading...",
        ))
        .stdout(predicate::str::contains("Fred Astaire"))
        .stdout(predicate::str::contains("[4 rows x 5 columns]"))
        .stdout(predicate::str::contains(format!(
            "Saved at: {}",
            output.display()
        )));

    let html = fs::read_to_string(&output).unwrap();
    assert!(!html.is_empty());
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.trim_end().ends_with("</html>"));
    assert!(html.contains("primaryProfession"));
}

#[test]
fn test_unrecognised_extension_writes_to_given_path() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "names.tsv");
    let output = dir.path().join("report.txt");

    dataprofile()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Saved at: {}",
            output.display()
        )));

    let body = fs::read_to_string(&output).unwrap();
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(!dir.path().join("report.html").exists());
}

#[test]
fn test_second_run_overwrites_report() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "names.tsv");
    let output = dir.path().join("report.html");

    for title in ["First run", "Second run"] {
        dataprofile()
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .arg("--title")
            .arg(title)
            .assert()
            .success();
    }

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("Second run"));
    assert!(!html.contains("First run"));
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "names.tsv");
    let output = dir.path().join("report.json");

    dataprofile()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--minimal")
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["table"]["n_rows"], 4);
    assert_eq!(report["table"]["n_columns"], 5);
    assert!(report["correlations"].is_null());
}

#[test]
fn test_malformed_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.tsv");
    fs::write(&input, "a\tb\n1\t2\t3\n").unwrap();
    let output = dir.path().join("report.html");

    dataprofile()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CSV error"));

    assert!(!output.exists());
}

#[test]
fn test_environment_and_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "names.tsv");
    let output = dir.path().join("report.html");
    let config = dir.path().join("dataprofile.toml");
    fs::write(
        &config,
        format!(
            "input = {:?}\noutput = {:?}\ntitle = \"From config\"\n",
            input.display().to_string(),
            output.display().to_string()
        ),
    )
    .unwrap();

    dataprofile()
        .arg("--config")
        .arg(&config)
        .env("DATAPROFILE_TITLE", "From environment")
        .assert()
        .success();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<title>From environment</title>"));
}
