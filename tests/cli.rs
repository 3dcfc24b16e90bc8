mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::Value;

use common::{NOTES_CSV, TestWorkspace};

fn bin() -> Command {
    Command::cargo_bin("notes-dashboard").expect("binary exists")
}

#[test]
fn build_writes_dataset_json_to_stdout() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);

    let assert = bin()
        .args(["build", "-i", csv.to_str().unwrap()])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let dataset: Value = serde_json::from_str(&stdout).expect("valid json");

    assert_eq!(dataset["notes"].as_array().unwrap().len(), 3);
    assert_eq!(dataset["months"], serde_json::json!(["2024-03", "2024-04"]));
    assert_eq!(dataset["notes"][1]["type"], "video");
    assert!(dataset["highLikesKeywords"].as_array().unwrap().len() <= 30);
    assert!(dataset["highFollowersKeywords"].is_array());
}

#[test]
fn build_finds_newest_export_in_directory() {
    let workspace = TestWorkspace::new();
    workspace.write_aged("笔记数据-旧.csv", "标题,点赞\n旧笔记,1\n", 3_600);
    workspace.write("笔记数据-新.csv", "标题,点赞\n新笔记,2\n");
    let output = workspace.path().join("data.json");

    bin()
        .args([
            "build",
            "--dir",
            workspace.path().to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let dataset: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(dataset["notes"][0]["title"], "新笔记");
}

#[test]
fn publish_embeds_dataset_into_page() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    let page = workspace.write(
        "index.html",
        "<script>\nconst rawData = {\"notes\": []};\nshow(rawData);\n</script>\n",
    );

    bin()
        .args([
            "publish",
            "-i",
            csv.to_str().unwrap(),
            "-d",
            page.to_str().unwrap(),
        ])
        .assert()
        .success();

    let updated = fs::read_to_string(&page).unwrap();
    assert!(updated.contains("早餐分享｜一周不重样"));
    assert!(updated.contains("\"highFollowersKeywords\""));
    assert!(updated.ends_with("};\nshow(rawData);\n</script>\n"));
}

#[test]
fn publish_fails_when_page_has_no_data_block() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    let page = workspace.write("index.html", "<html></html>");

    bin()
        .args([
            "publish",
            "-i",
            csv.to_str().unwrap(),
            "-d",
            page.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("const rawData"));
    assert_eq!(fs::read_to_string(&page).unwrap(), "<html></html>");
}

#[test]
fn commit_message_requires_push() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    bin()
        .args([
            "publish",
            "-i",
            csv.to_str().unwrap(),
            "-d",
            "index.html",
            "-m",
            "update",
        ])
        .assert()
        .failure()
        .stderr(contains("--push"));
}

#[test]
fn input_or_dir_is_required() {
    bin().args(["build"]).assert().failure();
}

#[test]
fn input_and_dir_are_exclusive() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    bin()
        .args([
            "build",
            "-i",
            csv.to_str().unwrap(),
            "--dir",
            workspace.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
}

#[test]
fn empty_directory_reports_missing_export() {
    let workspace = TestWorkspace::new();
    bin()
        .args(["build", "--dir", workspace.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("no input file matching"));
}

#[test]
fn columns_reports_resolution() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    bin()
        .args(["columns", "-i", csv.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("title"))
        .stdout(contains("笔记标题"))
        .stdout(contains("exact"));
}

#[test]
fn preview_limits_rows() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    bin()
        .args(["preview", "-i", csv.to_str().unwrap(), "--rows", "1"])
        .assert()
        .success()
        .stdout(contains("早餐分享｜一周不重样"))
        .stdout(contains("通勤护肤").not());
}

#[test]
fn keywords_rank_by_requested_metric() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    bin()
        .args([
            "keywords",
            "-i",
            csv.to_str().unwrap(),
            "--metric",
            "followers",
            "--selection",
            "1",
            "--top",
            "3",
        ])
        .assert()
        .success()
        .stdout(contains("keyword"))
        .stdout(contains("通勤"))
        .stdout(contains("早餐").not());
}

#[test]
fn config_round_trips_through_file() {
    let workspace = TestWorkspace::new();
    let config = workspace.path().join("pipeline.yaml");
    bin()
        .args(["config", "-o", config.to_str().unwrap()])
        .assert()
        .success();

    let yaml = fs::read_to_string(&config).unwrap();
    assert!(yaml.contains("video_marker"));
    assert!(yaml.contains("input_patterns"));

    let csv = workspace.write("notes.csv", NOTES_CSV);
    bin()
        .args([
            "build",
            "-i",
            csv.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("\"notes\""));
}

#[test]
fn custom_config_changes_video_marker() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("pipeline.yaml", "video_marker: 图文\n");
    let csv = workspace.write("notes.csv", NOTES_CSV);

    let assert = bin()
        .args([
            "build",
            "-i",
            csv.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .success();
    let dataset: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(dataset["notes"][0]["type"], "video");
    assert_eq!(dataset["notes"][1]["type"], "image-text");
}

#[cfg(unix)]
fn fake_git(workspace: &TestWorkspace, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = workspace.write("fake-git.sh", &format!("#!/bin/sh\n{body}\n"));
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");
    script
}

#[cfg(unix)]
#[test]
fn publish_push_runs_add_commit_push() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    let page = workspace.write("index.html", "const rawData = {};\n");
    let log = workspace.path().join("git.log");
    let git = fake_git(&workspace, &format!("echo \"$@\" >> '{}'", log.display()));

    bin()
        .env(notes_dashboard::push::GIT_ENV, &git)
        .args([
            "publish",
            "-i",
            csv.to_str().unwrap(),
            "-d",
            page.to_str().unwrap(),
            "--push",
            "-m",
            "refresh data",
        ])
        .assert()
        .success();

    let calls = fs::read_to_string(&log).unwrap();
    assert_eq!(calls, "add index.html\ncommit -m refresh data\npush\n");
}

#[cfg(unix)]
#[test]
fn push_tolerates_nothing_to_commit() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    let page = workspace.write("index.html", "const rawData = {};\n");
    let git = fake_git(
        &workspace,
        "if [ \"$1\" = commit ]; then echo 'nothing to commit, working tree clean'; exit 1; fi",
    );

    bin()
        .env(notes_dashboard::push::GIT_ENV, &git)
        .args([
            "publish",
            "-i",
            csv.to_str().unwrap(),
            "-d",
            page.to_str().unwrap(),
            "--push",
        ])
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn failed_push_is_reported() {
    let workspace = TestWorkspace::new();
    let csv = workspace.write("notes.csv", NOTES_CSV);
    let page = workspace.write("index.html", "const rawData = {};\n");
    let git = fake_git(
        &workspace,
        "if [ \"$1\" = push ]; then echo 'remote rejected' >&2; exit 1; fi",
    );

    bin()
        .env(notes_dashboard::push::GIT_ENV, &git)
        .args([
            "publish",
            "-i",
            csv.to_str().unwrap(),
            "-d",
            page.to_str().unwrap(),
            "--push",
        ])
        .assert()
        .failure()
        .stderr(contains("remote rejected"));
}
