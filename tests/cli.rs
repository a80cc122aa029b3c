mod common;

use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;

#[test]
fn invoking_help() {
    let short_help_output = common::command()
        .arg("-h")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    common::command().assert().failure().stderr(short_help_output);

    common::command().arg("--help").assert().success();
}

#[test]
fn missing_repo_dir_argument_fails() {
    common::command().assert().failure();
}

#[test]
fn header_paired_repo_writes_default_output_file() {
    let repo = TempDir::new().unwrap();
    repo.child("widget.c")
        .write_str("#include \"widget.h\"\nint widget(void){return 1;}\n")
        .unwrap();
    repo.child("widget.h").write_str("int widget(void);\n").unwrap();

    common::command()
        .arg(repo.path())
        .current_dir(repo.path())
        .assert()
        .success();

    let repo_name = repo.path().file_name().unwrap().to_str().unwrap();
    repo.child(format!("{repo_name}_combined.h"))
        .assert(predicate::path::exists());
}

#[test]
fn custom_output_path_via_dash_o() {
    let repo = TempDir::new().unwrap();
    repo.child("widget.c")
        .write_str("#include \"widget.h\"\nint widget(void){return 1;}\n")
        .unwrap();
    repo.child("widget.h").write_str("int widget(void);\n").unwrap();
    let out_file = repo.child("out.h");

    common::command()
        .arg(repo.path())
        .arg("-o")
        .arg(out_file.path())
        .assert()
        .success();

    out_file.assert(predicate::str::contains("int widget(void){return 1;}"));
}

#[test]
fn custom_repo_name_changes_include_guard() {
    let repo = TempDir::new().unwrap();
    repo.child("widget.c")
        .write_str("#include \"widget.h\"\nint widget(void){return 1;}\n")
        .unwrap();
    repo.child("widget.h").write_str("int widget(void);\n").unwrap();
    let out_file = repo.child("out.h");

    common::command()
        .arg(repo.path())
        .arg("--name")
        .arg("my-widgets")
        .arg("-o")
        .arg(out_file.path())
        .assert()
        .success();

    out_file.assert(predicate::str::contains("MY_WIDGETS_COMBINED_H"));
}

#[test]
fn forced_headers_strategy_ignores_present_manifest() {
    let repo = TempDir::new().unwrap();
    repo.child("widget.c").write_str("int widget(void){return 1;}\n").unwrap();
    repo.child("widget.h").write_str("int widget(void);\n").unwrap();
    // A manifest naming an entirely different file: Strategy A would match
    // nothing here, so forcing "headers" should still pick widget.c up via
    // its paired header rather than falling through to compile-feedback.
    repo.child("CMakeLists.txt")
        .write_str("add_library(other STATIC nonexistent.c)\n")
        .unwrap();
    let out_file = repo.child("out.h");

    common::command()
        .arg(repo.path())
        .arg("--strategy")
        .arg("headers")
        .arg("-o")
        .arg(out_file.path())
        .assert()
        .success();

    out_file.assert(predicate::str::contains("int widget(void){return 1;}"));
}

#[test]
fn nonexistent_repo_dir_fails() {
    common::command()
        .arg("/nonexistent/path/that/should/not/exist")
        .assert()
        .failure();
}
