#![allow(dead_code)]
use std::path::PathBuf;

use assert_cmd::Command;
use once_cell::sync::Lazy;

static BINARY: Lazy<PathBuf> =
    Lazy::new(|| assert_cmd::cargo::cargo_bin(assert_cmd::crate_name!()));

pub fn command() -> Command {
    Command::new(&*BINARY)
}
