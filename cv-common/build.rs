//! Build identification for the Cities Visited tools
//!
//! Sets `CV_GIT_HASH`, `CV_BUILD_TIMESTAMP` and `CV_BUILD_PROFILE`. The
//! script reruns when the checked-out commit moves, not on every build, so
//! the timestamp is the time of the first build of that commit.

use std::path::PathBuf;
use std::process::Command;

/// Trimmed stdout of a successful git invocation
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    let git_hash =
        git(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let build_timestamp =
        chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false);

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=CV_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=CV_BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=CV_BUILD_PROFILE={}", profile);

    println!("cargo:rerun-if-changed=build.rs");
    if let Some(git_dir) = git(&["rev-parse", "--absolute-git-dir"]) {
        let git_dir = PathBuf::from(git_dir);
        // Branch switches rewrite HEAD; commits on a branch rewrite its ref
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        if let Some(head_ref) = git(&["symbolic-ref", "-q", "HEAD"]) {
            println!("cargo:rerun-if-changed={}", git_dir.join(head_ref).display());
        }
    }
}
