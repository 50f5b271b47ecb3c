//! Custom cargo commands for episode-search.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests
//!   cargo xtask check     - Quick check (check + test + clippy)
//!   cargo xtask fuzz      - Run every fuzz target for a short while
//!   cargo xtask bench     - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Fuzz targets, as named in fuzz/Cargo.toml.
const FUZZ_TARGETS: &[&str] = &["url_state_decode", "highlight_sanitize", "session_transitions"];

/// Seconds per target for `cargo xtask fuzz` unless overridden.
const DEFAULT_FUZZ_SECONDS: u64 = 30;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let task = args.next();
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("check") => check()?,
        Some("fuzz") => {
            let seconds = match args.next() {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("fuzz duration must be whole seconds, got {:?}", raw))?,
                None => DEFAULT_FUZZ_SECONDS,
            };
            fuzz(seconds)?
        }
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify          Run full verification suite (tests + clippy + fuzz smoke)
  test            Run all Rust tests
  check           Quick check (cargo check + test + clippy)
  fuzz [SECONDS]  Run each fuzz target for SECONDS (default {})
  bench           Run benchmarks
"#,
        DEFAULT_FUZZ_SECONDS
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("episode-search Verification Suite");
    println!("==========================================\n");

    println!("[1/4] Checking pagination constants...");
    check_pagination_constants()?;
    println!("✓ First page 50, load more 10\n");

    println!("[2/4] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All Rust tests passed\n");

    println!("[3/4] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("[4/4] Fuzz smoke run...");
    if has_cargo_fuzz() {
        fuzz(5)?;
        println!("✓ Fuzz targets survived\n");
    } else {
        println!("  (cargo-fuzz not installed, skipping)\n");
    }

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run every fuzz target for `seconds` each (needs nightly + cargo-fuzz)
fn fuzz(seconds: u64) -> Result<()> {
    let root = project_root()?;
    let max_time = format!("-max_total_time={}", seconds);

    for target in FUZZ_TARGETS {
        println!("  fuzzing {} for {}s...", target, seconds);
        let status = Command::new("cargo")
            .args(["+nightly", "fuzz", "run", target, "--", &max_time])
            .current_dir(&root)
            .status()
            .with_context(|| format!("Failed to run cargo fuzz for {}", target))?;

        if !status.success() {
            bail!("fuzz target {} failed; see fuzz/artifacts/{}", target, target);
        }
    }

    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

fn has_cargo_fuzz() -> bool {
    Command::new("cargo")
        .args(["fuzz", "--version"])
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// The backend contract pins the page sizes; catch an accidental edit.
fn check_pagination_constants() -> Result<()> {
    let root = project_root()?;
    let request_rs = std::fs::read_to_string(root.join("src/request.rs"))
        .context("Failed to read src/request.rs")?;

    let first = extract_const(&request_rs, "FIRST_PAGE_LIMIT");
    let page = extract_const(&request_rs, "PAGE_SIZE");

    if first != Some(50) {
        bail!("FIRST_PAGE_LIMIT is {:?}, expected 50", first);
    }
    if page != Some(10) {
        bail!("PAGE_SIZE is {:?}, expected 10", page);
    }

    Ok(())
}

fn extract_const(content: &str, name: &str) -> Option<u64> {
    // Look for "pub const NAME: usize = 50;"
    let needle = format!("const {}:", name);
    content
        .lines()
        .find(|line| line.contains(&needle))
        .and_then(|line| line.split('=').nth(1))
        .map(|rhs| rhs.trim().trim_end_matches(';').trim().replace('_', ""))
        .and_then(|num| num.parse().ok())
}
