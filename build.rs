use std::process::Command;

/// Run git and return trimmed stdout, or `None` outside a repository.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());
    let release_tag = format!("v{pkg}");

    // A release build is HEAD sitting exactly on the tag for this version.
    let on_release = git(&["tag", "--points-at", "HEAD"])
        .is_some_and(|tags| tags.lines().any(|t| t == release_tag || t == pkg));

    let version = if on_release {
        pkg
    } else {
        match git(&["rev-parse", "--short", "HEAD"]) {
            Some(hash) if !hash.is_empty() => format!("{pkg}-dev+{hash}"),
            _ => format!("{pkg}-dev"),
        }
    };

    println!("cargo:rustc-env=INLINE_IMAGING_VERSION={version}");
}
