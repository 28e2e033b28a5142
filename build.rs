use std::process::Command;

fn main() {
   build_git_metadata();
}

fn build_git_metadata() {
   println!("cargo:rerun-if-changed=.git/HEAD");
   println!("cargo:rerun-if-changed=.git/refs/");

   let git_hash = Command::new("git")
      .args(["rev-parse", "--short", "HEAD"])
      .output()
      .ok()
      .filter(|o| o.status.success())
      .and_then(|o| String::from_utf8(o.stdout).ok())
      .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string());

   let git_dirty = Command::new("git")
      .args(["status", "--porcelain"])
      .output()
      .ok()
      .filter(|o| o.status.success())
      .is_some_and(|o| !o.stdout.is_empty());

   println!("cargo:rustc-env=GIT_HASH={git_hash}");
   println!("cargo:rustc-env=GIT_DIRTY={}", if git_dirty { "true" } else { "false" });
}
