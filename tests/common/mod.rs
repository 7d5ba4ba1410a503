//! Shared test utilities for E2E tests.
//!
//! This module provides a source-tree fixture and ledger snippets to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_repo("frameworks/base")
//!         .with_file("frameworks/base/a.c", "int a;\n")
//!         .with_ledger(ledgers::SINGLE);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::ledgers;
    pub use super::TestFixture;
}

/// Ledger snippets for testing.
#[allow(dead_code)]
pub mod ledgers {
    /// One CR touching one file in `frameworks/base`.
    pub const SINGLE: &str = "\
Patch Type:
  Customer Request
CR ID: ALPS100
Severity:
  Critical
Description:
  Fix camera crash
Associated Files:
  frameworks/base/core/Camera.java
";

    /// Two CRs sharing a file in `frameworks/base`, the first one also
    /// touching `vendor/mtk`, and a third CR landing in the same two
    /// repositories.
    pub const MULTI_REPO: &str = "\
Patch Type:
  Customer Request
CR ID: ALPS100
Severity:
  Critical
Description:
  Fix camera crash
Associated Files:
  frameworks/base/core/Camera.java
  vendor/mtk/camera.c
Patch Type:
  Customer Request
CR ID:
  ALPS200
Severity:

Description:
  Tune camera
Associated Files:
  frameworks/base/core/Camera.java
Patch Type:
  Security
CR ID: ALPS300
Severity:
  High
Description:
  [Google Security Patch][CVE-2024-0001]Null pointer fix
Associated Files:
  frameworks/base/media/Codec.java
  vendor/mtk/codec.c
";

    /// A block without a CR ID and a file no repository owns.
    pub const WITH_ORPHANS: &str = "\
Patch Type:
  Customer Request
Severity:
  Major
Description:
  This block has no CR ID
Associated Files:
  frameworks/base/core/Camera.java
Patch Type:
  Customer Request
CR ID: ALPS100
Severity:
  Major
Description:
  Fix camera crash
Associated Files:
  frameworks/base/core/Camera.java
  external/unowned/lib.c
";
}

/// A temporary source tree with repositories, files and a ledger.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_repo("frameworks/base")
///     .with_file("frameworks/base/a.c", "int a;\n")
///     .with_ledger(ledgers::SINGLE);
///
/// fixture.command().arg("--dry-run").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Mark `path` as a repository root by creating a `.git` directory.
    pub fn with_repo(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .child(".git")
            .create_dir_all()
            .expect("Failed to create repository marker");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Write `patch_list.txt` at the fixture root.
    pub fn with_ledger(self, content: &str) -> Self {
        self.with_file("patch_list.txt", content)
    }

    /// The camera tree used by [`ledgers::SINGLE`] and [`ledgers::MULTI_REPO`].
    #[allow(dead_code)]
    pub fn with_camera_tree(self) -> Self {
        self.with_repo("frameworks/base")
            .with_repo("vendor/mtk")
            .with_file("frameworks/base/core/Camera.java", "class Camera {}\n")
            .with_file("frameworks/base/media/Codec.java", "class Codec {}\n")
            .with_file("vendor/mtk/camera.c", "int camera;\n")
            .with_file("vendor/mtk/codec.c", "int codec;\n")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in this fixture's directory with `--root .`
    /// and `--p-tag P27`.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("patch-commit");
        cmd.current_dir(self.path())
            .env_remove("PATCH_COMMIT_LEDGER")
            .env_remove("RUST_LOG")
            .args(["--root", ".", "--p-tag", "P27", "--color", "never"]);
        cmd
    }

    /// Run `git` in `repo` and return its stdout. Panics on failure.
    #[allow(dead_code)]
    pub fn git(&self, repo: &str, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path().join(repo))
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Turn `repo` into a real git repository with an initial commit of its
    /// current content.
    #[allow(dead_code)]
    pub fn init_git_repo(&self, repo: &str) {
        let marker = self.path().join(repo).join(".git");
        if marker.is_dir() {
            std::fs::remove_dir_all(&marker).expect("Failed to remove marker");
        }
        self.git(repo, &["init", "-q"]);
        self.git(repo, &["config", "user.name", "test-user"]);
        self.git(repo, &["config", "user.email", "test@example.com"]);
        self.git(repo, &["config", "commit.gpgsign", "false"]);
        self.git(repo, &["add", "-A"]);
        self.git(repo, &["commit", "-q", "--allow-empty", "-m", "initial"]);
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_repo() {
        let fixture = TestFixture::new().with_repo("a/b");
        assert!(fixture.path().join("a/b/.git").is_dir());
    }

    #[test]
    fn test_fixture_with_ledger() {
        let fixture = TestFixture::new().with_ledger(ledgers::SINGLE);
        assert!(fixture.path().join("patch_list.txt").exists());
    }
}
