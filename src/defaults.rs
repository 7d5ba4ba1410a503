//! Default values shared by the library and the CLI.
//!
//! Keeping them in one place ensures the dry-run preview, the live commit
//! path and the command-line help all agree.

/// Ledger filename looked up in the current directory when `--patch-list`
/// is not given.
pub const DEFAULT_LEDGER_FILENAME: &str = "patch_list.txt";

/// Name of the filesystem entry that marks a repository root.
pub const DEFAULT_REPOSITORY_MARKER: &str = ".git";

/// Label printed in place of the empty repository path of the root repository.
pub const ROOT_REPOSITORY_LABEL: &str = "(root)";

/// Summary used when a CR's description has no non-blank line.
pub const NO_DESCRIPTION: &str = "No Description";

/// Body placeholder used when a CR has neither a full description nor a summary.
pub const NO_DESCRIPTION_PLACEHOLDER: &str = "(no description)";

/// Returns the printable name of a repository path.
pub fn repository_label(project: &str) -> &str {
    if project.is_empty() {
        ROOT_REPOSITORY_LABEL
    } else {
        project
    }
}
