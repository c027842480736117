/// Known shells
///
/// Each shell keeps its history somewhere different and in its own format.

use std::path::{Path, PathBuf};

/// Shells whose history we know how to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
    PowerShell,
}

impl Shell {
    /// Every shell, in the order their history files are loaded
    pub const ALL: [Shell; 4] = [Shell::Zsh, Shell::Bash, Shell::Fish, Shell::PowerShell];

    /// Get the shell name as a string
    pub fn name(&self) -> &str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        }
    }

    /// Default history file for this shell, relative to the home directory
    pub fn history_file(&self, home: &Path) -> PathBuf {
        match self {
            Shell::Zsh => home.join(".zsh_history"),
            Shell::Bash => home.join(".bash_history"),
            Shell::Fish => home.join(".local/share/fish/fish_history"),
            // PSReadLine's location on Linux and macOS
            Shell::PowerShell => {
                home.join(".local/share/powershell/PSReadLine/ConsoleHost_history.txt")
            }
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
