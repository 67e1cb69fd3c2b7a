use std::path::Path;

/// Expands `~` and `$VAR` / `${VAR}`; returns the input unchanged if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// `-` stands for stdin (or stdout) on the command line.
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}
