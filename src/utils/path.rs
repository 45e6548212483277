use std::path::{Path, PathBuf};
use uzers::os::unix::UserExt;

/// Expand a leading `~` or `~user` in a configured path.
///
/// ```
/// use agent_validator::utils::path::expand_tilde;
///
/// let path = expand_tilde("~/agents").unwrap();
/// assert!(path.ends_with("agents"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_str()?;

    let Some(after_tilde) = path_str.strip_prefix('~') else {
        return Some(path.to_path_buf());
    };

    if after_tilde.is_empty() || after_tilde.starts_with('/') {
        let home = home_dir()?;
        return Some(home.join(after_tilde.trim_start_matches('/')));
    }

    let username_end = after_tilde.find('/').unwrap_or(after_tilde.len());
    let username = &after_tilde[..username_end];
    let rest = after_tilde[username_end..].trim_start_matches('/');

    let user = uzers::get_user_by_name(username)?;
    Some(user.home_dir().join(rest))
}

/// Resolve a configured path, falling back to the literal path when
/// expansion is impossible (no `HOME`, unknown user).
pub fn resolve(path: &str) -> PathBuf {
    expand_tilde(path).unwrap_or_else(|| PathBuf::from(path))
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
