//! Platform path layout.
//!
//! Paths here are logical, forward-slash paths inside the shared workspace
//! volume. Nothing touches the filesystem.

/// Last component of every analyses directory
pub const ANALYSES_SEGMENT: &str = "analyses";

/// Directory holding a user's analyses within an organization
pub fn analyses_dir(org: &str, user: &str) -> String {
    join_paths(&[org, user, ANALYSES_SEGMENT])
}

/// Join path segments with `/` and normalize the result.
///
/// Empty segments are skipped and a segment starting with `/` restarts the
/// path from the root.
pub fn join_paths<S: AsRef<str>>(segments: &[S]) -> String {
    let mut absolute = false;
    let mut parts: Vec<&str> = Vec::new();

    for segment in segments.iter().map(AsRef::as_ref).filter(|s| !s.is_empty()) {
        if segment.starts_with('/') {
            parts.clear();
            absolute = true;
        }
        parts.push(segment);
    }

    let normalized = normalize_path(&parts.join("/"));
    if absolute && !normalized.starts_with('/') {
        format!("/{}", normalized)
    } else {
        normalized
    }
}

/// Normalize a path by resolving `.` and `..` components and collapsing
/// repeated slashes
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut components: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => {
                // Skip current directory and empty components
            },
            ".." => {
                match components.last() {
                    Some(&last) if last != ".." => {
                        components.pop();
                    },
                    // Nothing above the root
                    _ if absolute => {},
                    _ => components.push(component),
                }
            },
            other => components.push(other),
        }
    }

    let joined = components.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
