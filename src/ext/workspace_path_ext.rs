use std::path::{Component, Path, PathBuf};

/// Renders a path for logs and error messages.
///
/// Prefers the canonical form; when the path does not exist (yet) it is made absolute
/// against the current directory and lexically normalized instead.
pub fn best_effort_display(path: &Path) -> String {
    if let Ok(canonical) = path.canonicalize() {
        return canonical.display().to_string();
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|current_dir| current_dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    lexically_normalize(&absolute).display().to_string()
}

fn lexically_normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

pub trait WorkspacePathExt {
    fn best_effort_display(&self) -> String;

    /// Appends `/`-free segments of a relative path, one component each.
    fn join_segments<S: AsRef<str>>(&self, segments: &[S]) -> PathBuf;
}

impl WorkspacePathExt for Path {
    fn best_effort_display(&self) -> String {
        best_effort_display(self)
    }

    fn join_segments<S: AsRef<str>>(&self, segments: &[S]) -> PathBuf {
        segments
            .iter()
            .fold(self.to_path_buf(), |path, segment| path.join(segment.as_ref()))
    }
}

impl WorkspacePathExt for PathBuf {
    fn best_effort_display(&self) -> String {
        best_effort_display(self)
    }

    fn join_segments<S: AsRef<str>>(&self, segments: &[S]) -> PathBuf {
        self.as_path().join_segments(segments)
    }
}
