//! Lexical path containment for caller-supplied relative paths.

use std::path::{Component, Path, PathBuf};

/// Join `relative` onto `root`, refusing anything that would leave `root`.
///
/// Resolution is purely lexical: absolute paths, drive prefixes and `..`
/// components that climb above `root` return `None`. Symlinks are not
/// followed.
pub fn resolve_within(root: &Path, relative: &Path) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                resolved.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_nested_relative_path() {
        let root = Path::new("/srv/blog");
        assert_eq!(
            resolve_within(root, Path::new("src/content/blog/post.md")),
            Some(PathBuf::from("/srv/blog/src/content/blog/post.md"))
        );
    }

    #[test]
    fn parent_components_inside_root_are_allowed() {
        let root = Path::new("/srv/blog");
        assert_eq!(
            resolve_within(root, Path::new("src/../drafts/./a.md")),
            Some(PathBuf::from("/srv/blog/drafts/a.md"))
        );
    }

    #[test]
    fn escaping_root_is_rejected() {
        let root = Path::new("/srv/blog");
        assert_eq!(resolve_within(root, Path::new("../etc/passwd")), None);
        assert_eq!(resolve_within(root, Path::new("a/../../b")), None);
    }

    #[test]
    fn absolute_path_is_rejected() {
        assert_eq!(resolve_within(Path::new("/srv/blog"), Path::new("/etc/passwd")), None);
    }

    #[test]
    fn empty_path_is_root() {
        let root = Path::new("/srv/blog");
        assert_eq!(resolve_within(root, Path::new("")), Some(root.to_path_buf()));
    }
}
