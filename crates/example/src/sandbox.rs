//! The directory the assistant may touch.

use std::io;
use std::path::{Component, Path, PathBuf};

/// A working directory that tool paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Opens a sandbox rooted at an existing directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is not a directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// Returns the sandbox root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative path inside the sandbox.
    ///
    /// Returns `None` for absolute paths and paths that climb out with `..`.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if resolved == self.root {
                        return None;
                    }
                    resolved.pop();
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> Sandbox {
        Sandbox::new(env!("CARGO_MANIFEST_DIR")).unwrap()
    }

    #[test]
    fn relative_paths_stay_inside() {
        let sandbox = sandbox();
        assert_eq!(
            sandbox.resolve_path("src/lib.rs"),
            Some(sandbox.root().join("src").join("lib.rs"))
        );
        assert_eq!(sandbox.resolve_path("."), Some(sandbox.root().to_path_buf()));
        assert_eq!(
            sandbox.resolve_path("src/../Cargo.toml"),
            Some(sandbox.root().join("Cargo.toml"))
        );
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let sandbox = sandbox();
        assert_eq!(sandbox.resolve_path(".."), None);
        assert_eq!(sandbox.resolve_path("src/../../secret"), None);
        assert_eq!(sandbox.resolve_path("/etc/passwd"), None);
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(Sandbox::new("/definitely/not/a/real/dir").is_err());
        assert!(Sandbox::new(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml")).is_err());
    }
}
