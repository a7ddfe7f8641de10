//! LocalResourceFetcher - reads resources from a directory on disk.

use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::domain::FetchError;
use crate::ports::{ResourceFetcher, ResourceScope};

/// Resolves every resource path relative to `root`, ignoring the scope.
#[derive(Debug, Clone)]
pub struct LocalResourceFetcher {
    root: PathBuf,
}

impl LocalResourceFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(FetchError::Io {
                path: path.to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "resource path must stay inside the resource root",
                ),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceFetcher for LocalResourceFetcher {
    async fn fetch(&self, _scope: &ResourceScope, path: &str) -> Result<Vec<u8>, FetchError> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(source) => Err(FetchError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_file_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("monaco")).unwrap();
        std::fs::write(dir.path().join("monaco/manifest.yaml"), b"projects: []").unwrap();

        let fetcher = LocalResourceFetcher::new(dir.path());
        let bytes = fetcher
            .fetch(&ResourceScope::default(), "monaco/manifest.yaml")
            .await
            .unwrap();
        assert_eq!(bytes, b"projects: []");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = LocalResourceFetcher::new(dir.path());

        let err = fetcher
            .fetch(&ResourceScope::default(), "nope.yaml")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn parent_components_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = LocalResourceFetcher::new(dir.path());

        let err = fetcher
            .fetch(&ResourceScope::default(), "../etc/passwd")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }
}
