//! Static asset serving module
//!
//! Viewer assets are read once per resolved path and kept for the life of
//! the process; the asset directory is assumed not to change while the
//! server runs.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use hyper::body::Bytes;

use crate::error::{RequestError, StartupError};
use crate::http::{hash_data, mime};

/// A cached static asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub content: Bytes,
    /// SHA-256 of `content`
    pub hash: String,
    pub mime_type: String,
}

/// File access used to populate the cache
#[async_trait]
pub trait AssetReader: Send + Sync {
    /// Whether `path` exists and is a regular file
    async fn is_file(&self, path: &Path) -> bool;

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads assets from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetReader;

#[async_trait]
impl AssetReader for FsAssetReader {
    async fn is_file(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .is_ok_and(|m| m.is_file())
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// Process-lifetime cache of assets below one root directory
pub struct StaticAssetCache {
    root: PathBuf,
    entries: DashMap<PathBuf, Arc<CacheEntry>>,
    reader: Arc<dyn AssetReader>,
}

impl StaticAssetCache {
    /// Cache over `root` reading from the file system
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_reader(root, Arc::new(FsAssetReader))
    }

    pub fn with_reader(root: impl Into<PathBuf>, reader: Arc<dyn AssetReader>) -> Self {
        Self {
            root: root.into(),
            entries: DashMap::new(),
            reader,
        }
    }

    /// Resolve the configured asset directory and build a cache over it
    pub fn open(dir: &str) -> Result<Self, StartupError> {
        let assets_error = |reason: String| StartupError::Assets {
            path: dir.to_string(),
            reason,
        };

        let root = Path::new(dir)
            .canonicalize()
            .map_err(|e| assets_error(e.to_string()))?;
        if !root.is_dir() {
            return Err(assets_error("not a directory".to_string()));
        }

        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of cached assets
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join a request sub-path onto the root, resolving `.` and `..`
    /// lexically
    ///
    /// The result may lie outside the root; [`Self::lookup`] rejects it.
    pub fn resolve(&self, sub_path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        for component in Path::new(sub_path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        resolved
    }

    /// Strict descendant of the root (the root itself is not an asset)
    pub fn contains(&self, file: &Path) -> bool {
        file != self.root && file.starts_with(&self.root)
    }

    /// Cached entry for `file`, reading it on first access
    ///
    /// `Ok(None)` covers paths outside the root, missing files and
    /// non-files; such misses are not cached. Two concurrent first
    /// requests may both read the file, the first insert wins and both
    /// callers get that entry.
    pub async fn lookup(&self, file: &Path) -> Result<Option<Arc<CacheEntry>>, RequestError> {
        if let Some(entry) = self.entries.get(file) {
            return Ok(Some(Arc::clone(entry.value())));
        }

        if !self.contains(file) || !self.reader.is_file(file).await {
            return Ok(None);
        }

        let content = self
            .reader
            .read(file)
            .await
            .map_err(|source| RequestError::AssetRead {
                path: file.display().to_string(),
                source,
            })?;

        let entry = Arc::new(CacheEntry {
            hash: hash_data(&content),
            mime_type: mime::get_content_type(file),
            content: Bytes::from(content),
        });

        let stored = self.entries.entry(file.to_path_buf()).or_insert(entry);
        Ok(Some(Arc::clone(stored.value())))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// File system reader that counts reads and yields before reading
    #[derive(Default)]
    pub struct CountingReader {
        pub reads: AtomicUsize,
    }

    #[async_trait]
    impl AssetReader for CountingReader {
        async fn is_file(&self, path: &Path) -> bool {
            FsAssetReader.is_file(path).await
        }

        async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            FsAssetReader.read(path).await
        }
    }

    /// Reader whose reads always fail after a successful existence check
    pub struct FailingReader;

    #[async_trait]
    impl AssetReader for FailingReader {
        async fn is_file(&self, _path: &Path) -> bool {
            true
        }

        async fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dist");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("swagger-ui.css"), "body { margin: 0 }").unwrap();
        std::fs::create_dir(root.join("nested")).unwrap();
        std::fs::write(root.join("nested").join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();
        (dir, root)
    }

    #[test]
    fn test_resolve() {
        let cache = StaticAssetCache::new("/srv/dist");
        assert_eq!(cache.resolve("/swagger-ui.css"), PathBuf::from("/srv/dist/swagger-ui.css"));
        assert_eq!(cache.resolve("/a/./b/../c.js"), PathBuf::from("/srv/dist/a/c.js"));
        assert_eq!(cache.resolve("/../secret.txt"), PathBuf::from("/srv/secret.txt"));
        assert_eq!(cache.resolve("/"), PathBuf::from("/srv/dist"));
    }

    #[test]
    fn test_contains() {
        let cache = StaticAssetCache::new("/srv/dist");
        assert!(cache.contains(Path::new("/srv/dist/a.js")));
        assert!(!cache.contains(Path::new("/srv/dist")));
        assert!(!cache.contains(Path::new("/srv/dist-evil/a.js")));
        assert!(!cache.contains(Path::new("/srv/secret.txt")));
    }

    #[tokio::test]
    async fn test_lookup_reads_once() {
        let (_dir, root) = fixture();
        let reader = Arc::new(CountingReader::default());
        let cache = StaticAssetCache::with_reader(&root, reader.clone());
        let file = cache.resolve("/swagger-ui.css");

        let first = cache.lookup(&file).await.unwrap().unwrap();
        let second = cache.lookup(&file).await.unwrap().unwrap();

        assert_eq!(first.content, second.content);
        assert_eq!(first.hash, second.hash);
        assert_eq!(&first.content[..], b"body { margin: 0 }");
        assert_eq!(first.hash, hash_data(b"body { margin: 0 }"));
        assert_eq!(first.mime_type, "text/css");
        assert_eq!(reader.reads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_nested_asset_and_mime() {
        let (_dir, root) = fixture();
        let cache = StaticAssetCache::new(&root);
        let entry = cache
            .lookup(&cache.resolve("/nested/logo.png"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_outside_root_not_found() {
        let (dir, root) = fixture();
        let reader = Arc::new(CountingReader::default());
        let cache = StaticAssetCache::with_reader(&root, reader.clone());

        let escaped = cache.resolve("/../secret.txt");
        assert!(escaped.exists());
        assert!(cache.lookup(&escaped).await.unwrap().is_none());
        assert!(cache
            .lookup(&dir.path().join("secret.txt"))
            .await
            .unwrap()
            .is_none());
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_directory_not_cached() {
        let (_dir, root) = fixture();
        let cache = StaticAssetCache::new(&root);
        assert!(cache.lookup(&cache.resolve("/nope.js")).await.unwrap().is_none());
        assert!(cache.lookup(&cache.resolve("/nested")).await.unwrap().is_none());
        assert!(cache.lookup(&cache.resolve("/")).await.unwrap().is_none());
        assert!(cache.is_empty());

        std::fs::write(root.join("nope.js"), "late").unwrap();
        assert!(cache.lookup(&cache.resolve("/nope.js")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_first_lookups_converge() {
        let (_dir, root) = fixture();
        let reader = Arc::new(CountingReader::default());
        let cache = StaticAssetCache::with_reader(&root, reader.clone());
        let file = cache.resolve("/swagger-ui.css");

        let (a, b) = tokio::join!(cache.lookup(&file), cache.lookup(&file));
        let (a, b) = (a.unwrap().unwrap(), b.unwrap().unwrap());

        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert!(reader.reads.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_read_failure_is_an_error() {
        let (_dir, root) = fixture();
        let cache = StaticAssetCache::with_reader(&root, Arc::new(FailingReader));
        let err = cache.lookup(&cache.resolve("/swagger-ui.css")).await.unwrap_err();
        assert!(matches!(err, RequestError::AssetRead { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_open_rejects_missing_dir() {
        assert!(matches!(
            StaticAssetCache::open("/definitely/not/here"),
            Err(StartupError::Assets { .. })
        ));
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(StaticAssetCache::open(file.to_str().unwrap()).is_err());
        let cache = StaticAssetCache::open(dir.path().to_str().unwrap()).unwrap();
        assert!(cache.root().is_absolute());
    }
}
