use std::{
    collections::BTreeMap,
    fmt::Debug,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/**
A source of template files. Paths are always relative to the root of
the source.
*/
pub trait FileSystem: Debug + Send + Sync + 'static {
    /// every file below the root, recursively, in a stable order.
    /// Directories are not listed.
    fn files(&self) -> io::Result<Vec<PathBuf>>;

    /// the full contents of a file returned by [`FileSystem::files`]
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Templates stored in a directory on disk
#[derive(Debug, Clone)]
pub struct Directory(PathBuf);

impl Directory {
    /// builds a Directory rooted at `root`. The root is not checked
    /// until the first load.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    /// the root directory
    pub fn root(&self) -> &Path {
        &self.0
    }
}

impl FileSystem for Directory {
    fn files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = vec![];
        for entry in WalkDir::new(&self.0).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&self.0) {
                files.push(relative.to_path_buf());
            }
        }
        Ok(files)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.0.join(path))
    }
}

/**
Templates held in memory, for generated or embedded sources

```
use std::path::Path;
use trillium_views::{FileSystem, MemoryFileSystem};

let fs = MemoryFileSystem::new()
    .with_file("index.hbs", "<h1>{{Title}}</h1>")
    .with_file("layouts/main.hbs", "<body>{{{embed}}}</body>");

assert_eq!(fs.files().unwrap().len(), 2);
assert_eq!(fs.read(Path::new("index.hbs")).unwrap(), b"<h1>{{Title}}</h1>");
```
*/
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem(BTreeMap<PathBuf, Vec<u8>>);

impl MemoryFileSystem {
    /// builds an empty MemoryFileSystem
    pub fn new() -> Self {
        Self::default()
    }

    /// adds or replaces a file
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.0.insert(path.into(), contents.into());
    }

    /// chainable form of [`MemoryFileSystem::insert`]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn files(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self.0.keys().cloned().collect())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.0.get(path).cloned().ok_or_else(|| not_found(path))
    }
}

#[cfg(feature = "include_dir")]
impl FileSystem for include_dir::Dir<'static> {
    fn files(&self) -> io::Result<Vec<PathBuf>> {
        fn collect(dir: &include_dir::Dir<'static>, files: &mut Vec<PathBuf>) {
            files.extend(dir.files().map(|file| file.path().to_path_buf()));
            for dir in dir.dirs() {
                collect(dir, files);
            }
        }

        let mut files = vec![];
        collect(self, &mut files);
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.get_file(path)
            .map(|file| file.contents().to_vec())
            .ok_or_else(|| not_found(path))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}
