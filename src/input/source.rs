use async_trait::async_trait;
use crate::input::LoadError;
use std::io;
use std::path::{Path, PathBuf};

/// Somewhere a recorded route can be fetched from.
///
/// Implementations only deliver raw bytes; format detection and parsing
/// happen in the input layer.
#[async_trait]
pub trait RouteSource: Send {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Fetch the raw route document
    async fn fetch(&mut self) -> Result<Vec<u8>, LoadError>;
}

/// Route file on the local filesystem
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.to_string_lossy().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl RouteSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&mut self) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(&self.path).await.map_err(|source| LoadError::Io {
            name: self.name.clone(),
            source,
        })
    }
}

/// In-memory route document, for embedding routes and for tests
pub struct MemorySource {
    name: String,
    data: Option<Vec<u8>>,
    fetch_count: usize,
}

impl MemorySource {
    pub fn new(name: &str, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            data: Some(data.into()),
            fetch_count: 0,
        }
    }

    /// A source that fails every fetch as if the document were missing
    pub fn unreachable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: None,
            fetch_count: 0,
        }
    }

    /// How many times `fetch` has been called
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }
}

#[async_trait]
impl RouteSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&mut self) -> Result<Vec<u8>, LoadError> {
        self.fetch_count += 1;
        match &self.data {
            Some(data) => Ok(data.clone()),
            None => Err(LoadError::Io {
                name: self.name.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no route document"),
            }),
        }
    }
}
