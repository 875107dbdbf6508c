//! Реализации `DocumentStore`: файловая система и память.

use crate::{
    error::{Result, SalaryError},
    traits::DocumentStore,
};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Файлы относительно базового каталога (по умолчанию — текущего).
#[derive(Debug, Clone, Default)]
pub struct FsStore {
    base: Option<PathBuf>,
}

impl FsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        FsStore {
            base: Some(base.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.base {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl DocumentStore for FsStore {
    fn load(&self, path: &str) -> Result<String> {
        Ok(fs::read_to_string(self.resolve(path))?)
    }

    fn save(&mut self, path: &str, contents: &str) -> Result<()> {
        Ok(fs::write(self.resolve(path), contents)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.docs.insert(path.into(), contents.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.docs.get(path).map(String::as_str)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, path: &str) -> Result<String> {
        self.docs.get(path).cloned().ok_or_else(|| {
            SalaryError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{path}: no such document"),
            ))
        })
    }

    fn save(&mut self, path: &str, contents: &str) -> Result<()> {
        self.docs.insert(path.to_string(), contents.to_string());
        Ok(())
    }
}
