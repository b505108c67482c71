//! Program loading: all input files parsed into one shared arena.

use crate::error::Error;
use go_syntax::ast::{AstArena, Interner, SourceFile};
use go_syntax::parse_file;
use std::path::{Path, PathBuf};

pub struct LoadedFile {
    pub path: PathBuf,
    pub file: SourceFile,
}

pub struct Program {
    pub arena: AstArena,
    pub interner: Interner,
    pub files: Vec<LoadedFile>,
}

impl Program {
    /// Read and parse every path. Any I/O or parse failure is fatal; no
    /// partially loaded program is returned.
    pub fn load(paths: &[PathBuf]) -> Result<Self, Error> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let src = std::fs::read_to_string(path).map_err(|source| Error::Load {
                path: path.clone(),
                source: source.into(),
            })?;
            sources.push((path.clone(), src));
        }
        Self::parse_all(sources)
    }

    /// Load from in-memory sources (tests and the expansion pipeline).
    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self, Error> {
        Self::parse_all(
            sources
                .iter()
                .map(|(name, src)| (PathBuf::from(name), (*src).to_string()))
                .collect(),
        )
    }

    fn parse_all(sources: Vec<(PathBuf, String)>) -> Result<Self, Error> {
        let mut arena = AstArena::new();
        let mut interner = Interner::new();
        let mut files = Vec::with_capacity(sources.len());
        for (path, src) in sources {
            let file = parse_file(&mut arena, &mut interner, &src).map_err(|source| {
                Error::Load {
                    path: path.clone(),
                    source: source.into(),
                }
            })?;
            files.push(LoadedFile { path, file });
        }
        Ok(Self {
            arena,
            interner,
            files,
        })
    }

    pub fn file_named(&self, path: &Path) -> Option<&LoadedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}
