use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::PathBuf;

use anyhow::Result;
use zip::ZipArchive;

/// Something holding the .txt files of a feed
pub trait FeedFiles {
    /// Returns None if the feed doesn't have this file.
    fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>>;
}

pub struct Directory(pub PathBuf);

impl FeedFiles for Directory {
    fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.0.join(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs_err::read(path)?))
    }
}

// Feeds are often zipped with everything inside one top-level folder
impl<R: Read + Seek> FeedFiles for ZipArchive<R> {
    fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let suffix = format!("/{name}");
        let mut candidates: Vec<String> = self
            .file_names()
            .filter(|x| *x == name || x.ends_with(&suffix))
            .map(|x| x.to_string())
            .collect();
        // Prefer the shallowest match
        candidates.sort_by_key(|x| (x.matches('/').count(), x.clone()));
        let path = match candidates.into_iter().next() {
            Some(x) => x,
            None => return Ok(None),
        };

        let mut file = self
            .by_name(&path)
            .map_err(|err| anyhow!("{path}: {err}"))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

/// A feed held in memory, keyed by filename
impl FeedFiles for BTreeMap<String, String> {
    fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(name).map(|x| x.as_bytes().to_vec()))
    }
}
