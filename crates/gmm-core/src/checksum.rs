//! Size and digests of published files.

use crate::error::Result;
use crate::model::File;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::io::Read;
use std::path::Path;

const BUFFER_SIZE: usize = 4096;

/// Size and lowercase hex digests (no leading zeros) of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub size: u64,
    pub sha512: String,
    pub sha256: String,
    pub sha1: String,
    pub md5: String,
}

impl FileDigest {
    /// Reads `reader` to the end once, feeding every hasher.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut sha512 = Sha512::new();
        let mut sha256 = Sha256::new();
        let mut sha1 = Sha1::new();
        let mut md5 = Md5::new();
        let mut size = 0u64;

        let mut buffer = [0u8; BUFFER_SIZE];
        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            let chunk = &buffer[..read];
            sha512.update(chunk);
            sha256.update(chunk);
            sha1.update(chunk);
            md5.update(chunk);
            size += read as u64;
        }

        Ok(Self {
            size,
            sha512: hex_digest(&sha512.finalize()),
            sha256: hex_digest(&sha256.finalize()),
            sha1: hex_digest(&sha1.finalize()),
            md5: hex_digest(&md5.finalize()),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        tracing::debug!("Computing checksums of {:?}", path);
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }
}

/// Lowercase hex of `digest` read as an unsigned number, so without leading zeros.
fn hex_digest(digest: &[u8]) -> String {
    let hex = hex::encode(digest);
    match hex.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

impl File {
    /// File entry published as `name` whose content is read from `path`.
    pub fn from_artifact(name: impl Into<String>, path: &Path) -> Result<Self> {
        let digest = FileDigest::from_path(path)?;
        let name = name.into();
        Ok(Self {
            url: name.clone(),
            name,
            size: digest.size,
            sha512: digest.sha512,
            sha256: digest.sha256,
            sha1: digest.sha1,
            md5: digest.md5,
        })
    }
}
