//! Streaming content fingerprints.
//!
//! # Overview
//!
//! A [`Fingerprint`] is the digest of a file's entire byte stream. Two files
//! with equal fingerprints are treated as duplicates; no byte-level
//! comparison follows.
//!
//! Files are read through a fixed-size buffer, so memory use does not depend
//! on file size. The file handle is owned by the hashing call and is closed
//! on every exit path, including a read that fails halfway through.
//!
//! # Example
//!
//! ```no_run
//! use dlsort::scanner::{fingerprint, HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let fp = fingerprint(Path::new("report.pdf")).unwrap();
//! println!("{fp}");
//!
//! let fast = Hasher::new(HashAlgorithm::Blake3);
//! let fp = fast.fingerprint(Path::new("report.pdf")).unwrap();
//! assert_eq!(fp.to_hex().len(), 64);
//! ```

use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Size of the read buffer used while streaming file content.
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Length of every digest produced by the supported algorithms.
pub const DIGEST_LEN: usize = 32;

/// Hash function used to fingerprint file content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
    /// BLAKE3.
    Blake3,
}

impl HashAlgorithm {
    /// Lowercase name, as accepted by the CLI and the config file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest of a file's full content.
///
/// The algorithm is part of the value: a SHA-256 fingerprint never equals a
/// BLAKE3 fingerprint, even if the digest bytes happened to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    algorithm: HashAlgorithm,
    digest: [u8; DIGEST_LEN],
}

impl Fingerprint {
    /// Build a fingerprint from raw digest bytes.
    #[must_use]
    pub fn from_digest(algorithm: HashAlgorithm, digest: [u8; DIGEST_LEN]) -> Self {
        Self { algorithm, digest }
    }

    /// Algorithm that produced this fingerprint.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Fixed-width lowercase hexadecimal rendering (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(DIGEST_LEN * 2);
        for byte in &self.digest {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.digest {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A fingerprint together with the number of bytes that were hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashedFile {
    /// Content fingerprint
    pub fingerprint: Fingerprint,
    /// Bytes read from the file
    pub size: u64,
}

/// Errors that can occur while fingerprinting a file.
#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    /// The file could not be opened (missing, permissions, broken symlink).
    #[error("cannot open {path}: {source}")]
    Open {
        /// File that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading the file failed partway through.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that failed to read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl FingerprintError {
    /// Path of the file that could not be fingerprinted.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

/// Content hasher bound to a single algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    /// Create a hasher using the given algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Algorithm used by this hasher.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Fingerprint the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`FingerprintError::Open`] if the file cannot be opened
    /// - [`FingerprintError::Read`] if streaming its content fails
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        self.hash_file(path).map(|hashed| hashed.fingerprint)
    }

    /// Fingerprint a file and report how many bytes were hashed.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::fingerprint`].
    pub fn hash_file(&self, path: &Path) -> Result<HashedFile, FingerprintError> {
        let file = File::open(path).map_err(|source| FingerprintError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let (digest, size) = self.hash_reader(file).map_err(|source| FingerprintError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        log::trace!("{} {} ({} bytes)", self.algorithm, path.display(), size);

        Ok(HashedFile {
            fingerprint: Fingerprint::from_digest(self.algorithm, digest),
            size,
        })
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Returns the first non-`Interrupted` read error.
    pub fn hash_reader<R: Read>(&self, reader: R) -> io::Result<([u8; DIGEST_LEN], u64)> {
        let mut digest = [0u8; DIGEST_LEN];
        let size = match self.algorithm {
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                let size = stream(reader, |chunk| hasher.update(chunk))?;
                digest.copy_from_slice(&hasher.finalize());
                size
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                let size = stream(reader, |chunk| {
                    hasher.update(chunk);
                })?;
                digest.copy_from_slice(hasher.finalize().as_bytes());
                size
            }
        };
        Ok((digest, size))
    }
}

/// Fingerprint a file with the default algorithm (SHA-256).
///
/// # Errors
///
/// See [`Hasher::fingerprint`].
pub fn fingerprint(path: &Path) -> Result<Fingerprint, FingerprintError> {
    Hasher::default().fingerprint(path)
}

fn stream<R: Read>(mut reader: R, mut sink: impl FnMut(&[u8])) -> io::Result<u64> {
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(n) => {
                sink(&buffer[..n]);
                total += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
