//! Metainfo types: PieceHash, Info, FileLayout, Metainfo.

use serde::{Serialize, Serializer};

use super::{MetainfoError, MetainfoResult};

/// Length of one SHA-1 piece hash.
pub const PIECE_HASH_LEN: usize = 20;

/// A 20-byte SHA-1 hash of one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceHash(pub [u8; PIECE_HASH_LEN]);

impl Serialize for PieceHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl PieceHash {
    /// Split a concatenated `pieces` string into hashes.
    pub fn split(pieces: &[u8]) -> MetainfoResult<Vec<PieceHash>> {
        if pieces.len() % PIECE_HASH_LEN != 0 {
            return Err(MetainfoError::InvalidField {
                field: "pieces",
                reason: format!(
                    "length {} is not a multiple of {}",
                    pieces.len(),
                    PIECE_HASH_LEN
                ),
            });
        }

        Ok(pieces
            .chunks_exact(PIECE_HASH_LEN)
            .map(|chunk| {
                let mut arr = [0u8; PIECE_HASH_LEN];
                arr.copy_from_slice(chunk);
                PieceHash(arr)
            })
            .collect())
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// One entry of a multi-file torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// File size in bytes
    pub length: u64,
    /// Optional hex MD5 of the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5sum: Option<String>,
    /// Path segments below the torrent's root directory
    pub path: Vec<String>,
}

/// How the payload is laid out on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FileLayout {
    /// `name` is a single file.
    Single {
        /// File size in bytes
        length: u64,
        /// Optional hex MD5 of the file
        #[serde(skip_serializing_if = "Option::is_none")]
        md5sum: Option<String>,
    },
    /// `name` is a directory holding `files`.
    Multi {
        /// Files in payload order
        files: Vec<FileEntry>,
    },
}

impl FileLayout {
    /// Total payload size in bytes, or `None` if it does not fit in a `u64`.
    pub fn total_length(&self) -> Option<u64> {
        match self {
            FileLayout::Single { length, .. } => Some(*length),
            FileLayout::Multi { files } => files
                .iter()
                .try_fold(0u64, |total, f| total.checked_add(f.length)),
        }
    }
}

/// The `info` dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    /// Bytes per piece
    pub piece_length: u64,
    /// SHA-1 hash of every piece
    pub pieces: Vec<PieceHash>,
    /// Private flag (BEP 27), if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Suggested file or directory name
    pub name: String,
    /// Single or multi-file layout
    pub layout: FileLayout,
}

/// A decoded `.torrent` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metainfo {
    /// Tracker URL
    pub announce: String,
    /// Tiers of backup tracker URLs (BEP 12)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announce_list: Option<Vec<Vec<String>>>,
    /// Creation time, seconds since the Unix epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<i64>,
    /// Free-form comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Name and version of the creating program
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Encoding used for text fields of `info`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Parsed `info` dictionary
    pub info: Info,
    /// Canonical encoding of the `info` dictionary
    #[serde(skip)]
    pub(crate) info_bytes: Vec<u8>,
}

impl Metainfo {
    /// Canonical bencode of the `info` dictionary.
    ///
    /// This is a re-encoding of the decoded dictionary, not a slice of the
    /// input. For input accepted in strict mode the two are identical. After a
    /// lenient decode of unsorted or repeated keys they differ, and a hash of
    /// these bytes will not match the info-hash other clients compute over the
    /// original file.
    pub fn info_bytes(&self) -> &[u8] {
        &self.info_bytes
    }
}
