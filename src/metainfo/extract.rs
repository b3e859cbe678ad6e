//! Extraction of metainfo fields from a decoded dictionary.

use super::types::{FileEntry, FileLayout, Info, Metainfo, PieceHash};
use super::{MetainfoError, MetainfoResult};
use crate::bencode::{encode, Dictionary, Value};

fn required<'v>(dict: &'v Dictionary, field: &'static str) -> MetainfoResult<&'v Value> {
    dict.get(field.as_bytes())
        .ok_or(MetainfoError::MissingField(field))
}

fn text(value: &Value, field: &'static str) -> MetainfoResult<String> {
    let bytes = value
        .try_as_bytes()
        .map_err(|source| MetainfoError::WrongType { field, source })?;
    String::from_utf8(bytes.to_vec()).map_err(|_| MetainfoError::InvalidText(field))
}

fn integer(value: &Value, field: &'static str) -> MetainfoResult<i64> {
    value
        .try_as_integer()
        .map_err(|source| MetainfoError::WrongType { field, source })
}

fn length(value: &Value, field: &'static str) -> MetainfoResult<u64> {
    let n = integer(value, field)?;
    u64::try_from(n).map_err(|_| MetainfoError::InvalidField {
        field,
        reason: format!("negative length {}", n),
    })
}

fn list<'v>(value: &'v Value, field: &'static str) -> MetainfoResult<&'v [Value]> {
    value
        .try_as_list()
        .map_err(|source| MetainfoError::WrongType { field, source })
}

fn dictionary<'v>(value: &'v Value, field: &'static str) -> MetainfoResult<&'v Dictionary> {
    value
        .try_as_dictionary()
        .map_err(|source| MetainfoError::WrongType { field, source })
}

fn optional<T>(
    dict: &Dictionary,
    field: &'static str,
    extract: impl FnOnce(&Value, &'static str) -> MetainfoResult<T>,
) -> MetainfoResult<Option<T>> {
    dict.get(field.as_bytes())
        .map(|value| extract(value, field))
        .transpose()
}

/// Parse `announce-list`: a list of tiers, each a list of URLs.
fn announce_list(value: &Value, field: &'static str) -> MetainfoResult<Vec<Vec<String>>> {
    list(value, field)?
        .iter()
        .map(|tier| -> MetainfoResult<Vec<String>> {
            list(tier, field)?.iter().map(|url| text(url, field)).collect()
        })
        .collect()
}

/// Parse one `files` entry of a multi-file torrent.
fn file_entry(value: &Value) -> MetainfoResult<FileEntry> {
    let dict = dictionary(value, "files")?;
    let path: Vec<String> = list(required(dict, "path")?, "path")?
        .iter()
        .map(|segment| text(segment, "path"))
        .collect::<MetainfoResult<_>>()?;
    if path.is_empty() {
        return Err(MetainfoError::InvalidField {
            field: "path",
            reason: "empty path".to_string(),
        });
    }

    Ok(FileEntry {
        length: length(required(dict, "length")?, "length")?,
        md5sum: optional(dict, "md5sum", text)?,
        path,
    })
}

/// Parse the `info` dictionary.
pub(crate) fn parse_info(dict: &Dictionary) -> MetainfoResult<Info> {
    let piece_length = length(required(dict, "piece length")?, "piece length")?;
    if piece_length == 0 {
        return Err(MetainfoError::InvalidField {
            field: "piece length",
            reason: "must be positive".to_string(),
        });
    }

    let pieces = required(dict, "pieces")?
        .try_as_bytes()
        .map_err(|source| MetainfoError::WrongType {
            field: "pieces",
            source,
        })?;

    let private = optional(dict, "private", integer)?
        .map(|flag| match flag {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(MetainfoError::InvalidField {
                field: "private",
                reason: format!("expected 0 or 1, got {}", other),
            }),
        })
        .transpose()?;

    // Exactly one of `length` and `files` must be present.
    let layout = match (dict.get(&b"length"[..]), dict.get(&b"files"[..])) {
        (Some(len), None) => FileLayout::Single {
            length: length(len, "length")?,
            md5sum: optional(dict, "md5sum", text)?,
        },
        (None, Some(files)) => FileLayout::Multi {
            files: list(files, "files")?
                .iter()
                .map(file_entry)
                .collect::<MetainfoResult<_>>()?,
        },
        (None, None) => return Err(MetainfoError::MissingField("length")),
        (Some(_), Some(_)) => {
            return Err(MetainfoError::InvalidField {
                field: "files",
                reason: "both length and files present".to_string(),
            })
        }
    };

    if layout.total_length().is_none() {
        return Err(MetainfoError::InvalidField {
            field: "files",
            reason: "total length exceeds 64 bits".to_string(),
        });
    }

    Ok(Info {
        piece_length,
        pieces: PieceHash::split(pieces)?,
        private,
        name: text(required(dict, "name")?, "name")?,
        layout,
    })
}

/// Build a [`Metainfo`] from a decoded top-level value.
pub(crate) fn parse_metainfo(value: &Value) -> MetainfoResult<Metainfo> {
    let dict = dictionary(value, "metainfo")?;
    let info_value = required(dict, "info")?;
    let info = parse_info(dictionary(info_value, "info")?)?;

    Ok(Metainfo {
        announce: text(required(dict, "announce")?, "announce")?,
        announce_list: optional(dict, "announce-list", announce_list)?,
        creation_date: optional(dict, "creation date", integer)?,
        comment: optional(dict, "comment", text)?,
        created_by: optional(dict, "created by", text)?,
        encoding: optional(dict, "encoding", text)?,
        info,
        info_bytes: encode(info_value),
    })
}
