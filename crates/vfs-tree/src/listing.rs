//! Raw folder listings as returned by the storage backend
//!
//! The backend only knows a flat list of `(id, parent, name)` tuples. When no
//! folder exists at all it answers with the literal `NONE` instead of an
//! empty list.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, FolderId, Result};

/// Literal the backend returns for an empty folder listing.
pub const EMPTY_SENTINEL: &str = "NONE";

/// One untreated `(id, parent, name)` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFolder {
    pub id: FolderId,
    pub parent: FolderId,
    pub name: String,
}

impl RawFolder {
    pub fn new(id: impl Into<FolderId>, parent: impl Into<FolderId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: parent.into(),
            name: name.into(),
        }
    }
}

impl From<(u64, u64, &str)> for RawFolder {
    fn from((id, parent, name): (u64, u64, &str)) -> Self {
        Self::new(id, parent, name)
    }
}

/// A complete folder listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Listing {
    /// The backend reported that there are no folders.
    #[default]
    Empty,
    Folders(Vec<RawFolder>),
}

impl Listing {
    /// Parse the backend's textual listing.
    ///
    /// Records are separated by whitespace and have the form
    /// `id,parent,name`. Only the first two commas are field separators, so
    /// names may contain commas but not whitespace.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text == EMPTY_SENTINEL {
            return Ok(Self::Empty);
        }

        text.split_whitespace()
            .map(parse_record)
            .collect::<Result<Vec<_>>>()
            .map(Self::Folders)
    }

    /// The raw tuples, empty for [`Listing::Empty`].
    pub fn folders(&self) -> &[RawFolder] {
        match self {
            Self::Empty => &[],
            Self::Folders(folders) => folders,
        }
    }

    pub fn len(&self) -> usize {
        self.folders().len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders().is_empty()
    }
}

impl FromStr for Listing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromIterator<RawFolder> for Listing {
    fn from_iter<I: IntoIterator<Item = RawFolder>>(iter: I) -> Self {
        Self::Folders(iter.into_iter().collect())
    }
}

fn parse_record(record: &str) -> Result<RawFolder> {
    let mut fields = record.splitn(3, ',');
    let id = parse_id(record, fields.next(), "folder id")?;
    let parent = parse_id(record, fields.next(), "parent id")?;
    let name = match fields.next() {
        Some(name) if !name.is_empty() => name,
        Some(_) => return Err(Error::malformed(record, "empty folder name")),
        None => return Err(Error::malformed(record, "missing folder name")),
    };

    Ok(RawFolder {
        id,
        parent,
        name: name.to_string(),
    })
}

fn parse_id(record: &str, field: Option<&str>, what: &str) -> Result<FolderId> {
    let field = field.ok_or_else(|| Error::malformed(record, format!("missing {what}")))?;
    field
        .parse()
        .map_err(|e| Error::malformed(record, format!("invalid {what} {field:?}: {e}")))
}
