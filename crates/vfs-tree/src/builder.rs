//! Hierarchy construction from a flat listing

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::{Error, FolderId, FolderPath, FolderRecord, Hierarchy, Listing, Result};

/// Options controlling how a listing is turned into a hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fail on the first folder whose parent is missing (default: true)
    pub validate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

impl BuildOptions {
    /// Options that accept broken parent chains.
    pub fn unvalidated() -> Self {
        Self { validate: false }
    }
}

/// Builds a [`Hierarchy`] out of a raw [`Listing`].
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
}

impl TreeBuilder {
    /// Create a builder with validation enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Build a hierarchy, computing the absolute path of every folder.
    ///
    /// # Errors
    ///
    /// - [`Error::ParentCycle`] if a parent chain loops
    /// - [`Error::InconsistentTree`] if validation is enabled and a folder
    ///   references a parent that is not in the listing
    pub fn build(&self, listing: Listing) -> Result<Hierarchy> {
        let mut hierarchy = Hierarchy::new();

        if let Listing::Folders(folders) = listing {
            for raw in folders {
                if raw.id.is_root() {
                    warn!(name = %raw.name, "Ignoring listed folder with reserved root id");
                    continue;
                }
                // Paths are derived below, once every record is known
                let record = FolderRecord::new(raw.parent, raw.name, FolderPath::root());
                if hierarchy.insert(raw.id, record).is_some() {
                    warn!(id = %raw.id, "Duplicate folder id in listing, keeping the last one");
                }
            }
        }

        hierarchy.refresh_paths()?;

        if self.options.validate {
            hierarchy.validate()?;
        }

        debug!(
            folders = hierarchy.len(),
            validated = self.options.validate,
            "Built folder hierarchy"
        );
        Ok(hierarchy)
    }
}

impl Hierarchy {
    /// Re-derive the path of every record from the parent chains.
    ///
    /// Each chain is walked at most once: paths computed while walking one
    /// folder are reused for every folder below it.
    pub fn refresh_paths(&mut self) -> Result<()> {
        let mut computed: HashMap<FolderId, FolderPath> = HashMap::with_capacity(self.len());

        for (start, _) in self.iter() {
            if computed.contains_key(&start) {
                continue;
            }

            let mut chain = Vec::new();
            let mut seen = HashSet::new();
            let mut cursor = start;
            let base = loop {
                if let Some(path) = computed.get(&cursor) {
                    break path.clone();
                }
                let Some(record) = self.get(cursor) else {
                    break FolderPath::unresolved(cursor);
                };
                if !seen.insert(cursor) {
                    return Err(Error::ParentCycle { id: cursor });
                }
                chain.push((cursor, record.name.as_str()));
                if record.parent.is_root() {
                    break FolderPath::root();
                }
                cursor = record.parent;
            };

            let mut path = base;
            for (id, name) in chain.into_iter().rev() {
                path = path.child(name);
                computed.insert(id, path.clone());
            }
        }

        for (id, record) in self.records_mut() {
            if let Some(path) = computed.remove(id) {
                record.path = path;
            }
        }
        Ok(())
    }

    /// Check that every non-root parent reference points at a known record.
    ///
    /// Reports the first broken record in id order.
    pub fn validate(&self) -> Result<()> {
        for (id, record) in self.iter() {
            if !record.parent.is_root() && !self.contains(record.parent) {
                return Err(Error::InconsistentTree {
                    id,
                    path: record.path.clone(),
                    missing_parent: record.parent,
                });
            }
        }
        Ok(())
    }
}
