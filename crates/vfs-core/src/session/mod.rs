//! Folder session: cached hierarchy on top of a backend
//!
//! A [`FolderSession`] owns the only copy of the folder hierarchy. Queries
//! are answered from that cache; it is rebuilt from the backend listing only
//! when it was never built, when the last build failed validation, or when
//! the caller forces a reload. Mutations patch the cache in place instead of
//! reloading, so the cache can drift from the backend if something else
//! changes the remote folders. That staleness is accepted in exchange for
//! not listing every folder on every call.
//!
//! The session is single-owner: every method touching the cache takes
//! `&mut self`. Share it across threads only behind an external lock.

mod mutation;
mod repair;

use tracing::{debug, warn};
use vfs_tree::{
    BuildOptions, ConsistencyReport, FolderId, FolderPath, Hierarchy, TreeBuilder, path,
};

use crate::backend::FolderBackend;
use crate::config::SessionConfig;
use crate::{Error, Result};

/// Lifecycle of the cached hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheState {
    /// Never built
    #[default]
    Empty,
    /// Freshly built or patched by a mutation
    Loaded,
    /// Served from cache without reloading
    Stale,
    /// The last build failed; the next access rebuilds
    Invalid,
}

/// Options for [`FolderSession::folders_hierarchy`].
///
/// Unset `validate` / `consistent` fall back to the session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyOptions {
    /// Bypass the cache and list folders again
    pub force: bool,
    /// Fail on folders whose parent is missing
    pub validate: Option<bool>,
    /// Delete orphans instead of failing validation
    pub consistent: Option<bool>,
    /// Return only the descendants of this folder, with relative paths
    pub from: Option<String>,
}

impl HierarchyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn consistent(mut self, consistent: bool) -> Self {
        self.consistent = Some(consistent);
        self
    }

    pub fn starting_at(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Resolved build parameters for one load.
#[derive(Debug, Clone, Copy)]
struct LoadPlan {
    force: bool,
    validate: bool,
    repair: bool,
}

/// Client-side view of the folder tree of one storage account.
///
/// ```
/// use vfs_core::{FolderSession, MemoryBackend, logging};
///
/// logging::init().unwrap();
///
/// let mut session = FolderSession::new(MemoryBackend::new());
/// let id = session.add_folder("/inbox").unwrap();
///
/// let backend = session.into_backend();
/// assert!(backend.contains(id));
/// ```
pub struct FolderSession<B> {
    backend: B,
    config: SessionConfig,
    tree: Hierarchy,
    state: CacheState,
}

impl<B: FolderBackend> FolderSession<B> {
    /// Create a session with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SessionConfig::default())
    }

    pub fn with_config(backend: B, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            tree: Hierarchy::new(),
            state: CacheState::Empty,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cache_state(&self) -> CacheState {
        self.state
    }

    /// Get the folder hierarchy.
    ///
    /// Returns the cached hierarchy unless `force` is set or nothing usable
    /// is cached. With `from`, only the strict descendants of that folder are
    /// returned, with paths relative to it.
    ///
    /// # Errors
    ///
    /// - [`vfs_tree::Error::InconsistentTree`] when validation fails on a
    ///   fresh build (the cache becomes [`CacheState::Invalid`])
    /// - [`Error::FolderNotFound`] when `from` does not resolve
    /// - [`Error::Backend`] when listing or orphan deletion fails
    pub fn folders_hierarchy(&mut self, options: HierarchyOptions) -> Result<Hierarchy> {
        let validate = options.validate.unwrap_or(self.config.validate);
        let plan = LoadPlan {
            force: options.force,
            validate,
            repair: validate && options.consistent.unwrap_or(self.config.repair_on_build),
        };
        self.load(plan)?;

        match options.from.as_deref() {
            Some(from) if !path::is_root(from) => {
                if self.tree.id_of(from).is_none() {
                    return Err(Error::not_found(from));
                }
                Ok(self.tree.slice(from))
            }
            _ => Ok(self.tree.clone()),
        }
    }

    /// Borrow the cached hierarchy, building it with the configured defaults
    /// if needed.
    pub fn hierarchy(&mut self) -> Result<&Hierarchy> {
        self.load(self.default_plan(false))?;
        Ok(&self.tree)
    }

    /// Force a rebuild from the backend listing.
    pub fn reload(&mut self) -> Result<&Hierarchy> {
        self.load(self.default_plan(true))?;
        Ok(&self.tree)
    }

    /// Get the id of the folder at `path`; the root path yields
    /// [`FolderId::ROOT`].
    pub fn folder_id(&mut self, path: &str) -> Result<FolderId> {
        self.hierarchy()?
            .id_of(path)
            .ok_or_else(|| Error::not_found(path))
    }

    /// Get the absolute path of a folder.
    ///
    /// Returns a [`FolderPath::Partial`] instead of failing when an ancestor
    /// is missing, which can only happen with validation disabled.
    pub fn folder_path(&mut self, id: FolderId) -> Result<FolderPath> {
        Ok(self.hierarchy()?.path_of(id)?)
    }

    /// Derive a sub-hierarchy of `tree` rooted at `from`.
    pub fn slice_tree(tree: &Hierarchy, from: &str) -> Hierarchy {
        tree.slice(from)
    }

    pub fn is_root(&mut self, id: FolderId) -> Result<bool> {
        Ok(self.lenient()?.is_root(id))
    }

    pub fn is_gap(&mut self, id: FolderId) -> Result<bool> {
        Ok(self.lenient()?.is_gap(id))
    }

    pub fn is_orphan(&mut self, id: FolderId) -> Result<bool> {
        Ok(self.lenient()?.is_orphan(id)?)
    }

    /// Ids of the folders whose parent is missing.
    pub fn detect_gaps(&mut self) -> Result<Vec<FolderId>> {
        Ok(self.lenient()?.detect_gaps())
    }

    /// Root / gap / orphan scan of the cached hierarchy.
    pub fn check(&mut self) -> Result<ConsistencyReport> {
        Ok(self.lenient()?.check()?)
    }

    /// Cached hierarchy, built without validation if nothing is cached.
    fn lenient(&mut self) -> Result<&Hierarchy> {
        self.load(LoadPlan {
            force: false,
            validate: false,
            repair: false,
        })?;
        Ok(&self.tree)
    }

    fn default_plan(&self, force: bool) -> LoadPlan {
        LoadPlan {
            force,
            validate: self.config.validate,
            repair: self.config.repairs_on_build(),
        }
    }

    fn load(&mut self, plan: LoadPlan) -> Result<()> {
        if !plan.force && matches!(self.state, CacheState::Loaded | CacheState::Stale) {
            self.state = CacheState::Stale;
            return Ok(());
        }

        match self.build(plan) {
            Ok(tree) => {
                self.tree = tree;
                self.state = CacheState::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Folder hierarchy build failed");
                self.tree = Hierarchy::new();
                self.state = CacheState::Invalid;
                Err(e)
            }
        }
    }

    fn build(&self, plan: LoadPlan) -> Result<Hierarchy> {
        let listing = self.backend.list_folders().map_err(Error::backend)?;
        debug!(folders = listing.len(), force = plan.force, "Listed folders");

        let mut tree = TreeBuilder::with_options(BuildOptions::unvalidated()).build(listing)?;
        if plan.repair {
            repair::prune_orphans(&self.backend, &mut tree)?;
        }
        if plan.validate {
            tree.validate()?;
        }
        Ok(tree)
    }

    /// Record that the cache was patched in place.
    fn mark_patched(&mut self) {
        self.state = CacheState::Loaded;
    }
}
