//! # Resolver
//!
//! The [`Resolver`] owns the merged manifest data for one request and
//! answers questions about it: load order, conflicts, minification flags
//! and which bundles to serve for a list of files.
//!
//! ## Views
//!
//! Every answer is derived from five views, each a pure function of the
//! loaded manifests:
//!
//! 1. **Package sort order**: packages ranked by their `Depends`.
//! 2. **Depends info**: each file's direct dependencies, gathered in
//!    package order.
//! 3. **File info**: each provided file's metadata.
//! 4. **Combines info**: declared bundles with implicit members, largest
//!    first.
//! 5. **File sort order**: files and bundles ranked for loading.
//!
//! Views are computed on first use, kept in memory, and written through a
//! [`Cache`] namespaced by the manifest fingerprint. Loading another
//! manifest drops the in-memory copies and moves the cache to a new
//! namespace, so nothing stale is ever served.
//!
//! Views are handed out as `Arc` snapshots, so callers can keep one while
//! asking the resolver for another.

pub mod combines;
pub mod conflicts;
pub mod info;
pub mod ordering;

use std::cmp::Ordering;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{Cache, CacheTier};
use crate::defaults::keys;
use crate::error::Result;
use crate::manifest::{CombineDecl, FileEntry, Manifest, ManifestSet, Package};

pub use combines::CombinePlan;

/// Path or package id to rank; rank 0 loads first.
pub type SortOrder = IndexMap<String, usize>;
/// File path to its direct (hard and optional) dependencies.
pub type DependsInfo = IndexMap<String, Vec<String>>;
/// File path to its metadata.
pub type FileInfo = IndexMap<String, FileEntry>;
/// Bundle name to its expanded declaration.
pub type CombinesInfo = IndexMap<String, CombineDecl>;
/// File path to the other requested files it conflicts with.
pub type Conflicts = IndexMap<String, Vec<String>>;

#[derive(Debug, Default)]
struct Views {
    package_sort_order: Option<Arc<SortOrder>>,
    depends_info: Option<Arc<DependsInfo>>,
    file_info: Option<Arc<FileInfo>>,
    combines_info: Option<Arc<CombinesInfo>>,
    file_sort_order: Option<Arc<SortOrder>>,
}

/// Builder for a [`Resolver`] with extra cache tiers
#[derive(Default)]
pub struct ResolverBuilder {
    tiers: Vec<Box<dyn CacheTier>>,
}

impl ResolverBuilder {
    /// Put a slower tier (shared between requests, for example) behind the
    /// in-process one
    pub fn with_shared_tier(mut self, tier: impl CacheTier + 'static) -> Self {
        self.tiers.push(Box::new(tier));
        self
    }

    pub fn build(self) -> Resolver {
        let mut cache = Cache::new();
        for tier in self.tiers {
            cache.push_tier(tier);
        }
        Resolver::with_cache(cache)
    }
}

/// Dependency and bundle resolver for one request
#[derive(Debug)]
pub struct Resolver {
    manifests: ManifestSet,
    cache: Cache,
    views: Views,
}

impl Resolver {
    /// Create a resolver with only an in-process cache
    pub fn new() -> Self {
        Self::with_cache(Cache::new())
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    /// Create a resolver around an existing cache chain
    pub fn with_cache(mut cache: Cache) -> Self {
        let manifests = ManifestSet::new();
        cache.set_prefix(manifests.fingerprint());
        Self {
            manifests,
            cache,
            views: Views::default(),
        }
    }

    /// Merge one manifest into the data set
    pub fn load_manifest(&mut self, manifest: &Manifest) {
        if self.manifests.load(manifest) {
            self.invalidate();
        }
    }

    /// Merge several manifests, in order
    pub fn load_manifests<'a>(&mut self, manifests: impl IntoIterator<Item = &'a Manifest>) {
        if self.manifests.load_all(manifests) > 0 {
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.views = Views::default();
        self.cache.set_prefix(self.manifests.fingerprint());
        debug!("Cache namespace is now {}", self.manifests.fingerprint());
    }

    /// Fingerprint of the loaded manifest set
    pub fn fingerprint(&self) -> &str {
        self.manifests.fingerprint()
    }

    /// Source identities of the loaded manifests
    pub fn sources(&self) -> Vec<String> {
        self.manifests.sources().map(str::to_string).collect()
    }

    /// Typed packages of the merged data
    pub fn packages(&self) -> &IndexMap<String, Package> {
        self.manifests.packages()
    }

    pub fn manifests(&self) -> &ManifestSet {
        &self.manifests
    }

    pub fn package_sort_order(&mut self) -> Result<Arc<SortOrder>> {
        if let Some(view) = &self.views.package_sort_order {
            return Ok(Arc::clone(view));
        }
        let view = Arc::new(self.cached(keys::PACKAGE_SORT_ORDER, |this| {
            ordering::package_sort_order(this.manifests.packages())
        })?);
        self.views.package_sort_order = Some(Arc::clone(&view));
        Ok(view)
    }

    pub fn depends_info(&mut self) -> Result<Arc<DependsInfo>> {
        if let Some(view) = &self.views.depends_info {
            return Ok(Arc::clone(view));
        }
        let order = self.package_sort_order()?;
        let view = Arc::new(self.cached(keys::DEPENDS_INFO, |this| {
            Ok(ordering::depends_info(this.manifests.packages(), &order))
        })?);
        self.views.depends_info = Some(Arc::clone(&view));
        Ok(view)
    }

    pub fn file_info(&mut self) -> Result<Arc<FileInfo>> {
        if let Some(view) = &self.views.file_info {
            return Ok(Arc::clone(view));
        }
        let order = self.package_sort_order()?;
        let view = Arc::new(self.cached(keys::FILE_INFO, |this| {
            Ok(info::file_info(this.manifests.packages(), &order))
        })?);
        self.views.file_info = Some(Arc::clone(&view));
        Ok(view)
    }

    pub fn combines_info(&mut self) -> Result<Arc<CombinesInfo>> {
        if let Some(view) = &self.views.combines_info {
            return Ok(Arc::clone(view));
        }
        let order = self.package_sort_order()?;
        let depends = self.depends_info()?;
        let file_info = self.file_info()?;
        let view = Arc::new(self.cached(keys::COMBINES_INFO, |this| {
            Ok(combines::combines_info(
                this.manifests.packages(),
                &order,
                &depends,
                &file_info,
            ))
        })?);
        self.views.combines_info = Some(Arc::clone(&view));
        Ok(view)
    }

    pub fn file_sort_order(&mut self) -> Result<Arc<SortOrder>> {
        if let Some(view) = &self.views.file_sort_order {
            return Ok(Arc::clone(view));
        }
        let depends = self.depends_info()?;
        let combines = self.combines_info()?;
        let view = Arc::new(self.cached(keys::FILE_SORT_ORDER, |_| {
            ordering::file_sort_order(&depends, &combines)
        })?);
        self.views.file_sort_order = Some(Arc::clone(&view));
        Ok(view)
    }

    /// Compare two files (or bundles) by load order
    pub fn compare_files(&mut self, a: &str, b: &str) -> Result<Ordering> {
        let order = self.file_sort_order()?;
        Ok(ordering::compare_files(&order, a, b))
    }

    /// Stable-sort `files` into load order
    pub fn sort_files<S: AsRef<str>>(&mut self, files: &mut [S]) -> Result<()> {
        let order = self.file_sort_order()?;
        files.sort_by(|a, b| ordering::compare_files(&order, a.as_ref(), b.as_ref()));
        Ok(())
    }

    /// Whether `path` (a file or a bundle) should be minified
    pub fn is_minified(&mut self, path: &str) -> Result<bool> {
        let file_info = self.file_info()?;
        let combines = self.combines_info()?;
        Ok(info::is_minified(&file_info, &combines, path))
    }

    /// Conflicts declared among `files`; empty means the set is deliverable
    pub fn conflicts<S: AsRef<str>>(&mut self, files: &[S]) -> Result<Conflicts> {
        let file_info = self.file_info()?;
        Ok(conflicts::find_conflicts(&file_info, files))
    }

    /// Pick bundles for `files`
    pub fn combines<S: AsRef<str>>(&mut self, files: &[S]) -> Result<CombinePlan> {
        let combines = self.combines_info()?;
        let file_info = self.file_info()?;
        Ok(combines::plan_combines(files, &combines, &file_info))
    }

    fn cached<T, F>(&mut self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if let Some(value) = self.cache.get_json(key)? {
            trace!("Using cached {}", key);
            return Ok(value);
        }
        let value = compute(self)?;
        self.cache.set_json(key, &value)?;
        Ok(value)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
