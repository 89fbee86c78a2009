//! Default values and well-known names shared across the crate.

/// Package id that always sorts after every other package.
pub const SITE_PACKAGE: &str = "__site__";

/// Number of hex characters kept from the manifest-set digest.
pub const FINGERPRINT_LEN: usize = 16;

/// Logical cache keys for the memoized views.
///
/// Stored keys are prefixed with the manifest fingerprint, see
/// [`crate::cache::Cache::set_prefix`].
pub mod keys {
    pub const PACKAGE_SORT_ORDER: &str = "package-sort-order";
    pub const DEPENDS_INFO: &str = "depends-info";
    pub const FILE_SORT_ORDER: &str = "file-sort-order";
    pub const FILE_INFO: &str = "file-info";
    pub const COMBINES_INFO: &str = "combines-info";
}
