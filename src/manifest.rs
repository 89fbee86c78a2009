//! # Manifest Data Model
//!
//! A manifest is a YAML document keyed by package id. Each package may
//! declare:
//!
//! ```yaml
//! widgets:
//!   Depends: [core]            # other packages
//!   Provides:
//!     js/widgets.js:
//!       Depends: [js/core.js]  # hard file dependencies
//!       OptionalDepends: []    # ordered like Depends
//!       Minify: true           # default true
//!       Conflicts: [js/legacy-widgets.js]
//!   Combines:
//!     js/widgets-bundle.js:
//!       Includes: [js/core.js, js/widgets.js]
//!       Minify: true           # default true
//! ```
//!
//! Manifests are merged into a [`ManifestSet`] with [`crate::merge`]
//! semantics and then read back into typed [`Package`] values. Reading is
//! lenient: absent or mistyped optional keys are treated as empty, so one
//! sloppy manifest never hides the rest of the catalogue. Only a document
//! whose top level is not a mapping is rejected.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value as YamlValue};
use sha2::{Digest, Sha256};

use crate::defaults::FINGERPRINT_LEN;
use crate::error::{Error, Result};
use crate::merge::merge_values;

/// A file provided by a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileEntry {
    /// Id of the package that provides the file.
    pub package: String,
    #[serde(default)]
    pub depends: Vec<String>,
    #[serde(default)]
    pub optional_depends: Vec<String>,
    #[serde(default = "default_minify")]
    pub minify: bool,
    #[serde(default)]
    pub conflicts: Vec<String>,
}

impl FileEntry {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            depends: Vec::new(),
            optional_depends: Vec::new(),
            minify: true,
            conflicts: Vec::new(),
        }
    }

    /// Hard and optional dependencies, in declaration order
    pub fn all_depends(&self) -> impl Iterator<Item = &String> {
        self.depends.iter().chain(self.optional_depends.iter())
    }
}

/// Membership flag of a file inside a combine set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombineMember {
    /// `true` when declared in `Includes`, `false` when pulled in by
    /// dependency expansion.
    pub explicit: bool,
}

impl CombineMember {
    pub const EXPLICIT: CombineMember = CombineMember { explicit: true };
    pub const IMPLICIT: CombineMember = CombineMember { explicit: false };
}

/// A named bundle of files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CombineDecl {
    #[serde(default)]
    pub includes: IndexMap<String, CombineMember>,
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for CombineDecl {
    fn default() -> Self {
        Self {
            includes: IndexMap::new(),
            minify: true,
        }
    }
}

fn default_minify() -> bool {
    true
}

/// A package read from the merged manifest data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Package {
    #[serde(default)]
    pub depends: Vec<String>,
    #[serde(default)]
    pub provides: IndexMap<String, FileEntry>,
    #[serde(default)]
    pub combines: IndexMap<String, CombineDecl>,
}

impl Package {
    /// Read a package from its YAML value, ignoring misshapen keys
    pub fn from_value(id: &str, value: &YamlValue) -> Self {
        let mut package = Package {
            depends: string_list(value.get("Depends")),
            ..Package::default()
        };

        match value.get("Provides") {
            Some(YamlValue::Mapping(provides)) => {
                for (file, entry) in provides {
                    if let Some(file) = file.as_str() {
                        package
                            .provides
                            .insert(file.to_string(), file_entry(id, entry));
                    }
                }
            }
            Some(YamlValue::Sequence(files)) => {
                for file in files.iter().filter_map(YamlValue::as_str) {
                    package
                        .provides
                        .insert(file.to_string(), FileEntry::new(id));
                }
            }
            _ => {}
        }

        if let Some(YamlValue::Mapping(combines)) = value.get("Combines") {
            for (name, decl) in combines {
                if let Some(name) = name.as_str() {
                    package
                        .combines
                        .insert(name.to_string(), combine_decl(decl));
                }
            }
        }

        package
    }
}

fn file_entry(package: &str, value: &YamlValue) -> FileEntry {
    FileEntry {
        package: package.to_string(),
        depends: string_list(value.get("Depends")),
        optional_depends: string_list(value.get("OptionalDepends")),
        minify: bool_flag(value.get("Minify"), true),
        conflicts: string_list(value.get("Conflicts")),
    }
}

fn combine_decl(value: &YamlValue) -> CombineDecl {
    let includes = match value.get("Includes") {
        Some(YamlValue::Mapping(map)) => map
            .keys()
            .filter_map(YamlValue::as_str)
            .map(|file| (file.to_string(), CombineMember::EXPLICIT))
            .collect(),
        other => string_list(other)
            .into_iter()
            .map(|file| (file, CombineMember::EXPLICIT))
            .collect(),
    };
    CombineDecl {
        includes,
        minify: bool_flag(value.get("Minify"), true),
    }
}

/// A list of strings, accepting a lone string as a one-item list
fn string_list(value: Option<&YamlValue>) -> Vec<String> {
    match value {
        Some(YamlValue::Sequence(items)) => {
            let mut list: Vec<String> = Vec::with_capacity(items.len());
            for item in items.iter().filter_map(YamlValue::as_str) {
                if !list.iter().any(|existing| existing == item) {
                    list.push(item.to_string());
                }
            }
            list
        }
        Some(YamlValue::String(item)) => vec![item.clone()],
        _ => Vec::new(),
    }
}

fn bool_flag(value: Option<&YamlValue>, default: bool) -> bool {
    value.and_then(YamlValue::as_bool).unwrap_or(default)
}

/// One parsed manifest document plus the identity used to fingerprint it
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    source: String,
    revision: String,
    document: YamlValue,
}

impl Manifest {
    /// Wrap a parsed document; the revision is a digest of its content
    pub fn new(source: impl Into<String>, document: YamlValue) -> Result<Self> {
        let source = source.into();
        let document = validate(&source, document)?;
        let revision = digest([serde_yaml::to_string(&document)?.as_str()]);
        Ok(Self {
            source,
            revision,
            document,
        })
    }

    /// Wrap a parsed document with a loader-supplied revision, such as a
    /// file modification time
    pub fn with_revision(
        source: impl Into<String>,
        revision: impl Into<String>,
        document: YamlValue,
    ) -> Result<Self> {
        let source = source.into();
        let document = validate(&source, document)?;
        Ok(Self {
            source,
            revision: revision.into(),
            document,
        })
    }

    /// Parse a YAML string into a manifest
    pub fn from_yaml_str(source: impl Into<String>, text: &str) -> Result<Self> {
        let document: YamlValue = serde_yaml::from_str(text)?;
        Self::new(source, document)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn document(&self) -> &YamlValue {
        &self.document
    }
}

fn validate(source: &str, document: YamlValue) -> Result<YamlValue> {
    match document {
        YamlValue::Mapping(_) => Ok(document),
        YamlValue::Null => Ok(YamlValue::Mapping(Mapping::new())),
        other => Err(Error::ManifestParse {
            source_name: source.to_string(),
            message: format!(
                "expected a mapping of package ids at the top level, found {}",
                crate::merge::type_name(&other)
            ),
            hint: Some("key each package by its id, e.g. 'my-package: {Provides: ...}'".to_string()),
        }),
    }
}

fn digest<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// The merged view of every manifest loaded so far
///
/// Loading is append-only. Each load re-reads the typed packages and
/// changes the fingerprint, which callers use to namespace cached views.
#[derive(Debug, Clone)]
pub struct ManifestSet {
    merged: YamlValue,
    sources: Vec<(String, String)>,
    packages: IndexMap<String, Package>,
    fingerprint: String,
}

impl ManifestSet {
    pub fn new() -> Self {
        Self {
            merged: YamlValue::Mapping(Mapping::new()),
            sources: Vec::new(),
            packages: IndexMap::new(),
            fingerprint: fingerprint(&[]),
        }
    }

    /// Merge one manifest. Returns `false` if the same source and revision
    /// were already loaded.
    pub fn load(&mut self, manifest: &Manifest) -> bool {
        let loaded = self.merge(manifest);
        if loaded {
            self.refresh();
        }
        loaded
    }

    /// Merge several manifests, re-reading packages once at the end.
    /// Returns how many were newly loaded.
    pub fn load_all<'a>(&mut self, manifests: impl IntoIterator<Item = &'a Manifest>) -> usize {
        let loaded = manifests
            .into_iter()
            .filter(|manifest| self.merge(manifest))
            .count();
        if loaded > 0 {
            self.refresh();
        }
        loaded
    }

    fn merge(&mut self, manifest: &Manifest) -> bool {
        let identity = (manifest.source.clone(), manifest.revision.clone());
        if self.sources.contains(&identity) {
            debug!("Manifest {} already loaded, skipping", manifest.source);
            return false;
        }
        merge_values(&mut self.merged, &manifest.document, "", &manifest.source);
        self.sources.push(identity);
        true
    }

    fn refresh(&mut self) {
        self.packages = match &self.merged {
            YamlValue::Mapping(map) => map
                .iter()
                .filter_map(|(id, value)| {
                    id.as_str()
                        .map(|id| (id.to_string(), Package::from_value(id, value)))
                })
                .collect(),
            _ => IndexMap::new(),
        };
        self.fingerprint = fingerprint(&self.sources);
        debug!(
            "Loaded {} manifest(s), {} package(s), fingerprint {}",
            self.sources.len(),
            self.packages.len(),
            self.fingerprint
        );
    }

    /// Typed packages in first-declaration order
    pub fn packages(&self) -> &IndexMap<String, Package> {
        &self.packages
    }

    /// The raw merged document
    pub fn merged(&self) -> &YamlValue {
        &self.merged
    }

    /// Source identities of the loaded manifests, in load order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(source, _)| source.as_str())
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for ManifestSet {
    fn default() -> Self {
        Self::new()
    }
}

fn fingerprint(sources: &[(String, String)]) -> String {
    let full = digest(
        sources
            .iter()
            .flat_map(|(source, revision)| [source.as_str(), revision.as_str()]),
    );
    full[..FINGERPRINT_LEN].to_string()
}
