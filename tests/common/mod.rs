//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest("core.yaml", manifests::CHAIN);
//!     fixture.command("order").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

use asset_concentrator::{Manifest, Resolver};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::resolver_for;
    pub use super::TestFixture;
}

/// Common manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Two packages where `b.js` needs `a.js`.
    pub const CHAIN: &str = r#"
p1:
  Provides:
    a.js: {}
p2:
  Depends: [p1]
  Provides:
    b.js:
      Depends: [a.js]
"#;

    /// Two packages depending on each other.
    pub const PACKAGE_CYCLE: &str = r#"
p1:
  Depends: [p2]
p2:
  Depends: [p1]
"#;

    /// `a.js` declares a conflict with `b.js`, not the other way round.
    pub const ONE_SIDED_CONFLICT: &str = r#"
core:
  Provides:
    a.js:
      Conflicts: [b.js]
    b.js: {}
"#;

    /// A bundle with one member that must not be minified.
    pub const RAW_MEMBER: &str = r#"
core:
  Provides:
    a.js:
      Minify: false
    b.js: {}
  Combines:
    bundle.js:
      Includes: [a.js, b.js]
"#;

    /// A small site: a library package, a widget package with a bundle that
    /// needs a glue file, and a site package.
    pub const SITE: &str = r#"
lib:
  Provides:
    lib/base.js: {}
    lib/legacy.js:
      Conflicts: [lib/modern.js]
    lib/modern.js: {}
widgets:
  Depends: [lib]
  Provides:
    widgets/core.js:
      Depends: [lib/base.js]
    widgets/glue.js:
      Depends: [widgets/core.js]
    widgets/tabs.js:
      Depends: [widgets/glue.js]
    widgets/dialog.js:
      Depends: [widgets/core.js]
      Minify: false
  Combines:
    widgets/all.js:
      Includes: [widgets/core.js, widgets/tabs.js]
__site__:
  Depends: [widgets]
  Provides:
    site/app.js:
      Depends: [widgets/tabs.js, widgets/dialog.js]
"#;

    /// Top level is a list, which is not a manifest.
    pub const NOT_A_MAPPING: &str = "- a.js\n- b.js\n";
}

/// Build a resolver over the given `(source, yaml)` manifests.
#[allow(dead_code)]
pub fn resolver_for(manifests: &[(&str, &str)]) -> Resolver {
    let mut resolver = Resolver::new();
    for (source, yaml) in manifests {
        let manifest = Manifest::from_yaml_str(*source, yaml).expect("Fixture should parse");
        resolver.load_manifest(&manifest);
    }
    resolver
}

/// A temporary directory holding manifest files.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a manifest file with the given content.
    pub fn with_manifest(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a `concentrate <subcommand>` command that loads this
    /// fixture's manifests.
    pub fn command(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("concentrate");
        cmd.current_dir(self.path())
            .env_remove("CONCENTRATE_DATA")
            .env_remove("RUST_LOG")
            .arg(subcommand)
            .arg("--manifest")
            .arg(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest("core.yaml", manifests::CHAIN);
        assert!(fixture.path().join("core.yaml").exists());
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        let snippets = [
            manifests::CHAIN,
            manifests::PACKAGE_CYCLE,
            manifests::ONE_SIDED_CONFLICT,
            manifests::RAW_MEMBER,
            manifests::SITE,
        ];

        for snippet in snippets {
            serde_yaml::from_str::<serde_yaml::Mapping>(snippet)
                .expect("Manifest should be a YAML mapping");
        }
    }
}
