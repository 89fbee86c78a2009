//! End-to-end tests for the `concentrate conflicts` command.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_conflicts_found_exits_non_zero() {
    let fixture =
        TestFixture::new().with_manifest("conflict.yaml", manifests::ONE_SIDED_CONFLICT);

    fixture
        .command("conflicts")
        .args(["a.js", "b.js"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("a.js conflicts with b.js"))
        .stdout(predicate::str::contains("b.js conflicts with").not())
        .stderr(predicate::str::contains("1 file(s) declare conflicts"));
}

#[test]
fn test_no_conflicts() {
    let fixture =
        TestFixture::new().with_manifest("conflict.yaml", manifests::ONE_SIDED_CONFLICT);

    fixture
        .command("conflicts")
        .arg("b.js")
        .assert()
        .success()
        .stdout(predicate::str::contains("No conflicts among 1 file(s)"));
}

#[test]
fn test_conflicts_requires_files() {
    let fixture =
        TestFixture::new().with_manifest("conflict.yaml", manifests::ONE_SIDED_CONFLICT);

    fixture.command("conflicts").assert().failure();
}
