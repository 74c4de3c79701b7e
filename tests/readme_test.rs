// SPDX-License-Identifier: Apache-2.0

extern crate docmatic;

/// Compiles and runs the Rust code blocks in the README against this crate.
#[test]
fn test_readme() {
    docmatic::Assert::default().test_file("README.md");
}
