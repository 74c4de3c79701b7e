// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

const SPDX_LINE: &str = "// SPDX-License-Identifier: Apache-2.0";

fn has_spdx_first_line(file_path: &Path) -> bool {
    let file = fs::File::open(file_path).unwrap();
    let reader = io::BufReader::new(file);
    matches!(reader.lines().next(), Some(Ok(line)) if line.starts_with(SPDX_LINE))
}

/// Only the crate's own source trees are checked.
#[test]
fn check_crate_sources_for_spdx() {
    let project_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut worklist: Vec<PathBuf> = ["src", "tests"]
        .iter()
        .map(|d| project_dir.join(d))
        .collect();
    let mut missing = Vec::new();
    let mut checked = 0;

    while let Some(dir) = worklist.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                worklist.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                checked += 1;
                if !has_spdx_first_line(&path) {
                    missing.push(path);
                }
            }
        }
    }

    assert!(checked > 0, "no Rust sources found under {:?}", project_dir);
    assert!(
        missing.is_empty(),
        "The following files are missing SPDX identifiers: {:?}",
        missing
    );
}
