//! Strategy B: select every `.c` file with a same-stem `.h` sibling.
use std::{collections::HashSet, path::PathBuf};

use crate::collector::CollectedFiles;

fn stem_of(path: &std::path::Path) -> Option<&std::ffi::OsStr> {
    path.file_stem()
}

/// Every collected `.c` whose filename stem matches the stem of some
/// collected `.h`, in the order the `.c` files were collected.
pub fn pair(collected: &CollectedFiles) -> Vec<PathBuf> {
    let header_stems: HashSet<&std::ffi::OsStr> =
        collected.h_files.iter().filter_map(|path| stem_of(path)).collect();

    collected
        .c_files
        .iter()
        .filter(|path| stem_of(path).map_or(false, |stem| header_stems.contains(stem)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_c_files_with_matching_header_stem() {
        let collected = CollectedFiles {
            c_files: vec![PathBuf::from("/repo/a.c"), PathBuf::from("/repo/b.c")],
            h_files: vec![PathBuf::from("/repo/a.h")],
        };
        assert_eq!(pair(&collected), vec![PathBuf::from("/repo/a.c")]);
    }

    #[test]
    fn unpaired_c_files_are_excluded() {
        let collected = CollectedFiles {
            c_files: vec![PathBuf::from("/repo/standalone.c")],
            h_files: vec![PathBuf::from("/repo/other.h")],
        };
        assert!(pair(&collected).is_empty());
    }

    #[test]
    fn directory_does_not_affect_stem_matching() {
        let collected = CollectedFiles {
            c_files: vec![PathBuf::from("/repo/src/a.c")],
            h_files: vec![PathBuf::from("/repo/include/a.h")],
        };
        assert_eq!(pair(&collected), vec![PathBuf::from("/repo/src/a.c")]);
    }
}
