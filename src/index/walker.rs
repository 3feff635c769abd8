//! Directory traversal that builds the index and seeds the watch registry.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use super::{ConfigFileMap, IndexError, SelectionRules};
use crate::watcher::Subscriptions;

/// Walk `root` once, indexing and subscribing every selected file.
///
/// Subscription happens inside the traversal, right before the path is
/// recorded, so no indexed file is ever left unwatched. Any walk error
/// (permission denied, a file vanishing mid-walk), dangling symlink inside a
/// marker directory or subscribe failure aborts the build; there is no
/// partial index.
pub fn build_index<R>(
    root: &Path,
    rules: &SelectionRules,
    registry: &mut R,
) -> Result<ConfigFileMap, IndexError>
where
    R: Subscriptions + ?Sized,
{
    let mut map = ConfigFileMap::new();

    // Directory symlinks are not descended into
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| IndexError::Walk {
            path: source
                .path()
                .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            source,
        })?;

        if !rules.selects(entry.path()) || !is_regular_file(&entry)? {
            continue;
        }

        registry.subscribe(entry.path())?;
        map.insert(entry.into_path());
    }

    crate::debug_event!(
        "index",
        "built",
        "{} names, {} files under {}",
        map.len(),
        map.file_count(),
        root.display()
    );

    Ok(map)
}

/// Regular files, and symlinks whose target is a regular file.
fn is_regular_file(entry: &DirEntry) -> Result<bool, IndexError> {
    if !entry.path_is_symlink() {
        return Ok(entry.file_type().is_file());
    }

    std::fs::metadata(entry.path())
        .map(|meta| meta.is_file())
        .map_err(|source| IndexError::Stat {
            path: entry.path().to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watcher::MemoryRegistry;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_build_index_groups_and_subscribes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(root, "proj1/.obsidian/app.json", "{\"a\":1}");
        touch(root, "proj2/.obsidian/app.json", "{\"a\":2}");
        touch(root, "proj1/.obsidian/workspace.json", "{}");
        touch(root, "proj1/notes/app.json", "not synced");

        let mut registry = MemoryRegistry::new();
        let map = build_index(root, &SelectionRules::default(), &mut registry).unwrap();

        assert_eq!(map.len(), 1);
        let peers = map.get("app.json").unwrap();
        assert_eq!(peers.len(), 2);
        assert!(peers.contains(&root.join("proj1/.obsidian/app.json")));
        assert!(peers.contains(&root.join("proj2/.obsidian/app.json")));
        assert!(!map.contains_name("workspace.json"));

        // Every indexed path is subscribed, nothing else is
        assert_eq!(registry.len(), map.file_count());
        for path in map.paths() {
            assert!(registry.is_subscribed(path));
        }
    }

    #[test]
    fn test_directories_inside_marker_are_not_indexed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(root, "proj1/.obsidian/plugins/dataview/data.json", "{}");
        fs::create_dir_all(root.join("proj1/.obsidian/themes")).unwrap();

        let mut registry = MemoryRegistry::new();
        let map = build_index(root, &SelectionRules::default(), &mut registry).unwrap();

        assert!(map.is_empty());
        assert!(registry.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_inside_marker() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(root, "shared/hotkeys.json", "{}");
        fs::create_dir_all(root.join("shared/snippets")).unwrap();
        fs::create_dir_all(root.join("proj1/.obsidian")).unwrap();
        symlink(
            root.join("shared/hotkeys.json"),
            root.join("proj1/.obsidian/hotkeys.json"),
        )
        .unwrap();
        symlink(root.join("shared/snippets"), root.join("proj1/.obsidian/snippets")).unwrap();

        let mut registry = MemoryRegistry::new();
        let map = build_index(root, &SelectionRules::default(), &mut registry).unwrap();

        // File links are indexed under their own path, directory links are not
        let link = root.join("proj1/.obsidian/hotkeys.json");
        assert_eq!(map.get("hotkeys.json"), Some(&[link.clone()][..]));
        assert!(registry.is_subscribed(&link));
        assert!(!map.contains_name("snippets"));

        symlink(root.join("gone.json"), root.join("proj1/.obsidian/dangling.json")).unwrap();
        let err = build_index(root, &SelectionRules::default(), &mut MemoryRegistry::new())
            .unwrap_err();
        assert!(matches!(err, IndexError::Stat { .. }));
    }

    #[test]
    fn test_missing_root_is_a_walk_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = MemoryRegistry::new();

        let err = build_index(
            &temp_dir.path().join("nope"),
            &SelectionRules::default(),
            &mut registry,
        )
        .unwrap_err();

        assert!(matches!(err, IndexError::Walk { .. }));
    }
}
