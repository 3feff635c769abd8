//! Index command - dry run of the indexer.

use std::fmt::Write as _;

use anyhow::Context;

use crate::config::Settings;
use crate::index::{ConfigFileMap, build_index};
use crate::watcher::MemoryRegistry;

/// Build the index without touching the OS watcher and print it.
pub fn run(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let root = settings.vault_root()?;
    let mut registry = MemoryRegistry::new();
    let map = build_index(&root, &settings.selection_rules(), &mut registry)
        .with_context(|| format!("failed to index {}", root.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        print!("{}", render(&map));
    }
    Ok(())
}

/// Human-readable listing: one block per name, peers indented.
pub fn render(map: &ConfigFileMap) -> String {
    let mut out = String::new();
    if map.is_empty() {
        out.push_str("No synchronized files found\n");
        return out;
    }

    for (name, paths) in map.iter() {
        let _ = writeln!(out, "{name} ({})", paths.len());
        for path in paths {
            let _ = writeln!(out, "  {}", path.display());
        }
    }
    let _ = writeln!(
        out,
        "\n{} names, {} files",
        map.len(),
        map.file_count()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SelectionRules;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_lists_peers() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for project in ["proj1", "proj2"] {
            let dir = root.join(project).join(".obsidian");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("app.json"), "{}").unwrap();
        }

        let mut registry = MemoryRegistry::new();
        let map = build_index(root, &SelectionRules::default(), &mut registry).unwrap();
        let text = render(&map);

        assert!(text.starts_with("app.json (2)\n"));
        assert!(text.contains("proj1"));
        assert!(text.ends_with("1 names, 2 files\n"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render(&ConfigFileMap::new()),
            "No synchronized files found\n"
        );
    }
}
