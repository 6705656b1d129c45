//! Store tree listing, used for startup diagnostics

use crate::path::{self, ROOT};
use crate::store::{DirEntry, FileStore};
use veil_core::Result;

const INDENT: &str = "    ";

/// Walk `store` from its root and render one line per entry.
///
/// Directories are suffixed with `/` and their children indented by four
/// spaces per level. Entries appear depth-first in name order.
pub async fn list_tree<S: FileStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut pending: Vec<(String, usize, DirEntry)> = Vec::new();
    push_children(store, ROOT, 0, &mut pending).await?;

    while let Some((parent, depth, entry)) = pending.pop() {
        let indent = INDENT.repeat(depth);
        if entry.is_dir {
            lines.push(format!("{}{}/", indent, entry.name));
            let child = path::join(&parent, &entry.name);
            push_children(store, &child, depth + 1, &mut pending).await?;
        } else {
            lines.push(format!("{}{}", indent, entry.name));
        }
    }

    Ok(lines)
}

async fn push_children<S: FileStore + ?Sized>(
    store: &S,
    dir: &str,
    depth: usize,
    pending: &mut Vec<(String, usize, DirEntry)>,
) -> Result<()> {
    let entries = store.read_dir(dir).await?;
    // Reversed so the stack pops them in name order.
    pending.extend(entries.into_iter().rev().map(|e| (dir.to_string(), depth, e)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_list_tree() {
        let store = MemoryStore::from_files([
            ("index.html", ""),
            ("css/styles.css", ""),
            ("css/vendor/reset.css", ""),
            (".env", ""),
            ("zz.txt", ""),
        ]);

        let lines = list_tree(&store).await.unwrap();
        assert_eq!(
            lines,
            vec![
                ".env",
                "css/",
                "    styles.css",
                "    vendor/",
                "        reset.css",
                "index.html",
                "zz.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_store() {
        let lines = list_tree(&MemoryStore::new()).await.unwrap();
        assert!(lines.is_empty());
    }
}
