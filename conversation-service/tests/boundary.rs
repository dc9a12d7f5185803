use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        if let Ok(read_dir) = fs::read_dir(&dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                    files.push(path);
                }
            }
        }
    }
    files
}

fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path)
        .map(|c| c.contains(needle))
        .unwrap_or(false)
}

/// SQL stays in the repository layer. Handlers and services go through
/// `db::conversation_repo` and `db::message_repo`.
#[test]
fn handlers_do_not_embed_sql() {
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut offenders = Vec::new();
    for file in collect_rs_files(&src_root) {
        let path_str = file.to_string_lossy().to_string();
        if path_str.contains("/db/") || path_str.contains("/target/") {
            continue;
        }
        if file_contains(&file, "FROM conversation")
            || file_contains(&file, "INSERT INTO conversation")
            || file_contains(&file, "UPDATE conversation")
            || file_contains(&file, "FROM message")
            || file_contains(&file, "INSERT INTO message")
        {
            offenders.push(path_str);
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Conversation SQL must live in the db repositories. Offenders: {:?}",
            offenders
        );
    }
}
