//! Lexical path arithmetic for rewriting absolute targets.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            _ => out.push(comp),
        }
    }
    out
}

/// Express `target` relative to `base`, e.g. `/a/b/obj/x.o` against `/a/b`
/// gives `obj/x.o` and `/a/c/x.o` gives `../c/x.o`. Identical paths give `.`.
///
/// Both paths are expected to be absolute.
pub fn relative_to(target: &Path, base: &Path) -> PathBuf {
    let target = normalize(target);
    let base = normalize(base);

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(t, b)| t == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for comp in &target[common..] {
        rel.push(comp.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}
