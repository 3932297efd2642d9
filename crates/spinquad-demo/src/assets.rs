use std::path::{Path, PathBuf};

/// Resolves a path relative to the working directory.
///
/// Shader paths are written relative to a directory that sits next to
/// `shaders/`. When the program is launched from somewhere else (e.g. the
/// workspace root via `cargo run`), the lookup falls back to this crate's
/// `src/` directory, which has that shape.
pub fn resolve(relative: &Path) -> PathBuf {
    resolve_from(
        &[
            std::env::current_dir().unwrap_or_default(),
            Path::new(env!("CARGO_MANIFEST_DIR")).join("src"),
        ],
        relative,
    )
}

fn resolve_from(bases: &[PathBuf], relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        return relative.to_path_buf();
    }

    bases
        .iter()
        .map(|base| base.join(relative))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| relative.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fragment_shader_is_found_from_src() {
        let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
        let found = resolve_from(&[PathBuf::from("/nonexistent"), src], Path::new("../shaders/fragment.glsl"));
        assert!(found.is_file(), "{}", found.display());
    }

    #[test]
    fn first_existing_base_wins() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let found = resolve_from(&[root.clone(), root.join("src")], Path::new("shaders/fragment.glsl"));
        assert_eq!(found, root.join("shaders/fragment.glsl"));
    }

    #[test]
    fn unresolved_path_is_returned_unchanged() {
        let p = Path::new("no/such/shader.glsl");
        assert_eq!(resolve_from(&[PathBuf::from("/nonexistent")], p), p);
    }
}
