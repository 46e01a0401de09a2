//! On-disk layout of a rooted game directory.
//!
//! The launcher never creates the top-level tree; it only reads from it
//! and writes extracted natives into the runtime binary directory.

use std::path::{Path, PathBuf};

const VERSIONS: &str = "versions";
const LIBRARIES: &str = "libraries";
const ASSETS: &str = "assets";
const NATIVES: &str = "bin";

/// Directory holding per-version manifests and jars.
#[inline]
pub fn versions_dir(game_dir: &Path) -> PathBuf {
    game_dir.join(VERSIONS)
}

/// `versions/<id>/<id>.json` for a version.
#[inline]
pub fn version_json_path(game_dir: &Path, version: &str) -> PathBuf {
    versions_dir(game_dir)
        .join(version)
        .join(format!("{version}.json"))
}

/// `versions/<id>/<id>.jar` for a version.
#[inline]
pub fn version_jar_path(game_dir: &Path, version: &str) -> PathBuf {
    versions_dir(game_dir)
        .join(version)
        .join(format!("{version}.jar"))
}

/// Root of the on-disk library store.
#[inline]
pub fn libraries_dir(game_dir: &Path) -> PathBuf {
    game_dir.join(LIBRARIES)
}

/// Shared assets root.
#[inline]
pub fn assets_dir(game_dir: &Path) -> PathBuf {
    game_dir.join(ASSETS)
}

/// Runtime directory native payloads are extracted into.
#[inline]
pub fn natives_dir(game_dir: &Path) -> PathBuf {
    game_dir.join(NATIVES)
}

/// Classpath separator for the current platform.
#[inline]
pub const fn classpath_separator() -> &'static str {
    if cfg!(windows) { ";" } else { ":" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_paths_follow_the_store_layout() {
        let root = Path::new("/games/mc");
        assert_eq!(
            version_json_path(root, "1.12.2"),
            PathBuf::from("/games/mc/versions/1.12.2/1.12.2.json")
        );
        assert_eq!(
            version_jar_path(root, "1.12.2"),
            PathBuf::from("/games/mc/versions/1.12.2/1.12.2.jar")
        );
    }

    #[test]
    fn natives_live_under_bin() {
        assert_eq!(natives_dir(Path::new("/g")), PathBuf::from("/g/bin"));
    }
}
