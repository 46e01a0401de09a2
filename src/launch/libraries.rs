//! Library store resolution and native payload extraction.
//!
//! Maps library coordinates to on-disk jar paths, verifies presence, and
//! stages platform-native payloads into the runtime binary directory.
//! Missing files are detected and reported, never downloaded.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::launch::models::Library;
use crate::launch::platform::{os_name_matches, HostDescriptor};
use crate::utils::paths::{libraries_dir, natives_dir};

/// Resolve every library to its on-disk artifact and stage natives.
///
/// Returns the classpath entries, in library order. A library whose plain
/// artifact is absent is fatal unless it declares a natives map: native-only
/// libraries legitimately have no plain jar. Native payloads matching the
/// host are extracted into `<game_dir>/bin` as a side effect.
pub fn resolve_library_files(
    libraries: &[Library],
    host: &HostDescriptor,
    game_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut classpath = Vec::new();

    for library in libraries {
        let coordinate = library.coordinate()?;
        let directory = libraries_dir(game_dir)
            .join(coordinate.group.replace('.', "/"))
            .join(coordinate.artifact)
            .join(coordinate.version);
        let artifact = directory.join(format!(
            "{}-{}.jar",
            coordinate.artifact, coordinate.version
        ));

        if artifact.is_file() {
            classpath.push(artifact);
        } else if library.natives.is_none() {
            return Err(Error::MissingLibrary(library.name.clone()));
        }

        if let Some(natives) = &library.natives {
            if let Some(classifier) = select_classifier(natives, host) {
                let archive = directory.join(format!(
                    "{}-{}-{}.jar",
                    coordinate.artifact, coordinate.version, classifier
                ));
                info!(library = %library.name, %classifier, "extracting natives");
                extract_natives(&archive, game_dir, library)?;
            }
        }
    }

    Ok(classpath)
}

/// Pick the native classifier for the host: scan the map in declaration
/// order, the last OS-name-matching key wins.
fn select_classifier<'a>(
    natives: &'a [(String, String)],
    host: &HostDescriptor,
) -> Option<&'a str> {
    let mut selected = None;
    for (os, classifier) in natives {
        if os_name_matches(os, &host.os_name) {
            selected = Some(classifier.as_str());
        }
    }
    selected
}

/// Extract a native archive into the runtime binary directory, flattened.
///
/// Entries whose name plus a trailing `/` appears in the library's
/// extraction-exclusion set are skipped; everything else overwrites any
/// existing file of the same name. Archive-read failures propagate
/// unchanged.
fn extract_natives(archive_path: &Path, game_dir: &Path, library: &Library) -> Result<()> {
    let target = natives_dir(game_dir);
    std::fs::create_dir_all(&target)?;

    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let excluded = match &library.extract {
            Some(rules) => {
                let name_as_dir = format!("{}/", entry.name());
                rules.exclude.contains(&name_as_dir)
            }
            None => false,
        };
        if excluded {
            debug!(entry = entry.name(), "excluded from extraction");
            continue;
        }

        // Flattened: only the file name lands in the binary directory.
        let file_name = match Path::new(entry.name()).file_name() {
            Some(name) => name.to_owned(),
            None => continue,
        };

        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut contents)?;

        let mut output = File::create(target.join(file_name))?;
        output.write_all(&contents)?;
    }

    Ok(())
}
