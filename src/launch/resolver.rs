//! Manifest patch resolution and patch-chain composition.
//!
//! `resolve_patch` reduces one version-descriptor node to its contribution
//! for the current host; `compose` folds a whole chain of such
//! contributions into a single [`LaunchPlan`].

use tracing::debug;

use crate::error::Result;
use crate::launch::models::{
    ArgumentSchema, ArgumentValue, ArgumentValueInner, Arguments, LaunchPlan, Library,
    ManifestPatch,
};
use crate::launch::platform::{FeatureFlags, HostDescriptor};
use crate::launch::rules::is_allowed;

/// What one patch contributes to the composed plan.
#[derive(Debug, Clone, Default)]
pub struct PatchContribution {
    pub jvm_args: Vec<String>,
    pub game_args: Vec<String>,
    pub logging_args: Vec<String>,
    pub libraries: Vec<Library>,
    pub main_class: Option<String>,
    pub assets_index: Option<String>,
    /// Legacy patches carry the complete game-argument set for their
    /// version, so they replace whatever accumulated before them instead
    /// of appending to it.
    pub overwrite_game_args: bool,
}

/// JVM arguments implied by the legacy schema, which predates explicit
/// jvm-argument lists.
const LEGACY_JVM_ARGS: [&str; 3] = ["-cp", "${classpath}", "-Djava.library.path=${natives_directory}"];

/// Resolve one patch node against the host platform and feature flags.
pub fn resolve_patch(
    patch: &ManifestPatch,
    host: &HostDescriptor,
    features: &FeatureFlags,
) -> Result<PatchContribution> {
    let libraries = resolve_libraries(&patch.libraries, host, features)?;

    let (jvm_args, game_args, overwrite_game_args) = match patch.argument_schema() {
        ArgumentSchema::Structured(arguments) => {
            let (jvm, game) = resolve_arguments(arguments, host, features)?;
            (jvm, game, false)
        }
        ArgumentSchema::Legacy(blob) => {
            let jvm = LEGACY_JVM_ARGS.iter().map(|s| s.to_string()).collect();
            // `"".split(' ')` yields one empty segment, not none.
            let game = if blob.is_empty() {
                Vec::new()
            } else {
                blob.split(' ').map(str::to_string).collect()
            };
            (jvm, game, true)
        }
        ArgumentSchema::Absent => (Vec::new(), Vec::new(), false),
    };

    Ok(PatchContribution {
        jvm_args,
        game_args,
        // Logging-argument resolution from `patch.logging` is not
        // implemented; the slot stays empty.
        logging_args: Vec::new(),
        libraries,
        main_class: patch.main_class.clone(),
        assets_index: patch.assets.clone(),
        overwrite_game_args,
    })
}

/// Compose a manifest into a launch plan.
///
/// A manifest with a `patches` field is folded in listed order; a bare
/// manifest is a one-patch chain. JVM arguments and libraries accumulate
/// by concatenation (duplicates preserved), game arguments accumulate
/// unless a legacy patch overwrites them, and the last patch to name a
/// main class or assets index wins.
pub fn compose(
    manifest: &ManifestPatch,
    host: &HostDescriptor,
    features: &FeatureFlags,
) -> Result<LaunchPlan> {
    let mut plan = LaunchPlan::default();

    let chain: &[ManifestPatch] = match &manifest.patches {
        Some(patches) => patches,
        None => std::slice::from_ref(manifest),
    };
    debug!(patches = chain.len(), "composing launch plan");

    for patch in chain {
        let contribution = resolve_patch(patch, host, features)?;

        plan.jvm_args.extend(contribution.jvm_args);
        if contribution.overwrite_game_args {
            plan.game_args = contribution.game_args;
        } else {
            plan.game_args.extend(contribution.game_args);
        }
        plan.logging_args.extend(contribution.logging_args);
        plan.libraries.extend(contribution.libraries);

        if contribution.main_class.is_some() {
            plan.main_class = contribution.main_class;
        }
        if contribution.assets_index.is_some() {
            plan.assets_index = contribution.assets_index;
        }
    }

    Ok(plan)
}

/// Keep a library iff it has no rules or its rules allow this host.
fn resolve_libraries(
    libraries: &[Library],
    host: &HostDescriptor,
    features: &FeatureFlags,
) -> Result<Vec<Library>> {
    let mut result = Vec::new();
    for library in libraries {
        let keep = match &library.rules {
            None => true,
            Some(rules) => is_allowed(rules, host, features)?,
        };
        if keep {
            result.push(library.clone());
        } else {
            debug!(library = %library.name, "excluded by rules");
        }
    }
    Ok(result)
}

/// Expand structured argument lists: literals append as-is, conditional
/// blocks append their value only when their rules allow, a string value
/// as one element and a list value in full.
fn resolve_arguments(
    arguments: &Arguments,
    host: &HostDescriptor,
    features: &FeatureFlags,
) -> Result<(Vec<String>, Vec<String>)> {
    let resolve_list = |entries: &[ArgumentValue]| -> Result<Vec<String>> {
        let mut out = Vec::new();
        for entry in entries {
            match entry {
                ArgumentValue::String(s) => out.push(s.clone()),
                ArgumentValue::Conditional { rules, value } => {
                    if is_allowed(rules, host, features)? {
                        match value {
                            ArgumentValueInner::String(s) => out.push(s.clone()),
                            ArgumentValueInner::Array(items) => out.extend(items.iter().cloned()),
                        }
                    }
                }
            }
        }
        Ok(out)
    };

    Ok((resolve_list(&arguments.jvm)?, resolve_list(&arguments.game)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::platform::default_features;

    fn win_host() -> HostDescriptor {
        HostDescriptor::new("win32", "10.0.0", "x64")
    }

    fn legacy_patch(blob: &str, main_class: Option<&str>) -> ManifestPatch {
        ManifestPatch {
            main_class: main_class.map(String::from),
            minecraft_arguments: Some(blob.to_string()),
            ..Default::default()
        }
    }

    fn structured_patch(game: &str, main_class: Option<&str>) -> ManifestPatch {
        serde_json::from_str(&format!(
            r#"{{
                {}
                "arguments": {{"game": {game}, "jvm": []}}
            }}"#,
            main_class
                .map(|m| format!(r#""mainClass": "{m}","#))
                .unwrap_or_default()
        ))
        .unwrap()
    }

    #[test]
    fn legacy_patch_has_fixed_jvm_args_and_split_blob() {
        let patch = legacy_patch("--username ${auth_player_name} --gameDir ${game_directory}", None);
        let c = resolve_patch(&patch, &win_host(), &default_features()).unwrap();
        assert_eq!(
            c.jvm_args,
            vec!["-cp", "${classpath}", "-Djava.library.path=${natives_directory}"]
        );
        assert_eq!(
            c.game_args,
            vec!["--username", "${auth_player_name}", "--gameDir", "${game_directory}"]
        );
        assert!(c.overwrite_game_args);
        assert!(c.logging_args.is_empty());
    }

    #[test]
    fn structured_patch_appends_allowed_conditionals_only() {
        let patch = structured_patch(
            r#"[
                "--version",
                {"rules": [{"action": "allow", "os": {"name": "windows"}}], "value": ["--win", "--extra"]},
                {"rules": [{"action": "allow", "os": {"name": "osx"}}], "value": "--mac"},
                {"rules": [{"action": "allow", "features": {"is_demo_user": true}}], "value": "--demo"}
            ]"#,
            None,
        );
        let c = resolve_patch(&patch, &win_host(), &default_features()).unwrap();
        assert_eq!(c.game_args, vec!["--version", "--win", "--extra"]);
        assert!(!c.overwrite_game_args);
    }

    #[test]
    fn legacy_then_structured_appends() {
        let manifest = ManifestPatch {
            patches: Some(vec![
                legacy_patch("A B", Some("Main")),
                structured_patch(r#"["C"]"#, None),
            ]),
            ..Default::default()
        };
        let plan = compose(&manifest, &win_host(), &default_features()).unwrap();
        assert_eq!(plan.game_args, vec!["A", "B", "C"]);
        assert_eq!(plan.main_class.as_deref(), Some("Main"));
    }

    #[test]
    fn structured_then_legacy_overwrites() {
        let manifest = ManifestPatch {
            patches: Some(vec![
                structured_patch(r#"["C"]"#, None),
                legacy_patch("A B", None),
            ]),
            ..Default::default()
        };
        let plan = compose(&manifest, &win_host(), &default_features()).unwrap();
        assert_eq!(plan.game_args, vec!["A", "B"]);
    }

    #[test]
    fn last_main_class_and_assets_index_win() {
        let mut first = legacy_patch("A", Some("Main"));
        first.assets = Some("1.12".to_string());
        let manifest = ManifestPatch {
            patches: Some(vec![first, structured_patch(r#"[]"#, Some("Main2"))]),
            ..Default::default()
        };
        let plan = compose(&manifest, &win_host(), &default_features()).unwrap();
        assert_eq!(plan.main_class.as_deref(), Some("Main2"));
        // A later patch without an assets index does not clear the earlier one.
        assert_eq!(plan.assets_index.as_deref(), Some("1.12"));
    }

    #[test]
    fn bare_manifest_is_a_one_patch_chain() {
        let manifest = legacy_patch("A B", Some("Main"));
        let plan = compose(&manifest, &win_host(), &default_features()).unwrap();
        assert_eq!(plan.game_args, vec!["A", "B"]);
        assert_eq!(plan.main_class.as_deref(), Some("Main"));
    }

    #[test]
    fn empty_legacy_blob_yields_no_game_args() {
        let patch = legacy_patch("", None);
        let c = resolve_patch(&patch, &win_host(), &default_features()).unwrap();
        assert!(c.game_args.is_empty());
        // The schema still implies the fixed JVM args and an overwrite.
        assert_eq!(c.jvm_args.len(), 3);
        assert!(c.overwrite_game_args);
    }

    #[test]
    fn library_only_patch_keeps_accumulated_game_args() {
        let overlay: ManifestPatch =
            serde_json::from_str(r#"{"libraries": [{"name": "com.example:extra:1.0"}]}"#).unwrap();
        let manifest = ManifestPatch {
            patches: Some(vec![structured_patch(r#"["C"]"#, Some("Main")), overlay]),
            ..Default::default()
        };
        let plan = compose(&manifest, &win_host(), &default_features()).unwrap();
        assert_eq!(plan.game_args, vec!["C"]);
        assert_eq!(plan.libraries.len(), 1);
    }

    #[test]
    fn libraries_accumulate_without_deduplication() {
        let library_json = r#"{"libraries": [{"name": "com.example:foo:1.0"}]}"#;
        let patch: ManifestPatch = serde_json::from_str(library_json).unwrap();
        let manifest = ManifestPatch {
            patches: Some(vec![patch.clone(), patch]),
            ..Default::default()
        };
        let plan = compose(&manifest, &win_host(), &default_features()).unwrap();
        assert_eq!(plan.libraries.len(), 2);
        assert_eq!(plan.libraries[0].name, plan.libraries[1].name);
    }

    #[test]
    fn rule_gated_library_is_filtered_per_host() {
        let json = r#"{
            "libraries": [
                {"name": "com.example:everywhere:1.0"},
                {"name": "com.example:mac-only:1.0",
                 "rules": [{"action": "allow", "os": {"name": "osx"}}]}
            ]
        }"#;
        let patch: ManifestPatch = serde_json::from_str(json).unwrap();
        let c = resolve_patch(&patch, &win_host(), &default_features()).unwrap();
        assert_eq!(c.libraries.len(), 1);
        assert_eq!(c.libraries[0].name, "com.example:everywhere:1.0");
    }

    #[test]
    fn two_patch_chain_end_to_end() {
        let json = r#"{
            "patches": [
                {
                    "mainClass": "Main",
                    "minecraftArguments": "--legacy only",
                    "libraries": [{"name": "com.example:base:1.0"}]
                },
                {
                    "mainClass": "Main2",
                    "arguments": {"game": ["--structured"], "jvm": []},
                    "libraries": [
                        {"name": "com.example:windows-extra:1.0",
                         "rules": [{"action": "allow", "os": {"name": "windows"}}]}
                    ]
                }
            ]
        }"#;
        let manifest: ManifestPatch = serde_json::from_str(json).unwrap();
        let plan = compose(&manifest, &win_host(), &default_features()).unwrap();
        assert_eq!(plan.main_class.as_deref(), Some("Main2"));
        assert_eq!(
            plan.libraries.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
            vec!["com.example:base:1.0", "com.example:windows-extra:1.0"]
        );
        // Legacy patch overwrote onto nothing; structured patch appended.
        assert_eq!(plan.game_args, vec!["--legacy", "only", "--structured"]);
        assert_eq!(
            plan.jvm_args,
            vec!["-cp", "${classpath}", "-Djava.library.path=${natives_directory}"]
        );
    }
}
