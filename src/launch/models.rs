//! Data model for version manifests and the resolved launch plan.
//!
//! A manifest is either a single patch or a `patches` chain of them
//! (forge-style layered versions). Each patch carries exactly one of two
//! historical argument schemas: the structured, rule-conditioned argument
//! arrays introduced in 1.13, or the legacy single-string blob. The schema
//! choice is a sum type and is matched exhaustively by the resolver.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// One version-descriptor node. The top-level manifest is itself a patch;
/// when `patches` is present its entries are applied in listed order and
/// the top-level fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ManifestPatch {
    #[serde(rename = "mainClass", skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,
    #[serde(default)]
    pub libraries: Vec<Library>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
    #[serde(rename = "minecraftArguments", skip_serializing_if = "Option::is_none")]
    pub minecraft_arguments: Option<String>,
    #[serde(rename = "inheritsFrom", skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patches: Option<Vec<ManifestPatch>>,
}

impl ManifestPatch {
    /// Decide the argument schema once; the resolver matches on the result
    /// instead of probing optional fields ad hoc.
    pub fn argument_schema(&self) -> ArgumentSchema<'_> {
        match (&self.arguments, &self.minecraft_arguments) {
            (Some(args), _) => ArgumentSchema::Structured(args),
            (None, Some(blob)) => ArgumentSchema::Legacy(blob),
            (None, None) => ArgumentSchema::Absent,
        }
    }
}

/// Which of the two historical argument schemas a patch uses.
pub enum ArgumentSchema<'a> {
    /// 1.13+ rule-conditioned argument arrays.
    Structured(&'a Arguments),
    /// Pre-1.13 space-delimited game-argument blob.
    Legacy(&'a str),
    /// No arguments at all: a library-only overlay patch. Contributes
    /// nothing and never overwrites accumulated game arguments.
    Absent,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<ArgumentValue>,
    #[serde(default)]
    pub jvm: Vec<ArgumentValue>,
}

/// One unresolved argument entry: a literal, or a rule-gated block whose
/// value only applies when its rules allow it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    String(String),
    Conditional {
        rules: Vec<Rule>,
        value: ArgumentValueInner,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArgumentValueInner {
    String(String),
    Array(Vec<String>),
}

/// An allow/disallow gate conditioned on host platform and feature flags.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OsRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

/// One required library: a `group:artifact:version` coordinate plus
/// optional platform rules, native-classifier map and extraction rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Library {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    // Declaration order matters: when several keys match the host OS, the
    // last one selects the classifier. Kept as pairs, not a HashMap.
    #[serde(
        default,
        deserialize_with = "deserialize_natives",
        serialize_with = "serialize_natives",
        skip_serializing_if = "Option::is_none"
    )]
    pub natives: Option<Vec<(String, String)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractRules>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractRules {
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn deserialize_natives<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<(String, String)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct NativesVisitor;

    impl<'de> serde::de::Visitor<'de> for NativesVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a map of OS name to native classifier")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, String>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(NativesVisitor).map(Some)
}

fn serialize_natives<S>(
    natives: &Option<Vec<(String, String)>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let entries = natives.as_deref().unwrap_or_default();
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (os, classifier) in entries {
        map.serialize_entry(os, classifier)?;
    }
    map.end()
}

impl Library {
    /// Parse the coordinate into its `(group, artifact, version)` identity.
    pub fn coordinate(&self) -> Result<LibraryCoordinate<'_>> {
        LibraryCoordinate::parse(&self.name)
    }
}

/// The `(group, artifact, version)` identity of a library, borrowed from
/// its coordinate string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryCoordinate<'a> {
    pub group: &'a str,
    pub artifact: &'a str,
    pub version: &'a str,
}

impl<'a> LibraryCoordinate<'a> {
    /// A coordinate must split into exactly 3 non-empty segments on `:`.
    pub fn parse(name: &'a str) -> Result<Self> {
        let segments: Vec<&str> = name.split(':').collect();
        match segments.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self {
                    group,
                    artifact,
                    version,
                })
            }
            _ => Err(Error::parse("library coordinate", name)),
        }
    }
}

/// The fully resolved, platform- and rule-filtered requirements for one
/// launch attempt. Read-only once built; argument strings still contain
/// `${placeholder}` templates to be expanded against a launch context.
#[derive(Debug, Clone, Default)]
pub struct LaunchPlan {
    pub jvm_args: Vec<String>,
    pub game_args: Vec<String>,
    pub logging_args: Vec<String>,
    pub libraries: Vec<Library>,
    pub main_class: Option<String>,
    pub assets_index: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_parses_into_three_segments() {
        let c = LibraryCoordinate::parse("com.example:foo:1.2.3").unwrap();
        assert_eq!(c.group, "com.example");
        assert_eq!(c.artifact, "foo");
        assert_eq!(c.version, "1.2.3");
    }

    #[test]
    fn bad_coordinates_are_parse_errors() {
        assert!(LibraryCoordinate::parse("bad:coord").is_err());
        assert!(LibraryCoordinate::parse("a:b:c:d").is_err());
        assert!(LibraryCoordinate::parse("a::c").is_err());
        assert!(LibraryCoordinate::parse("").is_err());
    }

    #[test]
    fn natives_map_preserves_declaration_order() {
        let json = r#"{
            "name": "org.lwjgl:lwjgl:2.9.4",
            "natives": {"linux": "natives-linux", "windows": "natives-windows", "osx": "natives-osx"}
        }"#;
        let library: Library = serde_json::from_str(json).unwrap();
        let natives = library.natives.unwrap();
        assert_eq!(
            natives,
            vec![
                ("linux".to_string(), "natives-linux".to_string()),
                ("windows".to_string(), "natives-windows".to_string()),
                ("osx".to_string(), "natives-osx".to_string()),
            ]
        );
    }

    #[test]
    fn argument_values_deserialize_both_shapes() {
        let json = r#"[
            "--username",
            {"rules": [{"action": "allow", "features": {"is_demo_user": true}}], "value": "--demo"},
            {"rules": [{"action": "allow", "os": {"name": "windows"}}], "value": ["-a", "-b"]}
        ]"#;
        let args: Vec<ArgumentValue> = serde_json::from_str(json).unwrap();
        assert!(matches!(&args[0], ArgumentValue::String(s) if s == "--username"));
        assert!(matches!(
            &args[1],
            ArgumentValue::Conditional {
                value: ArgumentValueInner::String(_),
                ..
            }
        ));
        assert!(matches!(
            &args[2],
            ArgumentValue::Conditional {
                value: ArgumentValueInner::Array(v),
                ..
            } if v.len() == 2
        ));
    }

    #[test]
    fn rule_action_is_a_closed_enum() {
        let rule: Rule = serde_json::from_str(r#"{"action": "disallow"}"#).unwrap();
        assert_eq!(rule.action, RuleAction::Disallow);
        assert!(serde_json::from_str::<Rule>(r#"{"action": "maybe"}"#).is_err());
    }

    #[test]
    fn schema_choice_is_decided_once() {
        let legacy: ManifestPatch =
            serde_json::from_str(r#"{"minecraftArguments": "--username x"}"#).unwrap();
        assert!(matches!(
            legacy.argument_schema(),
            ArgumentSchema::Legacy("--username x")
        ));

        let structured: ManifestPatch =
            serde_json::from_str(r#"{"arguments": {"game": [], "jvm": []}}"#).unwrap();
        assert!(matches!(
            structured.argument_schema(),
            ArgumentSchema::Structured(_)
        ));

        let library_only: ManifestPatch =
            serde_json::from_str(r#"{"libraries": [{"name": "a:b:1"}]}"#).unwrap();
        assert!(matches!(
            library_only.argument_schema(),
            ArgumentSchema::Absent
        ));
    }
}
