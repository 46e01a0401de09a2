//! Host platform detection and the predicates used by manifest rules.
//!
//! Manifests declare platforms in the Mojang vocabulary (`windows`, `osx`,
//! `x86`), while the host reports itself in the Node-style vocabulary the
//! historical manifests were written against (`win32`, `darwin`, `x64`).
//! The matchers below bridge the two.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// The runtime platform, captured once per launch and passed by value
/// through the whole resolution pipeline.
#[derive(Debug, Clone)]
pub struct HostDescriptor {
    pub os_name: String,
    pub os_version: String,
    pub os_arch: String,
}

impl HostDescriptor {
    pub fn new(
        os_name: impl Into<String>,
        os_version: impl Into<String>,
        os_arch: impl Into<String>,
    ) -> Self {
        Self {
            os_name: os_name.into(),
            os_version: os_version.into(),
            os_arch: os_arch.into(),
        }
    }

    /// Describe the platform we are actually running on.
    ///
    /// The OS version is not portably available from the standard library;
    /// callers that care (Windows version-gated rules) can override it via
    /// the `GLAUNCHER_OS_VERSION` environment variable.
    pub fn current() -> Self {
        let os_name = match std::env::consts::OS {
            "windows" => "win32",
            "macos" => "darwin",
            other => other,
        };
        let os_arch = match std::env::consts::ARCH {
            "x86_64" => "x64",
            "x86" => "x32",
            "aarch64" => "arm64",
            other => other,
        };
        let os_version = std::env::var("GLAUNCHER_OS_VERSION").unwrap_or_else(|_| "0.0.0".into());
        Self::new(os_name, os_version, os_arch)
    }
}

/// Feature flags consulted by `features` rule constraints, e.g.
/// `is_demo_user`, `has_custom_resolution`. Immutable per launch.
pub type FeatureFlags = HashMap<String, bool>;

/// The default flag set the shell passes when the user asked for nothing
/// special.
pub fn default_features() -> FeatureFlags {
    let mut features = HashMap::new();
    features.insert("is_demo_user".to_string(), false);
    features.insert("has_custom_resolution".to_string(), false);
    features
}

/// Does a declared OS name match the actual host name?
///
/// `"windows"` matches only `"win32"`, `"osx"` only `"darwin"`,
/// `"unknown"` matches anything; everything else is plain equality.
pub fn os_name_matches(declared: &str, actual: &str) -> bool {
    match declared {
        "windows" => actual == "win32",
        "osx" => actual == "darwin",
        "unknown" => true,
        other => other == actual,
    }
}

/// Does a declared arch token match the actual host arch?
///
/// `"x86"` covers both `"x32"` and `"x64"`; everything else is plain
/// equality.
pub fn arch_matches(declared: &str, actual: &str) -> bool {
    match declared {
        "x86" => actual == "x32" || actual == "x64",
        other => other == actual,
    }
}

/// Does a declared version expression match the actual host version?
///
/// Only expressions of the form `^<version><one trailing char>` are range
/// tests: the declared lower bound must be <= the actual version, compared
/// major-first. Every other form returns false, including exact version
/// strings. That is observed legacy manifest behavior, kept as-is.
pub fn os_version_matches(declared: &str, actual: &str) -> Result<bool> {
    let body = match declared.strip_prefix('^') {
        Some(body) => body,
        None => return Ok(false),
    };
    // The trailing character mirrors a dropped upper bound and is ignored.
    let lower_raw = match body.char_indices().next_back() {
        Some((idx, _)) => &body[..idx],
        None => return Ok(false),
    };
    let lower = VersionTriple::parse(lower_raw)?;
    let current = VersionTriple::parse(actual)?;
    Ok(lower.is_at_most(&current))
}

/// A `{major, minor, build}` version, parsed from up to three dot-separated
/// segments. Segments are held as floats so that a non-numeric segment
/// becomes NaN and fails every comparison, rather than aborting the launch.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VersionTriple {
    major: f64,
    minor: f64,
    build: f64,
}

impl VersionTriple {
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split('.').collect();
        if raw.is_empty() || segments.len() > 3 {
            return Err(Error::parse("version string", raw));
        }
        let segment = |i: usize| -> f64 {
            match segments.get(i) {
                None => 0.0,
                Some(s) if s.is_empty() => 0.0,
                Some(s) => s.parse().unwrap_or(f64::NAN),
            }
        };
        Ok(Self {
            major: segment(0),
            minor: segment(1),
            build: segment(2),
        })
    }

    /// Lexicographic `self <= other`, major first. NaN segments fail every
    /// comparison, so a malformed segment can never satisfy the bound.
    fn is_at_most(&self, other: &Self) -> bool {
        if self.major < other.major {
            true
        } else if self.major == other.major {
            if self.minor < other.minor {
                true
            } else if self.minor == other.minor {
                self.build <= other.build
            } else {
                false
            }
        } else {
            false
        }
    }
}
