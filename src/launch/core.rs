//! The launch pipeline: manifest in, executable argument vector out.
//!
//! Resolution is synchronous and blocking over already-loaded data; the
//! only async step is handing the finished argument vector to the child
//! process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::auth::AuthAccount;
use crate::error::{Error, Result};
use crate::launch::format::format_string;
use crate::launch::libraries::resolve_library_files;
use crate::launch::models::ManifestPatch;
use crate::launch::platform::{FeatureFlags, HostDescriptor};
use crate::launch::resolver::compose;
use crate::utils::paths::{
    assets_dir, classpath_separator, natives_dir, version_jar_path, version_json_path,
    versions_dir,
};

const LAUNCHER_NAME: &str = "GhostzLauncher";
const LAUNCHER_VERSION: &str = "1.0.0";
const VERSION_TYPE: &str = "Ghost's Launcher";

/// A fully expanded launch invocation, ready for process spawning.
#[derive(Debug, Clone)]
pub struct ResolvedLaunch {
    /// `jvm args ++ [main class] ++ game args`, every placeholder expanded.
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

/// Resolves launch profiles against a rooted game directory.
pub struct LaunchCore {
    game_dir: PathBuf,
}

impl LaunchCore {
    pub fn new(game_dir: impl Into<PathBuf>) -> Self {
        Self {
            game_dir: game_dir.into(),
        }
    }

    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    /// Versions available for launching: the directory names under
    /// `versions/`.
    pub fn available_versions(&self) -> Result<Vec<String>> {
        let mut versions = Vec::new();
        for entry in std::fs::read_dir(versions_dir(&self.game_dir))? {
            let entry = entry?;
            if entry.path().is_dir() {
                versions.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        versions.sort();
        Ok(versions)
    }

    /// Resolve a version into its final argument vector for this host.
    ///
    /// Reads and composes the version manifest, resolves the library store
    /// and stages natives, then expands every argument template against
    /// the launch context. Fails before returning anything runnable if the
    /// chain produced no main class.
    pub fn resolve(
        &self,
        version: &str,
        account: &AuthAccount,
        host: &HostDescriptor,
        features: &FeatureFlags,
    ) -> Result<ResolvedLaunch> {
        let manifest = self.read_manifest(version)?;
        let plan = compose(&manifest, host, features)?;
        debug!(
            jvm_args = plan.jvm_args.len(),
            game_args = plan.game_args.len(),
            libraries = plan.libraries.len(),
            "launch plan composed"
        );

        let main_class = plan.main_class.clone().ok_or(Error::MissingMainClass)?;

        let library_files = resolve_library_files(&plan.libraries, host, &self.game_dir)?;
        let mut classpath_entries: Vec<String> = library_files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        classpath_entries.push(
            version_jar_path(&self.game_dir, version)
                .to_string_lossy()
                .into_owned(),
        );
        let classpath = classpath_entries.join(classpath_separator());

        let context = self.launch_context(version, account, &plan.assets_index, classpath);

        let mut args = Vec::with_capacity(plan.jvm_args.len() + 1 + plan.game_args.len());
        for arg in &plan.jvm_args {
            args.push(format_string(arg, &context)?);
        }
        args.push(main_class);
        for arg in &plan.game_args {
            args.push(format_string(arg, &context)?);
        }

        Ok(ResolvedLaunch {
            args,
            working_dir: self.game_dir.clone(),
        })
    }

    /// Resolve and spawn the game process. Thin wrapper over [`resolve`];
    /// the process outlives the launcher.
    ///
    /// [`resolve`]: Self::resolve
    pub async fn launch(
        &self,
        version: &str,
        account: &AuthAccount,
        host: &HostDescriptor,
        features: &FeatureFlags,
    ) -> Result<u32> {
        let resolved = self.resolve(version, account, host, features)?;
        info!(version, args = resolved.args.len(), "starting game process");

        let child = tokio::process::Command::new("java")
            .args(&resolved.args)
            .current_dir(&resolved.working_dir)
            .spawn()?;
        Ok(child.id().unwrap_or_default())
    }

    fn read_manifest(&self, version: &str) -> Result<ManifestPatch> {
        let path = version_json_path(&self.game_dir, version);
        if !path.is_file() {
            return Err(Error::ManifestNotFound(path));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Placeholder substitutions for this launch, assembled immediately
    /// before formatting and discarded afterwards.
    fn launch_context(
        &self,
        version: &str,
        account: &AuthAccount,
        assets_index: &Option<String>,
        classpath: String,
    ) -> HashMap<String, String> {
        let mut context = HashMap::new();
        let mut set = |key: &str, value: String| {
            context.insert(key.to_string(), value);
        };

        set("auth_player_name", account.user_name.clone());
        set("version_name", version.to_string());
        set(
            "game_directory",
            self.game_dir.to_string_lossy().into_owned(),
        );
        set(
            "assets_root",
            assets_dir(&self.game_dir).to_string_lossy().into_owned(),
        );
        if let Some(index) = assets_index {
            set("assets_index_name", index.clone());
        }
        set("auth_uuid", account.uuid.clone());
        set("auth_access_token", account.access_token.clone());
        set("user_type", "mojang".to_string());
        set("version_type", VERSION_TYPE.to_string());
        set(
            "natives_directory",
            natives_dir(&self.game_dir).to_string_lossy().into_owned(),
        );
        set("launcher_name", LAUNCHER_NAME.to_string());
        set("launcher_version", LAUNCHER_VERSION.to_string());
        set("classpath", classpath);

        context
    }
}
