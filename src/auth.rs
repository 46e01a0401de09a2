//! Account login and the persisted account record.
//!
//! The identity provider is a black box: one POST with the credentials,
//! one response carrying either an authenticated identity or an error
//! message. No retry, no timeout, no partial identity; on failure the
//! shell treats the account as absent.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{Error, Result};

const AUTH_SERVER: &str = "https://authserver.mojang.com/authenticate";
const CLIENT_TOKEN: &str = "3db50481-84f6-4060-9439-42b78ac1b62c";

/// An authenticated identity, as the resolver consumes it and as it is
/// persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAccount {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub uuid: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    error: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
    #[serde(rename = "selectedProfile")]
    selected_profile: Option<SelectedProfile>,
}

#[derive(Debug, Deserialize)]
struct SelectedProfile {
    name: String,
    id: String,
}

/// Exchange credentials for an identity. One request, one response.
pub async fn authenticate(email: &str, password: &str) -> Result<AuthAccount> {
    let payload = json!({
        "username": email,
        "password": password,
        "requestUser": true,
        "clientToken": CLIENT_TOKEN,
        "agent": { "name": "Minecraft", "version": 1 },
    });

    let response: AuthResponse = reqwest::Client::new()
        .post(AUTH_SERVER)
        .json(&payload)
        .send()
        .await?
        .json()
        .await?;

    if response.error.is_some() {
        // Surface the server's own message, unmodified.
        let message = response
            .error_message
            .or(response.error)
            .unwrap_or_default();
        return Err(Error::Auth(message));
    }

    match (response.selected_profile, response.access_token) {
        (Some(profile), Some(access_token)) => {
            info!(user = %profile.name, "authenticated");
            Ok(AuthAccount {
                user_name: profile.name,
                uuid: profile.id,
                access_token,
            })
        }
        _ => Err(Error::Auth("incomplete authentication response".into())),
    }
}

/// Where the saved account lives, relative to the game directory.
fn accounts_path(game_dir: &Path) -> PathBuf {
    game_dir.join(".glauncher").join("accounts.json")
}

/// Load the saved account, if any. The record is a one-element array; a
/// missing or empty file simply means no account.
pub fn load_account(game_dir: &Path) -> Result<Option<AuthAccount>> {
    let path = accounts_path(game_dir);
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let mut accounts: Vec<AuthAccount> = serde_json::from_str(&content)?;
    Ok(if accounts.is_empty() {
        None
    } else {
        Some(accounts.remove(0))
    })
}

/// Persist the current account as a one-element array.
pub fn save_account(game_dir: &Path, account: &AuthAccount) -> Result<()> {
    let path = accounts_path(game_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let record = serde_json::to_string(&[account])?;
    std::fs::write(path, record)?;
    Ok(())
}
