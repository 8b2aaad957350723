use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::{ApiError, Credentials, MelodyClient, User};

const MAX_LOGIN_ATTEMPTS: usize = 3;

/// A logged-in user and the bearer token that authorizes them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub fn load_session(path: &Path) -> Option<Session> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Ignoring unreadable session file");
            None
        }
    }
}

pub fn save_session(path: &Path, session: &Session) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(session)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Saved session");
    Ok(())
}

pub fn clear_session(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("Cleared stored session");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

/// Reuse a stored session if the server still accepts it, otherwise log in
/// with configured or prompted credentials. Leaves the token set on `client`.
pub async fn establish_session(client: &MelodyClient, config: &Config) -> Result<Session> {
    let session_file = config.session_file();

    if let Some(stored) = load_session(&session_file) {
        client.set_token(Some(stored.token.clone())).await;
        match client.current_user().await {
            Ok(user) => {
                tracing::info!(user = %user.username, "Resumed stored session");
                let session = Session { token: stored.token, user };
                save_session(&session_file, &session)?;
                return Ok(session);
            }
            Err(ApiError::Unauthorized) => {
                tracing::info!("Stored session expired");
                clear_session(&session_file)?;
            }
            Err(e) => return Err(e).context("Could not reach the music server"),
        }
    }

    let session = match (&config.username, &config.password) {
        (Some(username), Some(password)) => {
            let credentials = Credentials { username: username.clone(), password: password.clone() };
            login(client, &credentials).await.context("Login with configured credentials failed")?
        }
        _ => interactive_login(client, config.username.as_deref()).await?,
    };

    save_session(&session_file, &session)?;
    Ok(session)
}

async fn login(client: &MelodyClient, credentials: &Credentials) -> Result<Session, ApiError> {
    let token = client.login(credentials).await?;
    client.set_token(Some(token.access_token.clone())).await;
    let user = client.current_user().await?;
    tracing::info!(user = %user.username, "Logged in");
    Ok(Session { token: token.access_token, user })
}

/// Ask for credentials on the terminal before the TUI takes it over.
/// Rejected credentials can be registered as a new account.
async fn interactive_login(client: &MelodyClient, username: Option<&str>) -> Result<Session> {
    println!("Log in to {}", client.base_url());

    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let username = match username {
            Some(name) => name.to_string(),
            None => prompt("Username: ")?,
        };
        let password = prompt("Password: ")?;
        let credentials = Credentials { username, password };

        match login(client, &credentials).await {
            Ok(session) => return Ok(session),
            Err(ApiError::Unauthorized) => {
                let answer = prompt("Login failed. Create this account? [y/N] ")?;
                if !answer.eq_ignore_ascii_case("y") {
                    continue;
                }
                match client.register(&credentials).await {
                    Ok(user) => {
                        tracing::info!(user = %user.username, "Registered new account");
                        return login(client, &credentials).await.context("Login after registration failed");
                    }
                    Err(e) => println!("Registration failed: {e}"),
                }
            }
            Err(e) => return Err(e).context("Login failed"),
        }
    }

    anyhow::bail!("Too many failed login attempts")
}

fn prompt(label: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        anyhow::bail!("No input available for login");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
