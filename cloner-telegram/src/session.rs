//! Telegram session: connect, log in when the stored session is not authorized, save on close.

use std::path::PathBuf;

use cloner_core::prompt::ask_required;
use cloner_core::{CloneConfig, CloneError, Prompter, Result};
use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::Session;
use tracing::{info, instrument, warn};

use crate::adapter::TelegramClient;

/// Connected, authorized client plus the file its session is persisted to.
pub struct TelegramSession {
    client: Client,
    session_file: PathBuf,
}

fn session_err(e: impl std::fmt::Display) -> CloneError {
    CloneError::Session(e.to_string())
}

/// Rate-limit waits are never slept through inside the library; they surface as
/// [`cloner_core::ClientError::FloodWait`] and the configured policy handles them.
fn init_params() -> InitParams {
    InitParams {
        flood_sleep_threshold: 0,
        ..InitParams::default()
    }
}

impl TelegramSession {
    /// Connects with the configured credentials; asks for phone, code and 2FA password if needed.
    #[instrument(skip_all, fields(session_file = %config.session_file.display()))]
    pub async fn open(config: &CloneConfig, prompter: &dyn Prompter) -> Result<Self> {
        let session = Session::load_file_or_create(&config.session_file)?;
        let client = Client::connect(Config {
            session,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params: init_params(),
        })
        .await
        .map_err(session_err)?;

        let this = Self {
            client,
            session_file: config.session_file.clone(),
        };
        if !this.client.is_authorized().await.map_err(session_err)? {
            info!("Session not authorized, signing in");
            this.login(prompter).await?;
        }
        prompter.say("Connected to Telegram!");
        info!("Connected");
        Ok(this)
    }

    async fn login(&self, prompter: &dyn Prompter) -> Result<()> {
        let phone = ask_required(prompter, "Phone number (international format)").await?;
        let token = self
            .client
            .request_login_code(&phone)
            .await
            .map_err(session_err)?;
        let code = ask_required(prompter, "Login code").await?;

        match self.client.sign_in(&token, &code).await {
            Ok(_) => {}
            Err(SignInError::PasswordRequired(password_token)) => {
                let hint = password_token.hint().unwrap_or("none").to_string();
                let password = prompter
                    .ask_secret(&format!("Two-step verification password (hint: {})", hint))
                    .await?;
                self.client
                    .check_password(password_token, password.trim())
                    .await
                    .map_err(session_err)?;
            }
            Err(e) => return Err(session_err(e)),
        }
        self.save()?;
        info!("Signed in");
        Ok(())
    }

    /// Core-facing client sharing this connection.
    pub fn client(&self) -> TelegramClient {
        TelegramClient::new(self.client.clone())
    }

    pub fn save(&self) -> Result<()> {
        self.client.session().save_to_file(&self.session_file)?;
        Ok(())
    }

    /// Saves the session and drops the connection.
    pub fn close(self) {
        match self.save() {
            Ok(()) => info!(session_file = %self.session_file.display(), "Session saved"),
            Err(e) => warn!(error = %e, "Failed to save session"),
        }
        drop(self.client);
    }
}
