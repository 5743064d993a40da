//! Connection and interactive sign-in.

use std::io::{self, BufRead, Write};
use std::path::Path;

use grammers_client::{Client, Config as ClientConfig, InitParams, SignInError};
use grammers_session::Session;
use tracing::info;

use tsw_core::{config::Config, errors::Error, Result};

use crate::transport_err;

/// Connect to Telegram with the configured session file, signing the
/// account in interactively when the file holds no authorization yet.
pub async fn connect(cfg: &Config) -> Result<Client> {
    let session = Session::load_file_or_create(&cfg.session_file)?;

    let client = Client::connect(ClientConfig {
        session,
        api_id: cfg.api_id,
        api_hash: cfg.api_hash.clone(),
        params: InitParams::default(),
    })
    .await
    .map_err(transport_err)?;

    if !client.is_authorized().await.map_err(transport_err)? {
        sign_in(&client, &cfg.session_file).await?;
    }

    info!("connected (session={})", cfg.session_file.display());
    Ok(client)
}

/// Phone → login code → optional 2FA password, prompted on stdin.
async fn sign_in(client: &Client, session_file: &Path) -> Result<()> {
    let phone = prompt("Phone number (international format): ")?;
    let token = client
        .request_login_code(phone.trim())
        .await
        .map_err(transport_err)?;

    let code = prompt("Login code: ")?;
    match client.sign_in(&token, code.trim()).await {
        Ok(_) => {}
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token
                .hint()
                .map(|h| h.to_string())
                .unwrap_or_else(|| "none".to_string());
            let password = prompt(&format!("2FA password (hint: {hint}): "))?;
            client
                .check_password(password_token, password.trim())
                .await
                .map_err(transport_err)?;
        }
        Err(e) => return Err(Error::Transport(format!("sign in failed: {e}"))),
    }

    client.session().save_to_file(session_file)?;
    info!("signed in; session saved to {}", session_file.display());
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(message.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
