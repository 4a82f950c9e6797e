//! Execution of parsed CLI commands against the Linda service.

use std::sync::Arc;

use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::args::CliCommand;
use super::version::version_line;
use crate::adapters::{FileCredentialsProvider, ReqwestHttpClient, TungsteniteConnector};
use crate::api::{self, LoginParams, RegisterParams, SendMessageParams};
use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorCategory};
use crate::http::{ApiClient, ApiResponse};
use crate::navigation::{Navigator, ENTRY_ROUTE};
use crate::notifications::{DesktopNotifier, Notifier};
use crate::traits::CredentialsProvider;
use crate::websocket::{ConnectionManager, InboundMessage, MessageHandler};

/// Everything a command needs, wired to the real adapters.
pub struct CliContext {
    config: ClientConfig,
    credentials: Arc<FileCredentialsProvider>,
    notifier: Arc<dyn Notifier>,
    api: ApiClient,
}

impl CliContext {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let credentials = Arc::new(FileCredentialsProvider::new()?);
        let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier);
        let navigator: Arc<dyn Navigator> = Arc::new(|route: &str| {
            if route == ENTRY_ROUTE {
                eprintln!("Your session has ended. Run `linda login <username>` to sign in again.");
            }
        });

        let http = reqwest::Client::builder()
            .user_agent(version_line().replace(' ', "/"))
            .build()
            .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

        let api = ApiClient::new(
            &config,
            Arc::new(ReqwestHttpClient::with_client(http)),
            credentials.clone(),
            notifier.clone(),
            navigator,
        );

        Ok(Self {
            config,
            credentials,
            notifier,
            api,
        })
    }
}

/// Run one command to completion.
pub async fn execute(command: CliCommand, ctx: &CliContext) -> Result<()> {
    match command {
        CliCommand::Login { username } => {
            let password = prompt_password()?;
            let params = LoginParams::new(&username, password);
            let response = api::login(&ctx.api, &params).await.map_err(with_hint)?;
            store_token(ctx, response, username).await
        }
        CliCommand::Register { username } => {
            let password = prompt_password()?;
            let params = RegisterParams::new(&username, password);
            let response = api::register(&ctx.api, &params).await.map_err(with_hint)?;
            store_token(ctx, response, username).await
        }
        CliCommand::Logout => {
            ctx.credentials.clear().await?;
            println!("Signed out.");
            Ok(())
        }
        CliCommand::Send {
            session_id,
            content,
        } => {
            let params = SendMessageParams::new(session_id, content);
            let response = api::send_message(&ctx.api, &params).await;
            print_response(response.map_err(with_hint)?)
        }
        CliCommand::History { session_id } => {
            let response = api::get_history(&ctx.api, &session_id).await;
            print_response(response.map_err(with_hint)?)
        }
        CliCommand::Sessions { page, size } => {
            let response = api::get_session_list(&ctx.api, page, size).await;
            print_response(response.map_err(with_hint)?)
        }
        CliCommand::Delete { session_id } => {
            let response = api::delete_session(&ctx.api, &session_id).await;
            print_response(response.map_err(with_hint)?)
        }
        CliCommand::Listen => listen(ctx).await,
        CliCommand::Version | CliCommand::Help => Ok(()),
        CliCommand::Invalid(reason) => bail!(reason),
    }
}

fn with_hint(err: ApiError) -> color_eyre::Report {
    hinted(err.to_string(), err.category())
}

fn hinted(message: String, category: ErrorCategory) -> color_eyre::Report {
    match category {
        // business messages come from the server and speak for themselves
        ErrorCategory::Business => eyre!(message),
        _ => eyre!("{}. {}", message, category.recovery_hint()),
    }
}

fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

async fn store_token(
    ctx: &CliContext,
    response: ApiResponse<String>,
    username: String,
) -> Result<()> {
    if response.is_session_expired() {
        return Ok(());
    }
    let reason = response.message_or_default().to_string();
    match response.data.filter(|token| !token.is_empty()) {
        Some(token) => {
            ctx.credentials
                .save(&Credentials::with_token(token, Some(username.clone())))
                .await?;
            println!("Signed in as {}.", username);
            Ok(())
        }
        None => Err(eyre!("sign-in failed: {}", reason)),
    }
}

fn print_response(response: ApiResponse<Value>) -> Result<()> {
    if response.is_session_expired() {
        return Ok(());
    }
    match response.data {
        Some(data) => println!("{}", serde_json::to_string_pretty(&data)?),
        None if !response.msg.is_empty() => println!("{}", response.msg),
        None => println!("OK"),
    }
    Ok(())
}

async fn listen(ctx: &CliContext) -> Result<()> {
    let manager = ConnectionManager::new(
        ctx.config.clone(),
        ctx.credentials.clone(),
        Arc::new(TungsteniteConnector::new()),
        ctx.notifier.clone(),
    );

    let printer: MessageHandler = Arc::new(|message: &InboundMessage| match message.event() {
        Ok(event) => println!("[{:?}] {}", event.kind, event.data),
        Err(_) => println!("{}", message.text()),
    });
    manager.add_message_handler(printer);
    manager
        .connect()
        .await
        .map_err(|e| hinted(e.to_string(), e.category()))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted, closing connection");
                break;
            }
            line = lines.next_line() => match line? {
                Some(line) if !line.trim().is_empty() => manager.send(line),
                Some(_) => {}
                None => {
                    // stdin closed; keep streaming until interrupted
                    tokio::signal::ctrl_c().await?;
                    break;
                }
            },
        }
    }

    manager.disconnect();
    Ok(())
}
