//! Command handlers for the sonic CLI
//!
//! One handler per command. Each handler runs its prompt flow (fetching
//! between cascade stages where a picker depends on server data), then
//! issues at most one resource-client call and funnels the outcome through
//! the renderer.

use crate::flow::{run_steps, Prompter, Step};
use crate::output::{render, status};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use sonic_core::{
    select_items, AssetDeleteOption, CdnClient, LoginCredentials, Outcome, SelectItem, Session,
    SessionStore, Severity,
};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Per-invocation state threaded into every handler
pub struct RunContext {
    /// Raw JSON output for list commands
    pub json: bool,
    pub session: Session,
    pub store: SessionStore,
}

impl RunContext {
    fn client(&self) -> Result<CdnClient> {
        let url = self
            .session
            .url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not connected to a CDN"))?;
        Ok(CdnClient::new(url, self.session.access_token.clone())?)
    }
}

/// Guidance shown when a picker would have no choices; the flow stops here,
/// before any prompt.
fn abort_for_empty(missing: &str, hint: &str) {
    status(&format!("You don't have {}.", missing), Severity::Error);
    status(hint, Severity::Plain);
}

const BUCKETS_HINT: &str = "Create a new bucket:\n\n  $ sonic buckets:create";
const USERS_HINT: &str = "Create a new user:\n\n  $ sonic users:create";
const ASSETS_HINT: &str = "Upload a new asset:\n\n  $ sonic assets:upload <file>";

// === Session ===

pub async fn handle_connect(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let answers = run_steps(
        prompter,
        &[Step::input("url", "Enter a url of your Sonic CDN")],
    )?;
    let url = answers.text("url").unwrap_or_default();

    let outcome = sonic_core::connect(&ctx.store, url)?;
    render(&outcome, false);
    Ok(())
}

pub async fn handle_login(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let methods = vec![
        SelectItem {
            name: "Username and Password".to_string(),
            value: "basic".to_string(),
        },
        SelectItem {
            name: "Access Token".to_string(),
            value: "auth".to_string(),
        },
    ];
    let answers = run_steps(
        prompter,
        &[Step::select(
            "method",
            "Which method do you want to use to log into your Sonic CDN?",
            methods,
        )],
    )?;

    let credentials = if answers.text("method") == Some("basic") {
        let answers = run_steps(
            prompter,
            &[
                Step::input("username", "Enter your username"),
                Step::password("password", "Enter your password"),
            ],
        )?;
        LoginCredentials::Basic {
            username: answers.text("username").unwrap_or_default().to_string(),
            password: answers.text("password").unwrap_or_default().to_string(),
        }
    } else {
        let answers = run_steps(
            prompter,
            &[Step::input("accessToken", "Enter your access token")],
        )?;
        LoginCredentials::Token(answers.text("accessToken").unwrap_or_default().to_string())
    };

    let outcome = ctx.client()?.login(&credentials, &ctx.store).await?;
    render(&outcome, false);
    Ok(())
}

pub async fn handle_logout(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let answers = run_steps(
        prompter,
        &[Step::confirm(
            "logout",
            "Are you sure you want to logout from your account?",
        )],
    )?;

    if answers.flag("logout") {
        ctx.store.clear_credentials()?;
        render(
            &Outcome::success("You went out of your account successfully!"),
            false,
        );
    }
    Ok(())
}

// === Users ===

pub async fn handle_users(ctx: &RunContext) -> Result<()> {
    let payload = ctx.client()?.users().await?;
    render(&Outcome::Payload(payload), ctx.json);
    Ok(())
}

pub async fn handle_users_create(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let answers = run_steps(
        prompter,
        &[
            Step::input("username", "Enter your username"),
            Step::password("password", "Enter your password"),
        ],
    )?;

    let payload = ctx
        .client()?
        .create_user(
            answers.text("username").unwrap_or_default(),
            answers.text("password").unwrap_or_default(),
        )
        .await?;
    render(&Outcome::Payload(payload), false);
    Ok(())
}

pub async fn handle_users_update(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    // Blank answers pass through as-is; the server treats blank as no change
    let answers = run_steps(
        prompter,
        &[
            Step::optional_input("username", "Enter a new username, leave blank for no change"),
            Step::optional_password("password", "Enter a new password, leave blank for no change"),
        ],
    )?;

    let payload = ctx
        .client()?
        .update_user(
            answers.text("username").unwrap_or_default(),
            answers.text("password").unwrap_or_default(),
        )
        .await?;
    render(&Outcome::Payload(payload), false);
    Ok(())
}

pub async fn handle_users_delete(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let client = ctx.client()?;
    let list = client.list_users().await?;
    if list.is_empty() {
        abort_for_empty("users", USERS_HINT);
        return Ok(());
    }

    let answers = run_steps(
        prompter,
        &[
            Step::select("user", "Choose a user", list),
            Step::confirm("confirm", "Are you sure you want to delete this user?"),
        ],
    )?;

    if answers.flag("confirm") {
        let payload = client
            .delete_user(answers.text("user").unwrap_or_default())
            .await?;
        render(&Outcome::Payload(payload), false);
    }
    Ok(())
}

// === Buckets ===

pub async fn handle_buckets(ctx: &RunContext) -> Result<()> {
    let payload = ctx.client()?.buckets().await?;
    render(&Outcome::Payload(payload), ctx.json);
    Ok(())
}

pub async fn handle_buckets_create(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let answers = run_steps(prompter, &[Step::input("name", "Enter a name of bucket")])?;

    let payload = ctx
        .client()?
        .create_bucket(answers.text("name").unwrap_or_default())
        .await?;
    render(&Outcome::Payload(payload), false);
    Ok(())
}

pub async fn handle_buckets_delete(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let client = ctx.client()?;
    let list = client.list_buckets().await?;
    if list.is_empty() {
        abort_for_empty("buckets", BUCKETS_HINT);
        return Ok(());
    }

    let answers = run_steps(
        prompter,
        &[
            Step::select("bucket", "Choose a bucket", list),
            Step::confirm("confirm", "Are you sure you want to delete this bucket?"),
        ],
    )?;

    if answers.flag("confirm") {
        let payload = client
            .delete_bucket(answers.text("bucket").unwrap_or_default())
            .await?;
        render(&Outcome::Payload(payload), false);
    }
    Ok(())
}

// === Assets ===

pub async fn handle_assets(ctx: &RunContext) -> Result<()> {
    let payload = ctx.client()?.assets().await?;
    render(&Outcome::Payload(payload), ctx.json);
    Ok(())
}

pub async fn handle_assets_upload(
    ctx: &RunContext,
    prompter: &mut impl Prompter,
    file: &str,
) -> Result<()> {
    let client = ctx.client()?;
    let list = client.list_buckets().await?;
    if list.is_empty() {
        abort_for_empty("buckets", BUCKETS_HINT);
        return Ok(());
    }

    let answers = run_steps(
        prompter,
        &[
            Step::select("bucket", "Choose a bucket", list),
            Step::input("name", "Enter a name of this asset"),
            Step::input_with_default("version", "Enter a version of this asset", "0.1.0"),
            Step::confirm("confirm", "Are you sure you want to upload this asset?"),
        ],
    )?;

    if !answers.flag("confirm") {
        return Ok(());
    }

    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("File not found: {}", file);
    }
    debug!(file, "uploading asset");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Uploading {}...", file));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = client
        .upload_asset(
            answers.text("name").unwrap_or_default(),
            answers.text("version").unwrap_or_default(),
            answers.text("bucket").unwrap_or_default(),
            path,
        )
        .await;
    spinner.finish_and_clear();

    render(&Outcome::Payload(result?), false);
    Ok(())
}

pub async fn handle_assets_delete(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let actions = vec![
        SelectItem {
            name: "Delete asset".to_string(),
            value: "asset".to_string(),
        },
        SelectItem {
            name: "Delete version".to_string(),
            value: "version".to_string(),
        },
        SelectItem {
            name: "Delete file".to_string(),
            value: "file".to_string(),
        },
    ];
    let answers = run_steps(prompter, &[Step::select("action", "Choose an action", actions)])?;

    match answers.text("action") {
        Some("asset") => delete_whole_asset(ctx, prompter).await,
        // "version" and "file" are recognized but have no behavior yet
        _ => Ok(()),
    }
}

/// The `asset` sub-action: bucket picker, then that bucket's asset picker,
/// then a confirmation. Each fetch blocks on the previous answer.
async fn delete_whole_asset(ctx: &RunContext, prompter: &mut impl Prompter) -> Result<()> {
    let client = ctx.client()?;
    let buckets = client.list_buckets().await?;
    if buckets.is_empty() {
        abort_for_empty("buckets", BUCKETS_HINT);
        return Ok(());
    }

    let picked = run_steps(prompter, &[Step::select("bucket", "Choose a bucket", buckets)])?;
    let bucket_id = picked.text("bucket").unwrap_or_default().to_string();

    let payload = client.assets_in_bucket(&bucket_id).await?;
    let assets = select_items(&payload, "name");
    if assets.is_empty() {
        abort_for_empty("assets", ASSETS_HINT);
        return Ok(());
    }

    let answers = run_steps(
        prompter,
        &[
            Step::select("asset", "Choose an asset", assets.clone()),
            Step::confirm("confirm", "Are you sure you want to delete this asset?"),
        ],
    )?;

    if answers.flag("confirm") {
        let asset_id = answers.text("asset").unwrap_or_default();
        let name = assets
            .iter()
            .find(|item| item.value == asset_id)
            .map(|item| item.name.clone())
            .unwrap_or_default();

        let payload = client
            .delete_asset(&bucket_id, asset_id, AssetDeleteOption::Asset, &name)
            .await?;
        render(&Outcome::Payload(payload), false);
    }
    Ok(())
}
