//! Groupscope - Entry point
//!
//! Runs one directory query against the Airfocus API and prints the result
//! envelope as JSON.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use groupscope::config::GroupscopeConfig;
use groupscope::core::{ApiToken, GroupscopeResult, RequestContext};
use groupscope::telemetry::{init_logging, metrics};
use groupscope::upstream::UpstreamClient;
use groupscope::{Directory, FieldFilter, Outcome};

#[derive(Debug, Parser)]
#[command(name = "groupscope")]
#[command(about = "Airfocus workspace and permission directory")]
#[command(version)]
#[command(after_help = "Upstream and cache settings are read from the config file and from \
GROUPSCOPE_BASE_URL, GROUPSCOPE_TIMEOUT, GROUPSCOPE_CACHE_TTL, GROUPSCOPE_LOG_LEVEL and \
GROUPSCOPE_LOG_JSON.")]
struct Cli {
    /// Path to configuration file (TOML or JSON)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Airfocus API token
    #[arg(long, short = 't', env = "GROUPSCOPE_API_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Team members sorted by name
    Users,
    /// One team member
    User { user_id: String },
    /// Workspaces with their groups
    Workspaces,
    /// Fields with workspace names
    Fields {
        /// Leave out the UI's placeholder fields
        #[arg(long)]
        hide_placeholders: bool,
    },
    /// Workspace groups by parent
    Hierarchy,
    /// Workspaces with an explicit grant for the user
    UserWorkspaces { user_id: String },
    /// Effective permission on every group
    UserAccess { user_id: String },
    /// Effective permissions as a group tree
    UserTree { user_id: String },
    /// Users with a grant on the workspace
    WorkspaceUsers { workspace_id: String },
    /// Grant counts on the workspace
    WorkspaceStats { workspace_id: String },
    /// Id and alias of a workspace by name
    FindWorkspace {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// A field by name
    FindField {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Team members by role
    RoleStats,
    /// License state and seat usage
    License,
}

/// Prints the outcome envelope and returns whether the query succeeded.
fn render<T: Serialize>(result: GroupscopeResult<T>) -> anyhow::Result<bool> {
    let outcome = Outcome::from(result);
    let success = outcome.is_success();
    let json = serde_json::to_string_pretty(&outcome).context("failed to encode result")?;
    println!("{json}");
    Ok(success)
}

async fn run(
    directory: &Directory<UpstreamClient>,
    command: Command,
    ctx: &RequestContext,
) -> anyhow::Result<bool> {
    match command {
        Command::Users => render(directory.list_users(ctx).await),
        Command::User { user_id } => render(directory.get_user(ctx, &user_id).await),
        Command::Workspaces => render(directory.list_workspaces(ctx).await),
        Command::Fields { hide_placeholders } => {
            let filter = if hide_placeholders {
                FieldFilter::without_placeholders()
            } else {
                FieldFilter::default()
            };
            render(directory.list_fields(ctx, &filter).await)
        }
        Command::Hierarchy => render(directory.workspace_hierarchy(ctx).await),
        Command::UserWorkspaces { user_id } => {
            render(directory.get_user_workspaces(ctx, &user_id).await)
        }
        Command::UserAccess { user_id } => {
            render(directory.get_user_group_access(ctx, &user_id).await)
        }
        Command::UserTree { user_id } => render(directory.get_user_group_tree(ctx, &user_id).await),
        Command::WorkspaceUsers { workspace_id } => {
            render(directory.get_workspace_users(ctx, &workspace_id).await)
        }
        Command::WorkspaceStats { workspace_id } => {
            render(directory.get_workspace_user_stats(ctx, &workspace_id).await)
        }
        Command::FindWorkspace { name } => {
            render(directory.find_workspace_by_name(ctx, &name.join(" ")).await)
        }
        Command::FindField { name } => {
            render(directory.find_field_by_name(ctx, &name.join(" ")).await)
        }
        Command::RoleStats => render(directory.team_role_stats(ctx).await),
        Command::License => render(directory.team_license(ctx).await),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = GroupscopeConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    init_logging(&config.logging).context("failed to initialise logging")?;
    metrics::describe_metrics();

    let token = ApiToken::new(cli.token).context("the API token must not be blank")?;

    let directory = Directory::connect(&config, token).context("failed to create client")?;
    info!(base_url = %config.upstream.base_url, "querying upstream");

    let ctx = RequestContext::new();
    let cancel = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    if !run(&directory, cli.command, &ctx).await? {
        error!(request_id = %ctx.request_id(), "query failed");
        std::process::exit(1);
    }
    Ok(())
}
