//! Admin Portal
//!
//! Command line front end for officers: sign in, verify farms and decide
//! flagged claims against the configured backend.

use admin_portal::{
    render, resolve, ClaimsDashboard, Config, DecisionWorkflow, Portal, Route, SessionContext,
    SessionStore, TracingAuditSink,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use krishi_common::{DecisionKind, Error};
use portal_client::HttpPortalClient;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "admin-portal")]
#[command(about = "Krishi Suraksha officer portal")]
struct Cli {
    /// Backend base URL (overrides PORTAL_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with officer credentials
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in officer
    Whoami,

    /// Check that the backend is reachable
    Health,

    /// Open a portal path (e.g. "/", "/claims", "/claim/CLM-201")
    Open { path: String },

    /// Farm verification
    #[command(subcommand)]
    Farms(FarmCommands),

    /// Claims flagged for review
    #[command(subcommand)]
    Claims(ClaimCommands),
}

#[derive(Subcommand)]
enum FarmCommands {
    /// List farms pending verification
    List,

    /// Verify a pending farm
    Verify { farm_id: String },
}

#[derive(Subcommand)]
enum ClaimCommands {
    /// List claims flagged for review
    List,

    /// Show one flagged claim
    Show { claim_id: String },

    /// Approve a flagged claim with a payout amount
    Approve {
        claim_id: String,

        #[arg(short, long)]
        amount: String,
    },

    /// Reject a flagged claim with a reason
    Reject {
        claim_id: String,

        #[arg(short, long)]
        reason: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered views stay clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_portal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url)?;
    }
    config.ensure_directories()?;

    let session = SessionContext::hydrate(SessionStore::new(&config.session_dir))
        .context("Failed to restore session")?;

    let client = Arc::new(HttpPortalClient::new(config.api_url.clone()));
    info!("Backend: {}", client.base_url());

    // the portal keeps the client's bearer token in step with the session
    let mut portal = Portal::new(client.clone(), session, Arc::new(TracingAuditSink));

    match cli.command {
        Commands::Login { email, password } => {
            let landing = portal.login(&email, &password).await.map_err(fail)?;
            println!("{}", render::header(portal.session().officer()));
            println!("Signed in. Opening {}", landing);
        }
        Commands::Logout => {
            let next = portal.logout().map_err(fail)?;
            println!("Signed out. Opening {}", next);
        }
        Commands::Whoami => {
            println!("{}", render::header(portal.session().officer()));
        }
        Commands::Health => health(&client).await?,
        Commands::Open { path } => {
            let route = resolve(portal.session().officer(), &path);
            open(&portal, route).await?;
        }
        Commands::Farms(FarmCommands::List) => open(&portal, Route::FarmVerification).await?,
        Commands::Farms(FarmCommands::Verify { farm_id }) => {
            let mut view = portal.farm_verification().await.map_err(fail)?;
            let result = portal.verify_farm(&mut view, &farm_id).await;
            println!("{}", render::farm_verification(&view));
            result.map_err(fail)?;
            println!("Farm {} verified", farm_id);
        }
        Commands::Claims(ClaimCommands::List) => open(&portal, Route::ClaimsDashboard).await?,
        Commands::Claims(ClaimCommands::Show { claim_id }) => {
            open(&portal, Route::ClaimDetail(claim_id)).await?
        }
        Commands::Claims(ClaimCommands::Approve { claim_id, amount }) => {
            decide(&portal, &claim_id, DecisionKind::Approve, &amount).await?
        }
        Commands::Claims(ClaimCommands::Reject { claim_id, reason }) => {
            decide(&portal, &claim_id, DecisionKind::Reject, &reason).await?
        }
    }

    Ok(())
}

/// Turn a portal error into the message the officer should see
fn fail(e: Error) -> anyhow::Error {
    match e {
        Error::Unauthenticated => anyhow::anyhow!(
            "Not signed in. Run `admin-portal login --email <email> --password <password>` first."
        ),
        other => anyhow::anyhow!(other.user_message()),
    }
}

async fn health(client: &HttpPortalClient) -> Result<()> {
    match client.health_check().await {
        Ok(true) => println!("Backend at {} is healthy", client.base_url()),
        Ok(false) => anyhow::bail!("Backend at {} reported unhealthy", client.base_url()),
        Err(e) => return Err(fail(e)),
    }
    Ok(())
}

async fn open(portal: &Portal, route: Route) -> Result<()> {
    println!("{}\n", render::header(portal.session().officer()));

    match route {
        Route::Login => {
            println!("Sign in with `admin-portal login --email <email> --password <password>`.")
        }
        Route::FarmVerification => {
            let view = portal.farm_verification().await.map_err(fail)?;
            print!("{}", render::farm_verification(&view));
        }
        Route::ClaimsDashboard => {
            let dashboard = portal.claims_dashboard().await.map_err(fail)?;
            print!("{}", render::claims_dashboard(&dashboard));
        }
        Route::ClaimDetail(claim_id) => {
            let (_, workflow) = claim_detail(portal, &claim_id).await?;
            print!("{}", render::claim_detail(&workflow));
        }
    }
    Ok(())
}

/// Claim detail is only reachable through a dashboard row
async fn claim_detail(portal: &Portal, claim_id: &str) -> Result<(ClaimsDashboard, DecisionWorkflow)> {
    let dashboard = portal.claims_dashboard().await.map_err(fail)?;
    let workflow = portal
        .claim_detail(dashboard.open_claim(claim_id))
        .map_err(fail)?;
    Ok((dashboard, workflow))
}

async fn decide(portal: &Portal, claim_id: &str, kind: DecisionKind, input: &str) -> Result<()> {
    let (mut dashboard, mut workflow) = claim_detail(portal, claim_id).await?;
    workflow.open(kind).map_err(fail)?;

    match portal
        .submit_decision(&mut workflow, &mut dashboard, input)
        .await
    {
        Ok(submitted) => {
            println!(
                "Claim {}: {} submitted. Opening {}\n",
                claim_id,
                submitted.decision.kind(),
                submitted.next
            );
            print!("{}", render::claims_dashboard(&dashboard));
            Ok(())
        }
        Err(e) => {
            print!("{}", render::claim_detail(&workflow));
            Err(fail(e))
        }
    }
}
