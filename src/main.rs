//! Operator CLI for the review-monitoring backend.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use review_client::api::{CommentQuery, DetectionRequest, ReviewApi};
use review_client::auth::{CurrentUser, SessionContext};
use review_client::config::{load_config, ClientConfig};
use review_client::endpoints::PathParams;
use review_client::http::{request::unix_millis, ApiError, HttpMethod};
use review_client::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "review-cli")]
#[command(about = "Command-line client for the review-monitoring API", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Serve simulated responses
    #[arg(long, conflicts_with = "live")]
    mock: bool,

    /// Call the real backend
    #[arg(long)]
    live: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend health
    Health,
    /// List configured endpoints
    Endpoints,
    /// Call any endpoint by key
    Call {
        /// Endpoint key, e.g. comments.detail
        endpoint: String,
        #[arg(short, long, default_value = "GET")]
        method: HttpMethod,
        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
        /// Path or query parameter as name=value
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Store a bearer token
    Login {
        username: String,
        #[arg(short, long)]
        token: String,
        /// Keep the token in the credentials file (required: each CLI
        /// invocation is a new process)
        #[arg(short, long)]
        remember: bool,
    },
    /// Forget the stored token and user
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List review comments
    Comments {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Score a text for machine-generated content
    Detect {
        content: String,
        #[arg(long)]
        platform: Option<String>,
    },
    /// Check a group of accounts for coordinated activity
    Cluster {
        #[arg(required = true)]
        user_ids: Vec<String>,
    },
    /// Analyze one account's behavior
    Analyze { user_id: String },
}

const LOGIN_NEEDS_REMEMBER: &str =
    "login without --remember would not outlive this command; saved credentials left unchanged";

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if cli.mock {
        config.mock.enabled = true;
    }
    if cli.live {
        config.mock.enabled = false;
    }

    init_logging(&config.observability);

    let session = SessionContext::with_credentials_file(&config.session.credentials_path)?;
    let api = ReviewApi::from_config(&config, session)?;

    tracing::debug!(
        base_url = %config.api.base_url,
        mock = api.is_mock(),
        "Client ready"
    );

    match cli.command {
        Commands::Health => print_json(&api.check_health().await)?,
        Commands::Endpoints => {
            for key in api.client().endpoints().keys() {
                if let Some(template) = api.client().endpoints().get(key) {
                    println!("{:<20} {}", key, template);
                }
            }
        }
        Commands::Call {
            endpoint,
            method,
            body,
            params,
        } => {
            let body: Option<Value> = body
                .as_deref()
                .map(|raw| serde_json::from_str::<Value>(raw))
                .transpose()?;
            let params: PathParams = params.into_iter().collect();
            report(
                api.client()
                    .request(&endpoint, method, body.as_ref(), &params)
                    .await,
            )?;
        }
        Commands::Login {
            username,
            token,
            remember,
        } => login(api.client().session(), username, &token, remember)?,
        Commands::Logout => api.client().session().logout()?,
        Commands::Whoami => match api.client().session().current_user() {
            Some(user) => print_json(&user)?,
            None => println!("Not signed in"),
        },
        Commands::Comments {
            page,
            page_size,
            keyword,
        } => {
            let query = CommentQuery {
                page,
                page_size,
                keyword,
                platform: None,
            };
            report(api.list_comments(&query).await)?;
        }
        Commands::Detect { content, platform } => {
            report(api.detect_aigc(&DetectionRequest { content, platform }).await)?;
        }
        Commands::Cluster { user_ids } => report(api.detect_cluster(&user_ids).await)?,
        Commands::Analyze { user_id } => report(api.analyze_user_behavior(&user_id).await)?,
    }

    Ok(())
}

fn login(
    session: &SessionContext,
    username: String,
    token: &str,
    remember: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // The session store dies with this process; a login without
    // --remember would only erase the saved credential.
    if !remember {
        return Err(LOGIN_NEEDS_REMEMBER.into());
    }
    let user = CurrentUser {
        id: unix_millis() as u64,
        email: format!("{}@user.com", username),
        role: "visitor".to_string(),
        name: username.clone(),
        username,
        created_at: None,
        status: None,
    };
    session.login(token, &user, true)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report<T: Serialize>(result: Result<T, ApiError>) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(value) => print_json(&value),
        Err(ApiError::AuthenticationFailed) => {
            eprintln!("Error: credential rejected; run `review-cli login` again");
            Err(Box::new(ApiError::AuthenticationFailed))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(Box::new(e))
        }
    }
}
