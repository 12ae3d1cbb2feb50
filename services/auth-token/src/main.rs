use anyhow::{bail, Context};
use auth_token::observability::init_tracing;
use auth_token::subject::{subject_id_from_provider, Provider};
use auth_token::{Config, TokenService};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;

/// Issue and inspect auth service tokens.
///
/// Reads JWT_SECRET, JWT_ACCESS_TOKEN_EXPIRATION and
/// JWT_REFRESH_TOKEN_EXPIRATION from the environment or a `.env` file.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Issue an access token
    Issue {
        #[clap(flatten)]
        subject: SubjectArgs,
        #[clap(flatten)]
        profile: ProfileArgs,
    },
    /// Issue a refresh token
    Refresh {
        #[clap(flatten)]
        subject: SubjectArgs,
    },
    /// Issue an access/refresh token pair as returned at login
    Pair {
        #[clap(flatten)]
        subject: SubjectArgs,
        #[clap(flatten)]
        profile: ProfileArgs,
    },
    /// Check a token's signature and expiry
    Validate {
        /// Token to check
        token: String,
    },
    /// Print the subject id of a valid token
    Subject {
        /// Token to read
        token: String,
    },
    /// Print a token's claims without verifying it
    Inspect {
        /// Token to decode
        token: String,
    },
    /// Map a provider account id to a numeric subject id
    DeriveId {
        /// Login provider (kakao, google, naver)
        #[clap(long)]
        provider: Provider,
        /// Provider account id
        provider_id: String,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct SubjectArgs {
    /// Numeric subject id
    #[clap(long)]
    user_id: Option<i64>,
    /// Provider account id, mapped to a numeric subject id
    #[clap(long)]
    provider_id: Option<String>,
}

impl SubjectArgs {
    fn resolve(&self) -> anyhow::Result<i64> {
        match (self.user_id, self.provider_id.as_deref()) {
            (Some(id), _) => Ok(id),
            (None, Some(provider_id)) => Ok(subject_id_from_provider(provider_id)),
            (None, None) => bail!("either --user-id or --provider-id is required"),
        }
    }
}

#[derive(Debug, Args)]
struct ProfileArgs {
    /// Email claim
    #[clap(long)]
    email: Option<String>,
    /// Nickname claim
    #[clap(long)]
    nickname: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("failed to load configuration")?;
    init_tracing(&config.tracing);
    info!(service = %config.service_name, "Starting auth token CLI");

    let service = TokenService::new(&config.jwt);

    let output = match cli.command {
        Command::Issue { subject, profile } => {
            let user_id = subject.resolve()?;
            let token = service.issue_access_token(
                user_id,
                profile.email.as_deref(),
                profile.nickname.as_deref(),
            )?;
            json!({ "userId": user_id, "accessToken": token })
        }
        Command::Refresh { subject } => {
            let user_id = subject.resolve()?;
            let token = service.issue_refresh_token(user_id)?;
            json!({ "userId": user_id, "refreshToken": token })
        }
        Command::Pair { subject, profile } => {
            let user_id = subject.resolve()?;
            let pair = service.issue_token_pair(
                user_id,
                profile.email.as_deref(),
                profile.nickname.as_deref(),
            )?;
            serde_json::to_value(pair)?
        }
        Command::Validate { token } => json!({ "valid": service.validate(&token) }),
        Command::Subject { token } => json!({ "userId": service.extract_subject(&token) }),
        Command::Inspect { token } => serde_json::to_value(service.peek_claims(&token)?)?,
        Command::DeriveId {
            provider,
            provider_id,
        } => json!({
            "provider": provider.as_str(),
            "providerId": provider_id,
            "userId": subject_id_from_provider(&provider_id),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
