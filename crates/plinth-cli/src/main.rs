use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use plinth_auth::{AuthService, DefaultAuthService};
use plinth_cli::{DEFAULT_SECRET_BYTES, Subject, generate_secret, inspect_token, issue_token};
use plinth_config::AuthConfig;

#[derive(Parser)]
#[command(name = "plinth-cli")]
#[command(about = "Plinth CLI - Token administration for Plinth", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a token signed with AUTH_SECRET
    IssueToken {
        /// Service id to issue a service token for
        #[arg(short = 's', long, conflicts_with = "user", required_unless_present = "user")]
        service: Option<String>,

        /// User entity ref, e.g. user:default/jane
        #[arg(short = 'u', long)]
        user: Option<String>,

        /// Ownership entity refs for a user token (repeatable)
        #[arg(short = 'o', long, requires = "user")]
        ownership: Vec<String>,
    },
    /// Authenticate a token and print its principal as JSON
    Inspect {
        token: String,
    },
    /// Print a random secret suitable for AUTH_SECRET
    GenerateSecret {
        /// Number of random bytes
        #[arg(short = 'b', long, default_value_t = DEFAULT_SECRET_BYTES)]
        bytes: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::IssueToken {
            service,
            user,
            ownership,
        } => {
            let subject = match (service, user) {
                (Some(id), _) => Subject::Service(id),
                (None, Some(entity_ref)) => Subject::User {
                    entity_ref,
                    ownership,
                },
                (None, None) => anyhow::bail!("either --service or --user is required"),
            };
            let auth = auth_service()?;
            println!("{}", issue_token(auth.as_ref(), subject).await?);
        }
        Commands::Inspect { token } => {
            let auth = auth_service()?;
            let inspected = inspect_token(auth.as_ref(), &token).await?;
            println!("{}", serde_json::to_string_pretty(&inspected)?);
        }
        Commands::GenerateSecret { bytes } => {
            println!("{}", generate_secret(bytes));
        }
    }

    Ok(())
}

fn auth_service() -> anyhow::Result<Arc<dyn AuthService>> {
    let config = AuthConfig::from_env()?;
    Ok(Arc::new(DefaultAuthService::new(&config)))
}
