use clap::{Parser, Subcommand};

use crate::auth::{Claims, JwtKeys};
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "blog")]
#[command(about = "Blog CLI - run the API and mint development tokens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Keep posts in process memory instead of PostgreSQL")]
        memory: bool,
    },

    #[command(about = "Issue a bearer token signed with SECRET_KEY")]
    Token {
        #[arg(long, help = "User id to embed in the token")]
        id: i64,
        #[arg(long, help = "Email to embed in the token")]
        email: String,
        #[arg(long, help = "Token lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Print the resolved configuration with secrets removed")]
    Config,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Serve { memory } => crate::serve(config, memory).await,
        Commands::Token { id, email, hours } => {
            println!("{}", issue_token(&config, id, &email, hours)?);
            Ok(())
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn issue_token(config: &AppConfig, id: i64, email: &str, hours: Option<u64>) -> anyhow::Result<String> {
    let hours = hours.unwrap_or(config.security.jwt_expiry_hours);
    let keys = JwtKeys::new(&config.security.jwt_secret, hours);
    let token = keys.issue_claims(&Claims::new(id, email, hours))?;
    Ok(token)
}
