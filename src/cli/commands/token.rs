use anyhow::{anyhow, Context};
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::auth::{Claims, Role, TokenCodec};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a signed session token (valid 24 hours)")]
    Issue {
        #[arg(long, help = "Employee id")]
        id: i64,
        #[arg(long, help = "Email address")]
        email: String,
        #[arg(long, help = "Role: admin, employee or teamLead")]
        role: String,
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, env = "JWT_SECRET", hide_env_values = true, help = "Signing secret")]
        secret: String,
    },

    #[command(about = "Verify a token and show its claims")]
    Inspect {
        #[arg(help = "Token to verify")]
        token: String,
        #[arg(long, env = "JWT_SECRET", hide_env_values = true, help = "Signing secret")]
        secret: String,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue {
            id,
            email,
            role,
            name,
            secret,
        } => {
            let codec = TokenCodec::new(secret.as_bytes()).context("cannot build token codec")?;
            let claims = Claims::new(id, email, Role::parse(&role), name, Utc::now());
            let token = codec.issue(&claims)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({ "token": token, "claims": claims })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
        TokenCommands::Inspect { token, secret } => {
            let codec = TokenCodec::new(secret.as_bytes()).context("cannot build token codec")?;
            let claims = codec
                .verify(token.trim())
                .map_err(|invalid| anyhow!("token rejected ({})", invalid.reason()))?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token valid",
                    Some(json!({ "claims": claims })),
                ),
                OutputFormat::Text => {
                    println!("id:      {}", claims.id);
                    println!("email:   {}", claims.email);
                    println!("role:    {}", claims.role);
                    println!("name:    {}", claims.name);
                    println!("issued:  {}", format_timestamp(claims.iat));
                    println!("expires: {}", format_timestamp(claims.exp));
                    Ok(())
                }
            }
        }
    }
}

fn format_timestamp(secs: i64) -> String {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}
