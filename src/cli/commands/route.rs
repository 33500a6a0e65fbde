use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::middleware::{normalize_path, RouteTable};

#[derive(Subcommand)]
pub enum RouteCommands {
    #[command(about = "Show which gatekeeper scope a path falls into")]
    Classify {
        #[arg(help = "Request path, e.g. /admin/employees")]
        path: String,
    },
}

pub fn handle(cmd: RouteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RouteCommands::Classify { path } => {
            let table = RouteTable::standard()?;
            let normalized = normalize_path(&path);
            let scope = table.classify(&path);

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Path classified",
                    Some(json!({
                        "path": path,
                        "normalized": normalized,
                        "scope": scope.as_str(),
                    })),
                ),
                OutputFormat::Text => {
                    println!("{} -> {} ({})", path, scope.as_str(), normalized);
                    Ok(())
                }
            }
        }
    }
}
