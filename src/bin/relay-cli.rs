use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Send prompts to a running MCP relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[arg(short, long, default_value = "YOUR_SECRET_API_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt, optionally attaching files
    Prompt {
        text: String,

        /// File to attach; sent under its file name
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
    },
    /// Check relay status
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Prompt { text, files } => {
            let mut attached = BTreeMap::new();
            for path in files {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| format!("not a file path: {}", path.display()))?;
                attached.insert(name, std::fs::read_to_string(&path)?);
            }

            let mut headers = HeaderMap::new();
            headers.insert("X-Api-Key", HeaderValue::from_str(&cli.key)?);

            let res = client
                .post(format!("{}/mcp", cli.url))
                .headers(headers)
                .json(&json!({ "prompt": text, "context": {}, "files": attached }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
