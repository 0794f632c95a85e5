use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "Command-line client for the Solana wallet dashboard", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show wallet, balance and recent signatures
    Status,
    /// List wallet adapters
    Wallets,
    /// Connect a wallet (the selected adapter unless --adapter is given)
    Connect {
        #[arg(short, long)]
        adapter: Option<String>,
    },
    /// Disconnect the wallet
    Disconnect,
    /// Select the adapter used by `connect`
    Select { adapter: String },
    /// Request an airdrop and wait for confirmation
    Airdrop,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/api/state", base)).send().await?,
        Commands::Wallets => client.get(format!("{}/api/wallets", base)).send().await?,
        Commands::Connect { adapter } => {
            let body = match adapter {
                Some(a) => json!({ "adapter": a }),
                None => json!({}),
            };
            client
                .post(format!("{}/api/wallet/connect", base))
                .json(&body)
                .send()
                .await?
        }
        Commands::Disconnect => {
            client
                .post(format!("{}/api/wallet/disconnect", base))
                .send()
                .await?
        }
        Commands::Select { adapter } => {
            client
                .post(format!("{}/api/wallet/select", base))
                .json(&json!({ "adapter": adapter }))
                .send()
                .await?
        }
        Commands::Airdrop => client.post(format!("{}/api/airdrop", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: dashboard returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
