use clap::{Parser, Subcommand};
use hello_cluster::Greeting;

#[derive(Parser)]
#[command(name = "greeting-cli")]
#[command(about = "Query a running hello-cluster service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the JSON greeting from a backend
    Greeting,
    /// Fetch the rendered page from a frontend
    Page,
    /// Check liveness and readiness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Greeting => {
            let res = client.get(format!("{}/", base)).send().await?;
            if let Some(res) = check_status(res).await {
                let greeting: Greeting = res.json().await?;
                println!("{}", serde_json::to_string_pretty(&greeting)?);
            }
        }
        Commands::Page => {
            let res = client.get(format!("{}/", base)).send().await?;
            if let Some(res) = check_status(res).await {
                println!("{}", res.text().await?);
            }
        }
        Commands::Health => {
            for probe in ["healthz", "readyz"] {
                let res = client.get(format!("{}/{}", base, probe)).send().await?;
                println!("{}: {}", probe, res.status());
            }
        }
    }

    Ok(())
}

async fn check_status(res: reqwest::Response) -> Option<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Some(res);
    }

    eprintln!("Error: service returned status {}", status);
    if let Ok(text) = res.text().await {
        eprintln!("Response: {}", text);
    }
    None
}
