use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "model-cli")]
#[command(about = "Management CLI for the model microservice", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the service is running
    Ping,
    /// Check whether the model is ready for predictions
    Status,
    /// Request a prediction for an image in the service's images directory
    Predict {
        /// Image file name
        filename: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Ping => client.get(format!("{}/", base)).send().await?,
        Commands::Status => client.get(format!("{}/status", base)).send().await?,
        Commands::Predict { filename } => {
            client
                .post(format!("{}/predict", base))
                .query(&[("filename", filename)])
                .send()
                .await?
        }
    };

    if !print_response(res).await? {
        std::process::exit(1);
    }
    Ok(())
}

/// Print the JSON body; returns whether the status was a success.
async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(false);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(true)
}
