use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "tasting-cli")]
#[command(about = "Smoke-test CLI for the tasting-notes proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Origin header to present (must be on the proxy's allow-list).
    #[arg(short, long, default_value = "https://famelia-wine.myshopify.com")]
    origin: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hit the liveness probe
    Probe,
    /// Save a tasting note
    Save {
        #[arg(long)]
        customer_id: String,
        #[arg(long)]
        customer_email: String,
        #[arg(long)]
        event_handle: String,
        #[arg(long)]
        product_id: u64,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a tasting note
    Delete {
        #[arg(long)]
        customer_id: String,
        #[arg(long)]
        event_handle: String,
        #[arg(long)]
        product_id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Probe => {
            let res = client
                .get(format!("{}/proxy/test", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Save {
            customer_id,
            customer_email,
            event_handle,
            product_id,
            rating,
            note,
        } => {
            let body = json!({
                "shop": "cli",
                "customer_id": customer_id,
                "customer_email": customer_email,
                "event_handle": event_handle,
                "product": {
                    "product_id": product_id,
                    "rating": rating,
                    "note": note,
                },
            });
            let res = client
                .post(format!("{}/proxy/save", cli.url))
                .header("Origin", &cli.origin)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Delete {
            customer_id,
            event_handle,
            product_id,
        } => {
            let body = json!({
                "shop": "cli",
                "customer_id": customer_id,
                "event_handle": event_handle,
                "product": { "product_id": product_id },
            });
            let res = client
                .post(format!("{}/proxy/delete", cli.url))
                .header("Origin", &cli.origin)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
