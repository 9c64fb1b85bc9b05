use clap::{Parser, Subcommand};
use reqwest::{RequestBuilder, Response};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "newsroom-cli")]
#[command(about = "Command-line client for the newsroom services", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Content filter base URL (used by `check`).
    #[arg(long, default_value = "http://localhost:8082")]
    censor_url: String,

    /// Correlation id to send as X-Request-ID.
    #[arg(short, long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List news, optionally searching titles
    News {
        #[arg(short, long)]
        page: Option<u32>,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one news item with its comments
    Detail { id: i64 },
    /// Post a comment through the gateway
    Comment {
        news_id: i64,
        text: String,
        #[arg(short, long)]
        parent_id: Option<i64>,
    },
    /// Ask the content filter directly whether a text passes
    Check { text: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = match &cli.command {
        Commands::News { page, search } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(search) = search {
                query.push(("s", search.clone()));
            }
            client.get(format!("{}/news", cli.url)).query(&query)
        }
        Commands::Detail { id } => client.get(format!("{}/news/{}", cli.url, id)),
        Commands::Comment {
            news_id,
            text,
            parent_id,
        } => client
            .post(format!("{}/comment", cli.url))
            .json(&json!({ "news_id": news_id, "parent_id": parent_id, "text": text })),
        Commands::Check { text } => client
            .post(format!("{}/check", cli.censor_url))
            .json(&json!({ "text": text })),
    };

    let res = with_request_id(request, cli.request_id.as_deref()).send().await?;
    print_response(res).await?;
    Ok(())
}

fn with_request_id(request: RequestBuilder, request_id: Option<&str>) -> RequestBuilder {
    match request_id {
        Some(id) => request.header("X-Request-ID", id),
        None => request,
    }
}

async fn print_response(res: Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: {} (request id {})", status, request_id);
        eprintln!("Response: {}", text.trim());
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
