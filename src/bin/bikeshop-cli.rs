use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "bikeshop-cli")]
#[command(about = "Command-line client for the bikeshop API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Manage bikes
    #[command(subcommand)]
    Bikes(BikeCommand),
    /// Print the Prometheus metrics page
    Metrics,
}

#[derive(Subcommand)]
enum CategoryCommand {
    List,
    Get { id: i64 },
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum BikeCommand {
    List,
    Get { id: i64 },
    Create {
        #[command(flatten)]
        fields: BikeFields,
    },
    Update {
        id: i64,
        #[command(flatten)]
        fields: BikeFields,
    },
    Delete { id: i64 },
}

/// Bike fields; on update only the ones given are sent.
#[derive(Args, Serialize)]
struct BikeFields {
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    stock: Option<i64>,
    /// Category id
    #[arg(long)]
    #[serde(rename = "category_id", skip_serializing_if = "Option::is_none")]
    category: Option<i64>,
}

#[derive(Serialize)]
struct CategoryFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let api = Api {
        client: Client::new(),
        base: cli.url.trim_end_matches('/').to_string(),
    };

    let res = match cli.command {
        Commands::Categories(cmd) => match cmd {
            CategoryCommand::List => api.send(Method::GET, "/categories", None).await?,
            CategoryCommand::Get { id } => {
                api.send(Method::GET, &format!("/categories/{id}"), None).await?
            }
            CategoryCommand::Create { name } => {
                let body = serde_json::to_value(CategoryFields { name: Some(name) })?;
                api.send(Method::POST, "/categories", Some(body)).await?
            }
            CategoryCommand::Update { id, name } => {
                let body = serde_json::to_value(CategoryFields { name })?;
                api.send(Method::PUT, &format!("/categories/{id}"), Some(body))
                    .await?
            }
            CategoryCommand::Delete { id } => {
                api.send(Method::DELETE, &format!("/categories/{id}"), None)
                    .await?
            }
        },
        Commands::Bikes(cmd) => match cmd {
            BikeCommand::List => api.send(Method::GET, "/bikes", None).await?,
            BikeCommand::Get { id } => api.send(Method::GET, &format!("/bikes/{id}"), None).await?,
            BikeCommand::Create { fields } => {
                let body = serde_json::to_value(fields)?;
                api.send(Method::POST, "/bikes", Some(body)).await?
            }
            BikeCommand::Update { id, fields } => {
                let body = serde_json::to_value(fields)?;
                api.send(Method::PUT, &format!("/bikes/{id}"), Some(body)).await?
            }
            BikeCommand::Delete { id } => {
                api.send(Method::DELETE, &format!("/bikes/{id}"), None).await?
            }
        },
        Commands::Metrics => {
            let res = api.send(Method::GET, "/metrics", None).await?;
            return print_text(res).await;
        }
    };

    print_response(res).await
}

struct Api {
    client: Client,
    base: String,
}

impl Api {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, reqwest::Error> {
        let mut req = self.client.request(method, format!("{}{}", self.base, path));
        if let Some(body) = body {
            req = req.json(&body);
        }
        req.send().await
    }
}

async fn print_response(res: Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: API returned status {status}");
        if !text.is_empty() {
            eprintln!("{text}");
        }
        return Ok(ExitCode::FAILURE);
    }

    if text.is_empty() {
        println!("{status}");
    } else {
        let json: Value = serde_json::from_str(&text)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(ExitCode::SUCCESS)
}

async fn print_text(res: Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: API returned status {status}");
        return Ok(ExitCode::FAILURE);
    }
    print!("{text}");
    Ok(ExitCode::SUCCESS)
}
