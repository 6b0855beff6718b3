use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "devproxy-cli")]
#[command(about = "Management CLI for the devproxy admin API", long_about = None)]
struct Cli {
    /// Admin API base URL
    #[arg(short, long, default_value = "http://localhost:8008")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current route configuration
    Routes,
    /// Temporarily point a route prefix at another backend
    Develop {
        /// Route prefix, e.g. /api
        prefix: String,
        /// Backend URL to develop against, e.g. http://localhost:3000
        #[arg(long)]
        at: String,
    },
    /// Restore a route prefix to its pre-override backend
    Use {
        /// Route prefix, e.g. /api
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let response = match cli.command {
        Commands::Routes => client.get(format!("{}/", cli.url)).send().await?,
        Commands::Develop { prefix, at } => {
            client
                .get(format!("{}/develop{}", cli.url, prefix))
                .query(&[("at", at)])
                .send()
                .await?
        }
        Commands::Use { prefix } => client.get(format!("{}/use{}", cli.url, prefix)).send().await?,
    };

    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        println!("{body}");
    } else {
        eprintln!("Error: admin API returned status {status}");
        eprintln!("{body}");
    }

    Ok(())
}
