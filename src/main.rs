use clap::Parser;
use colored::Colorize;
use groupctl::config::AppSettings;
use groupctl::graph::GraphClient;
use groupctl::{cmd, error};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "groupctl",
    about = "Sign in to Microsoft Entra ID and list groups, owners and members",
    version,
    long_about = "Signs in with a username and password (or a device code) and runs a fixed\n\
                  sequence of Microsoft Graph requests: all groups, one group, its owners,\n\
                  its members, and the objects owned by the signed-in user."
)]
struct Cli {
    /// Path to appsettings.json (defaults to ./appsettings.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sign in with the device code flow instead of a password
    #[arg(long)]
    device_code: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("groupctl=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let settings = AppSettings::load(cli.config.as_deref())?;

    let token = cmd::login::login(&settings, cli.device_code).await?;
    println!("{}", "Signed in.".green());

    let client = GraphClient::with_base_url(token.clone(), &settings.graph_endpoint);
    let owner_client = GraphClient::with_base_url(token, &settings.graph_endpoint);

    cmd::groups::run(
        &client,
        &owner_client,
        &settings.group_id,
        &mut std::io::stdout(),
    )
    .await
}
