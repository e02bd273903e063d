use std::path::PathBuf;
use std::process::ExitCode;

use bistro_admin::config::{ClientConfig, ConfigError};
use bistro_admin::navigation::NavState;
use bistro_admin::transport::FileUpload;
use bistro_admin::types::{EntityId, ListParams, MenuDraft, OrderDraft, OrderPatch, OrderStatus};
use bistro_admin::{AdminClient, ServiceError, TransportError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Service(#[from] ServiceError),
    #[error("--password (or BISTRO_PASSWORD) is required with --username")]
    MissingPassword,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cannot read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
}

#[derive(Parser, Debug)]
#[command(name = "bistro-admin", about = "Restaurant ordering admin client")]
struct Cli {
    /// Overrides `BISTRO_API_BASE_URL`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Overrides `BISTRO_DOWNLOAD_DIR`.
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    #[arg(long, env = "BISTRO_USERNAME", global = true)]
    username: Option<String>,

    #[arg(long, env = "BISTRO_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the server whether the session is signed in.
    Status,
    Whoami,
    /// Run the navigation guard for a route path.
    Navigate { path: String },
    Menus(MenuCommand),
    Orders(OrderCommand),
}

#[derive(Args, Debug)]
struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

#[derive(Subcommand, Debug)]
enum MenuSubcommand {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        paging: Paging,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long, help = "Menu fields as a JSON object")]
        data: String,
    },
    Update {
        id: String,
        #[arg(long, help = "Menu fields as a JSON object")]
        data: String,
    },
    Delete {
        id: String,
    },
    Categories,
    UploadImage {
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrderSubcommand {
    List {
        #[arg(long)]
        status: Option<OrderStatus>,
        #[command(flatten)]
        paging: Paging,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long, help = "Order with customer_name, notes and items as a JSON object")]
        data: String,
    },
    Update {
        id: String,
        #[arg(long, help = "Order fields as a JSON object")]
        data: String,
    },
    Status {
        id: String,
        status: OrderStatus,
    },
    Delete {
        id: String,
    },
    /// Download the order list as PDF into the download directory.
    Export {
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Download one order as PDF into the download directory.
    ExportOne {
        id: String,
    },
}

#[derive(Args, Debug)]
struct Paging {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    per_page: Option<u32>,
}

impl Paging {
    fn apply(&self, mut params: ListParams) -> ListParams {
        if let Some(page) = self.page {
            params = params.page(page);
        }
        if let Some(per_page) = self.per_page {
            params = params.per_page(per_page);
        }
        params
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(dir) = cli.download_dir {
        config.download_dir = dir;
    }
    let client = AdminClient::new(&config)?;

    if let Some(username) = &cli.username {
        let password = cli.password.as_deref().ok_or(CliError::MissingPassword)?;
        let session = client.auth.login(username, password).await?;
        tracing::info!(username = session.user.username().unwrap_or(username), "signed in");
    }

    match cli.command {
        Command::Status => print_json(&json!({ "authenticated": client.auth.check_auth().await })),
        Command::Whoami => print_json(&client.auth.current_user().await?),
        Command::Navigate { path } => run_navigate(&client, &path).await,
        Command::Menus(menus) => run_menus(&client, menus).await,
        Command::Orders(orders) => run_orders(&client, orders).await,
    }
}

async fn run_navigate(client: &AdminClient, path: &str) -> Result<(), CliError> {
    let nav = client.guard().navigate(path).await;
    let state = match nav.state {
        NavState::Evaluating => "evaluating",
        NavState::Allowed => "allowed",
        NavState::RedirectedToLogin => "redirected_to_login",
        NavState::RedirectedToHome => "redirected_to_home",
    };
    print_json(&json!({
        "requested": nav.requested,
        "route": nav.matched.as_ref().map(|m| m.route.name),
        "state": state,
        "authenticated": nav.authenticated,
        "destination": nav.destination(),
    }))
}

async fn run_menus(client: &AdminClient, menus: MenuCommand) -> Result<(), CliError> {
    let service = &client.menus;
    match menus.command {
        MenuSubcommand::List { category, search, paging } => {
            let mut params = paging.apply(ListParams::new());
            if let Some(category) = category {
                params = params.category(category);
            }
            if let Some(search) = search {
                params = params.search(search);
            }
            print_json(&service.list_menus(&params).await?)
        }
        MenuSubcommand::Get { id } => print_json(&service.get_menu(EntityId::from(id)).await?),
        MenuSubcommand::Create { data } => {
            let draft = serde_json::from_str::<MenuDraft>(&data)?;
            print_json(&service.create_menu(&draft).await?)
        }
        MenuSubcommand::Update { id, data } => {
            let draft = serde_json::from_str::<MenuDraft>(&data)?;
            print_json(&service.update_menu(EntityId::from(id), &draft).await?)
        }
        MenuSubcommand::Delete { id } => print_json(&service.delete_menu(EntityId::from(id)).await?),
        MenuSubcommand::Categories => print_json(&service.categories().await?),
        MenuSubcommand::UploadImage { path } => {
            let file = FileUpload::from_path(&path)
                .await
                .map_err(|source| CliError::ReadFile { path: path.clone(), source })?;
            print_json(&service.upload_image(file).await?)
        }
    }
}

async fn run_orders(client: &AdminClient, orders: OrderCommand) -> Result<(), CliError> {
    let service = &client.orders;
    match orders.command {
        OrderSubcommand::List { status, paging } => {
            let mut params = paging.apply(ListParams::new());
            if let Some(status) = status {
                params = params.status(status);
            }
            print_json(&service.list_orders(&params).await?)
        }
        OrderSubcommand::Get { id } => print_json(&service.get_order(EntityId::from(id)).await?),
        OrderSubcommand::Create { data } => {
            let draft = serde_json::from_str::<OrderDraft>(&data)?;
            print_json(&service.create_order(&draft).await?)
        }
        OrderSubcommand::Update { id, data } => {
            let patch = serde_json::from_str::<OrderPatch>(&data)?;
            print_json(&service.update_order(EntityId::from(id), &patch).await?)
        }
        OrderSubcommand::Status { id, status } => {
            print_json(&service.update_order_status(EntityId::from(id), status).await?)
        }
        OrderSubcommand::Delete { id } => print_json(&service.delete_order(EntityId::from(id)).await?),
        OrderSubcommand::Export { status } => {
            let params = status.map_or_else(ListParams::new, |s| ListParams::new().status(s));
            print_json(&service.export_orders_pdf(&params).await?)
        }
        OrderSubcommand::ExportOne { id } => print_json(&service.export_order_pdf(EntityId::from(id)).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
