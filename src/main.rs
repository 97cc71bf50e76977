use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use sqli_dao::config::Config;
use sqli_dao::db::repo::UserRepository;
use sqli_dao::services::{PasswordHasher, UserService};
use sqli_dao::{NewUser, UserId};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "sqli-dao", about = "Look up users and check passwords")]
struct Args {
    /// TOML config file. Falls back to DATABASE_URL / DB_POOL_SIZE (and .env) when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Apply embedded schema migrations
    Migrate,
    /// Print a user as JSON
    Get {
        #[arg(long, conflicts_with = "username", required_unless_present = "username")]
        id: Option<i64>,
        #[arg(long)]
        username: Option<String>,
    },
    /// Check a password for a user; exits non-zero on mismatch
    CheckPassword {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Insert a new user
    AddUser {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        admin: bool,
    },
    /// Print the PHC hash string for a password
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    let db = Arc::new(cfg.connect()?);
    let users = UserService::new(Arc::new(UserRepository::new(db.clone())));

    match args.cmd {
        Cmd::Migrate => {
            db.init().await?;
            tracing::info!("migrations up to date");
        }
        Cmd::Get { id, username } => {
            let user = match (id, username) {
                (Some(id), _) => users.get_by_id(UserId(id)).await?,
                (None, Some(username)) => users.get_by_username(&username).await?,
                (None, None) => bail!("either --id or --username is required"),
            };
            match user {
                Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
                None => bail!("no such user"),
            }
        }
        Cmd::CheckPassword { username, password } => {
            let user = users
                .get_by_username(&username)
                .await?
                .with_context(|| format!("no user named {username}"))?;
            if !user.check_password(&password) {
                bail!("password mismatch");
            }
            println!("ok");
        }
        Cmd::AddUser {
            first_name,
            middle_name,
            last_name,
            username,
            password,
            admin,
        } => {
            let mut new = NewUser::new(&first_name, &last_name, &username, &password)?.with_admin(admin);
            if let Some(middle) = middle_name {
                new = new.with_middle_name(middle);
            }
            let user = users.register(&new).await?;
            println!("{}", user.id);
        }
        Cmd::HashPassword { password } => {
            println!("{}", PasswordHasher::new().hash(&password)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, prelude::*};

    let _ = color_eyre::install();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(tracing_subscriber::fmt::time::uptime()),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();
}
