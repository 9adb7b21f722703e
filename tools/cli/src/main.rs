//! PassVault CLI - Command line interface for the credential vault.
//!
//! This tool registers accounts, manages the device session and stores,
//! lists, reveals and deletes service credentials for the logged-in user.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use passvault_vault::config::{default_data_dir, CONFIG_FILENAME};
use passvault_vault::{generate_password, CredentialStore, StorageConfig, VaultConfig};

#[derive(Parser)]
#[command(name = "passvault")]
#[command(about = "PassVault - Local credential vault")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: <data dir>/config.json).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the vault records; overrides the configured storage.
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account.
    Register {
        /// Account email.
        email: String,
    },

    /// Log in on this device.
    Login {
        /// Account email.
        email: String,
    },

    /// Log out of this device.
    Logout,

    /// Show the logged-in account.
    Whoami,

    /// Save a credential for the logged-in account.
    Add {
        /// Service name.
        service: String,

        /// Service URL.
        #[arg(short, long, default_value = "")]
        url: String,

        /// Generate a random password instead of prompting for one.
        #[arg(short, long)]
        generate: bool,
    },

    /// List saved credentials with their age.
    List,

    /// Show a saved password after re-entering the login password.
    Reveal {
        /// Entry id, as shown by `list`.
        id: String,
    },

    /// Delete a saved credential.
    Delete {
        /// Entry id, as shown by `list`.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Print a random password.
    Generate {
        /// Password length (default from config).
        #[arg(short, long)]
        length: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli).await?;
    let store = CredentialStore::from_config(&config).context("Failed to open vault storage")?;

    // App-start hook: provision the encryption key once per install
    store.key_store().ensure_key().await;

    match cli.command {
        Commands::Register { email } => cmd_register(&store, &email).await,
        Commands::Login { email } => cmd_login(&store, &email).await,
        Commands::Logout => cmd_logout(&store).await,
        Commands::Whoami => cmd_whoami(&store).await,
        Commands::Add {
            service,
            url,
            generate,
        } => cmd_add(&store, &config, &service, &url, generate).await,
        Commands::List => cmd_list(&store).await,
        Commands::Reveal { id } => cmd_reveal(&store, &id).await,
        Commands::Delete { id, yes } => cmd_delete(&store, &id, yes).await,
        Commands::Generate { length } => cmd_generate(&config, length),
    }
}

/// Resolve the configuration from the command line.
async fn load_config(cli: &Cli) -> Result<VaultConfig> {
    let base_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| base_dir.join(CONFIG_FILENAME));

    debug!(path = %config_path.display(), "Loading configuration");
    let mut config = VaultConfig::load(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(dir) = &cli.data_dir {
        config.storage = StorageConfig::local(dir);
    }

    Ok(config)
}

/// Prompt for password securely.
fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("Failed to read password")
}

/// Ask a yes/no question on the terminal.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Email of the logged-in account, or an error telling the user to log in.
async fn require_user(store: &CredentialStore) -> Result<String> {
    store
        .current_user()
        .await
        .context("Failed to read session")?
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `passvault login <email>` first."))
}

/// Create an account.
async fn cmd_register(store: &CredentialStore, email: &str) -> Result<()> {
    let password = prompt_password("Enter password: ")?;
    let confirmation = prompt_password("Confirm password: ")?;

    store
        .register_confirmed(email, &password, &confirmation)
        .await
        .context("Registration failed")?;

    println!("Account created for {}. Log in with `passvault login {}`.", email, email);
    Ok(())
}

/// Log in.
async fn cmd_login(store: &CredentialStore, email: &str) -> Result<()> {
    let password = prompt_password("Enter password: ")?;

    store
        .login(email, &password)
        .await
        .context("Login failed")?;

    println!("Logged in as {}.", email);
    Ok(())
}

/// Log out.
async fn cmd_logout(store: &CredentialStore) -> Result<()> {
    store.logout().await.context("Logout failed")?;
    println!("Logged out.");
    Ok(())
}

/// Show the session.
async fn cmd_whoami(store: &CredentialStore) -> Result<()> {
    match store.session_state().await.user() {
        Some(email) => println!("{}", email),
        None => println!("Not logged in."),
    }
    Ok(())
}

/// Save a credential.
async fn cmd_add(
    store: &CredentialStore,
    config: &VaultConfig,
    service: &str,
    url: &str,
    generate: bool,
) -> Result<()> {
    let owner = require_user(store).await?;

    let password = if generate {
        let generated = generate_password(config.generator.length)?;
        println!("Generated password: {}", generated);
        generated
    } else {
        prompt_password(&format!("Password for {}: ", service))?
    };

    let entry = store
        .add_entry(&owner, service, &password, url)
        .await
        .context("Failed to save password")?;

    println!("Password saved for {} (id {}).", entry.service, entry.id);
    Ok(())
}

/// List credentials.
async fn cmd_list(store: &CredentialStore) -> Result<()> {
    let owner = require_user(store).await?;
    let entries = store
        .list_entries(&owner)
        .await
        .context("Failed to load passwords")?;

    if entries.is_empty() {
        println!("No saved passwords yet.");
        return Ok(());
    }

    let now = chrono::Utc::now();
    println!("Saved passwords for {}:", owner);
    for entry in entries {
        let age = entry.age_in_days(now);
        println!(
            "  {}  {}  [{}] {} days since last modification",
            entry.id,
            entry.service,
            entry.risk_band(now),
            age
        );
        if !entry.url.is_empty() {
            println!("      {}", entry.url);
        }
    }

    Ok(())
}

/// Reveal a credential.
async fn cmd_reveal(store: &CredentialStore, id: &str) -> Result<()> {
    let owner = require_user(store).await?;
    let password = prompt_password("Enter your login password: ")?;

    let secret = store
        .reveal_entry(&owner, id, &password)
        .await
        .context("Cannot reveal password")?;

    println!("{}", secret);
    Ok(())
}

/// Delete a credential.
async fn cmd_delete(store: &CredentialStore, id: &str, yes: bool) -> Result<()> {
    let owner = require_user(store).await?;

    if !yes && !confirm(&format!("Delete entry {}? This action cannot be undone.", id))? {
        println!("Cancelled.");
        return Ok(());
    }

    store
        .delete_entry(&owner, id)
        .await
        .context("Failed to delete password")?;

    println!("Deleted {}.", id);
    Ok(())
}

/// Print a random password.
fn cmd_generate(config: &VaultConfig, length: Option<usize>) -> Result<()> {
    let password = generate_password(length.unwrap_or(config.generator.length))?;
    println!("{}", password);
    Ok(())
}
