use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bankstore::cli::{
    finish, handle_account_command, handle_customer_command, handle_transaction_command,
};
use bankstore::config::{BankPaths, Settings};
use bankstore::storage::Store;

#[derive(Parser)]
#[command(
    name = "bankstore",
    author = "Kaylee Beyene",
    version,
    about = "Text-file record store for a small banking application",
    long_about = "bankstore keeps customers, accounts, passwords and a transaction \
                  journal in plain colon-delimited text files. Register customers, \
                  open accounts, move money and print statements from the command line."
)]
struct Cli {
    /// Log level filter (overrides RUST_LOG and the settings file)
    #[arg(long, global = true, env = "BANKSTORE_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Customer registration and profile commands
    #[command(subcommand)]
    Customer(bankstore::cli::CustomerCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(bankstore::cli::AccountCommands),

    /// Deposits, withdrawals, transfers and statements
    #[command(subcommand, alias = "transaction")]
    Txn(bankstore::cli::TransactionCommands),

    /// Create the data directory and write a default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging(cli_level: Option<&str>, settings: &Settings) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
    };

    // Logs go to stderr so command output stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BankPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(cli.log_level.as_deref(), &settings);

    let Some(command) = cli.command else {
        println!("bankstore - text-file banking record store");
        println!();
        println!("Run 'bankstore --help' for usage information.");
        return Ok(());
    };

    if let Commands::Init = command {
        println!("Initializing bankstore at: {}", paths.base_dir().display());
        paths.ensure_directories()?;
        if !paths.settings_file().exists() {
            settings.save(&paths)?;
        }
        println!("Initialization complete!");
        println!("Run 'bankstore customer register --help' to get started.");
        return Ok(());
    }

    if let Commands::Config = command {
        println!("bankstore Configuration");
        println!("=======================");
        println!("Base directory:   {}", paths.base_dir().display());
        println!("Data directory:   {}", paths.data_dir().display());
        println!("Settings file:    {}", paths.settings_file().display());
        println!("Audit log:        {}", paths.audit_log().display());
        println!();
        println!("Settings:");
        println!("  Interest rate:      {} per year", settings.interest_rate());
        println!("  Maintenance fee:    {}", settings.maintenance_fee());
        println!("  First customer id:  {}", settings.first_customer_id);
        println!("  First account no.:  {}", settings.first_account_number);
        println!("  Log level:          {}", settings.log_level);
        return Ok(());
    }

    let mut store = Store::open(paths, settings)?;

    let result = match command {
        Commands::Customer(cmd) => handle_customer_command(&mut store, cmd),
        Commands::Account(cmd) => handle_account_command(&mut store, cmd),
        Commands::Txn(cmd) => handle_transaction_command(&mut store, cmd),
        Commands::Init | Commands::Config => Ok(()),
    };

    let closed = store.close();
    finish(result, closed)?;
    Ok(())
}
