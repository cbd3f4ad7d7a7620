use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use leave_converter::api::{AppState, create_router};
use leave_converter::auth::CredentialStore;
use leave_converter::breakdown::expand_leave_with_summary;
use leave_converter::config::{ConfigLoader, ConverterConfig};
use leave_converter::export::{export_file_name, write_breakdown_workbook};
use leave_converter::import::read_leave_workbook;
use leave_converter::logging;
use leave_converter::models::{Employee, WeekdayHours};
use leave_converter::roster::Roster;
use leave_converter::store::JsonFileRepository;

/// Converts payroll leave transactions into per-weekday leave hours.
#[derive(Parser)]
#[command(name = "leave-converter", version, about)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to YAML configuration file. Built-in defaults are used if omitted.
    #[arg(short, long, global = true, env = "LEAVE_CONVERTER_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Command {
    /// Convert a payroll leave workbook into a leave breakdown workbook.
    Convert {
        /// Payroll leave export (.xlsx).
        input: PathBuf,

        /// Output path. Defaults to Leave_Breakdown_<timestamp>.xlsx.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the HTTP API.
    Serve {
        /// Socket address to listen on. Overrides the config file.
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Manage the employee roster.
    Employees {
        #[command(subcommand)]
        command: EmployeesCommand,
    },
    /// Manage user accounts.
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Subcommand)]
enum EmployeesCommand {
    /// List employees, optionally filtered by a search term.
    List {
        /// Case-insensitive match on employee number or name.
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Add an employee.
    Add {
        /// Employee number.
        id: String,
        /// First name.
        first_name: String,
        /// Last name.
        last_name: String,
        /// Monday hours.
        #[arg(long)]
        monday: Option<Decimal>,
        /// Tuesday hours.
        #[arg(long)]
        tuesday: Option<Decimal>,
        /// Wednesday hours.
        #[arg(long)]
        wednesday: Option<Decimal>,
        /// Thursday hours.
        #[arg(long)]
        thursday: Option<Decimal>,
        /// Friday hours.
        #[arg(long)]
        friday: Option<Decimal>,
    },
    /// Remove an employee.
    Remove {
        /// Employee number.
        id: String,
    },
}

#[derive(Subcommand)]
enum UsersCommand {
    /// List user accounts.
    List,
    /// Add a user account.
    Add {
        /// Login name.
        username: String,
        /// Display name.
        full_name: String,
        /// Password for the new account.
        #[arg(long, env = "LEAVE_CONVERTER_PASSWORD")]
        password: String,
        /// Grant admin rights.
        #[arg(long)]
        admin: bool,
    },
    /// Reactivate a user account.
    Activate {
        /// Account to change.
        username: String,
        /// Admin performing the change.
        #[arg(long)]
        actor: String,
    },
    /// Deactivate a user account.
    Deactivate {
        /// Account to change.
        username: String,
        /// Admin performing the change.
        #[arg(long)]
        actor: String,
    },
    /// Delete a user account.
    Delete {
        /// Account to delete.
        username: String,
        /// Admin performing the change.
        #[arg(long)]
        actor: String,
    },
    /// Set a new password without the current one.
    ResetPassword {
        /// Account to change.
        username: String,
        /// New password.
        #[arg(long, env = "LEAVE_CONVERTER_PASSWORD")]
        password: String,
    },
    /// Change a password, verifying the current one.
    ChangePassword {
        /// Account to change.
        username: String,
        /// Current password.
        #[arg(long)]
        current: String,
        /// New password.
        #[arg(long)]
        new: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?
        .into_config();

    match cli.command {
        Command::Convert { input, output } => convert(&config, &input, output),
        Command::Serve { bind } => serve(config, bind).await,
        Command::Employees { command } => employees(&config, command),
        Command::Users { command } => users(&config, command),
    }
}

fn open_roster(config: &ConverterConfig) -> Roster {
    Roster::new(Arc::new(JsonFileRepository::new(
        &config.storage.employees_path,
    )))
}

fn open_credentials(config: &ConverterConfig) -> Result<CredentialStore> {
    let store = CredentialStore::new(
        Arc::new(JsonFileRepository::new(&config.storage.users_path)),
        config.auth.clone(),
    );
    store.ensure_bootstrap_admin()?;
    Ok(store)
}

fn convert(config: &ConverterConfig, input: &Path, output: Option<PathBuf>) -> Result<()> {
    let imported = read_leave_workbook(input, &config.import)
        .with_context(|| format!("Failed to import '{}'", input.display()))?;
    let roster = open_roster(config).index()?;
    if roster.is_empty() {
        bail!(
            "No employees in '{}'. Add employees before converting leave.",
            config.storage.employees_path.display()
        );
    }

    let result = expand_leave_with_summary(&imported.transactions, &roster);
    let output =
        output.unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().naive_local())));
    write_breakdown_workbook(&result.records, &output)?;

    let summary = &result.summary;
    println!("Transactions read:     {}", imported.transactions.len());
    println!("Transactions matched:  {}", summary.transactions_processed);
    println!("Daily records written: {}", summary.records_emitted);
    println!("Total leave hours:     {}", summary.total_hours);
    if !summary.unmatched_employee_ids.is_empty() {
        println!(
            "Not on roster ({} transactions skipped): {}",
            summary.transactions_skipped,
            summary.unmatched_employee_ids.join(", ")
        );
    }
    println!("Wrote {}", output.display());
    Ok(())
}

async fn serve(config: ConverterConfig, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::new(
        open_roster(&config),
        open_credentials(&config)?,
        config.import.clone(),
    );

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!(bind = %bind, "Listening");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

fn employees(config: &ConverterConfig, command: EmployeesCommand) -> Result<()> {
    let roster = open_roster(config);
    match command {
        EmployeesCommand::List { query } => {
            let employees = match query {
                Some(query) => roster.search(&query)?,
                None => roster.list()?,
            };
            for employee in employees {
                let hours: Vec<String> = employee
                    .hours
                    .iter()
                    .map(|(_, hours)| hours.map(|h| h.to_string()).unwrap_or_else(|| "-".to_string()))
                    .collect();
                println!(
                    "{:<10} {:<30} {}",
                    employee.id,
                    employee.full_name(),
                    hours.join(" / ")
                );
            }
        }
        EmployeesCommand::Add {
            id,
            first_name,
            last_name,
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
        } => {
            let employee = roster.create(Employee {
                id,
                first_name,
                last_name,
                hours: WeekdayHours {
                    monday,
                    tuesday,
                    wednesday,
                    thursday,
                    friday,
                },
            })?;
            println!("Added employee {}", employee.id);
        }
        EmployeesCommand::Remove { id } => {
            roster.delete(&id)?;
            println!("Removed employee {}", id);
        }
    }
    Ok(())
}

fn users(config: &ConverterConfig, command: UsersCommand) -> Result<()> {
    let store = open_credentials(config)?;
    match command {
        UsersCommand::List => {
            for user in store.list_users()? {
                println!(
                    "{:<16} {:<30} {:<6} {}",
                    user.username,
                    user.full_name,
                    if user.is_admin { "admin" } else { "user" },
                    if user.active { "active" } else { "inactive" }
                );
            }
        }
        UsersCommand::Add {
            username,
            full_name,
            password,
            admin,
        } => {
            let user = store.add_user(&username, &password, &full_name, admin)?;
            println!("Added user {}", user.username);
        }
        UsersCommand::Activate { username, actor } => {
            store.set_active(&actor, &username, true)?;
            println!("Activated {}", username);
        }
        UsersCommand::Deactivate { username, actor } => {
            store.set_active(&actor, &username, false)?;
            println!("Deactivated {}", username);
        }
        UsersCommand::Delete { username, actor } => {
            store.delete_user(&actor, &username)?;
            println!("Deleted {}", username);
        }
        UsersCommand::ResetPassword { username, password } => {
            store.reset_password(&username, &password)?;
            println!("Password reset for {}", username);
        }
        UsersCommand::ChangePassword {
            username,
            current,
            new,
        } => {
            store.change_password(&username, &current, &new)?;
            println!("Password changed for {}", username);
        }
    }
    Ok(())
}
