//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use storeadmin_core::api::{
    DashboardPeriod, Id, NewStaffMember, OrderStatus, ProfileUpdate, StaffAccess,
};
use storeadmin_core::{config, logging};

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "storeadmin")]
#[command(version)]
#[command(about = "Store admin console and command line client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOREADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show where a fresh session would start
    Status,
    /// Show dashboard figures
    Dashboard {
        /// today, last_7_days, last_30_days or this_month
        #[arg(long)]
        period: Option<DashboardPeriod>,
    },
    /// Browse and update orders
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Browse products and adjust stock
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
    /// Manage staff members
    Staff {
        #[command(subcommand)]
        command: StaffCommands,
    },
    /// List customers
    Customers {
        #[arg(long)]
        search: Option<String>,
    },
    /// Update the signed-in profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum OrderCommands {
    /// List orders
    List {
        /// pending, processing, paid, delivered or cancelled
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one order with its items
    Show {
        #[arg(value_name = "ORDER_ID")]
        id: Id,
    },
    /// Change an order's status
    SetStatus {
        #[arg(value_name = "ORDER_ID")]
        id: Id,
        #[arg(value_name = "STATUS")]
        status: OrderStatus,
    },
}

#[derive(clap::Subcommand)]
enum InventoryCommands {
    /// List products
    List {
        #[arg(long)]
        search: Option<String>,
        /// Only products that need restocking
        #[arg(long)]
        low_stock: bool,
    },
    /// Show one product
    Show {
        #[arg(value_name = "PRODUCT_ID")]
        id: Id,
    },
    /// Set a product's stock level
    SetStock {
        #[arg(value_name = "PRODUCT_ID")]
        id: Id,
        #[arg(value_name = "QUANTITY")]
        quantity: i64,
    },
}

#[derive(clap::Subcommand)]
enum StaffCommands {
    /// List staff members
    List {
        /// Match against name or role
        #[arg(long)]
        filter: Option<String>,
    },
    /// Add a staff member
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: String,
        /// full_admin, pos_access, limited or basic
        #[arg(long)]
        access: StaffAccess,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ProfileCommands {
    /// Change name, email or phone
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Upload a new avatar image
    Avatar {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Change the account password
    Password {
        #[arg(long, env = "STOREADMIN_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "STOREADMIN_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
    /// Save notification preferences
    Notifications {
        #[arg(long, value_enum)]
        push: Option<commands::profile::Switch>,
        #[arg(long, value_enum)]
        orders: Option<commands::profile::Switch>,
        #[arg(long, value_enum)]
        reports: Option<commands::profile::Switch>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
    /// Point the client at a different backend
    SetBaseUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    // default to the console
    let Some(command) = cli.command else {
        return commands::console::run(&config).await;
    };

    logging::init_stderr(&config.logging);

    match command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, email, password).await
        }
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(&config).await,
        Commands::Status => commands::auth::status(&config).await,
        Commands::Dashboard { period } => {
            let period = period.unwrap_or(config.dashboard_period);
            commands::dashboard::show(&config, period).await
        }

        Commands::Orders { command } => match command {
            OrderCommands::List { status, search } => {
                commands::orders::list(&config, status, search).await
            }
            OrderCommands::Show { id } => commands::orders::show(&config, &id).await,
            OrderCommands::SetStatus { id, status } => {
                commands::orders::set_status(&config, &id, status).await
            }
        },

        Commands::Inventory { command } => match command {
            InventoryCommands::List { search, low_stock } => {
                commands::inventory::list(&config, search.as_deref(), low_stock).await
            }
            InventoryCommands::Show { id } => commands::inventory::show(&config, &id).await,
            InventoryCommands::SetStock { id, quantity } => {
                commands::inventory::set_stock(&config, &id, quantity).await
            }
        },

        Commands::Staff { command } => match command {
            StaffCommands::List { filter } => {
                commands::staff::list(&config, filter.as_deref()).await
            }
            StaffCommands::Add {
                name,
                email,
                role,
                access,
                phone,
            } => {
                let member = NewStaffMember {
                    name,
                    email,
                    role,
                    access,
                    phone,
                };
                commands::staff::add(&config, &member).await
            }
        },

        Commands::Customers { search } => {
            commands::customers::list(&config, search.as_deref()).await
        }

        Commands::Profile { command } => match command {
            ProfileCommands::Update { name, email, phone } => {
                let update = ProfileUpdate { name, email, phone };
                commands::profile::update(&config, &update).await
            }
            ProfileCommands::Avatar { path } => commands::profile::avatar(&config, &path).await,
            ProfileCommands::Password { current, new } => {
                commands::profile::password(&config, current, new).await
            }
            ProfileCommands::Notifications {
                push,
                orders,
                reports,
            } => commands::profile::notifications(&config, push, orders, reports).await,
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
            ConfigCommands::SetBaseUrl { url } => commands::config::set_base_url(&url),
        },
    }
}
