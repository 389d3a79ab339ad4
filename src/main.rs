use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// foodgram - recipe sharing API
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Recipes, subscriptions and shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Ingredient catalog
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommands,
    },
    /// Tag catalog
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// User administration
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum IngredientCommands {
    /// Load `[{"name", "measurement_unit"}]` from a JSON file, skipping known pairs
    Import { path: String },
}

#[derive(Subcommand)]
enum TagCommands {
    Create {
        #[arg(long)]
        name: String,
        /// Hex color, e.g. #E26C2D
        #[arg(long)]
        color: String,
        #[arg(long)]
        slug: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    SetRole {
        email: String,
        #[arg(value_enum)]
        role: cli::user::Role,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = foodgram::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    foodgram::observability::init_observability(
        "foodgram",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cli::migrate::migrate(&config).await,
        Commands::Reset => cli::migrate::reset(&config).await,
        Commands::Ingredient {
            command: IngredientCommands::Import { path },
        } => cli::catalog::import_ingredients(&config, &path).await,
        Commands::Tag {
            command: TagCommands::Create { name, color, slug },
        } => cli::catalog::create_tag(&config, name, color, slug).await,
        Commands::User {
            command: UserCommands::SetRole { email, role },
        } => cli::user::set_role(&config, email, role).await,
    }
}
