use clap::{Args, Parser, Subcommand};
use taskbench_mongo::{config as mongo_config, MongoConfig, ReferenceMode};
use taskbench_postgres::{config as pg_config, PgConfig};

#[derive(Parser)]
#[command(name = "taskbench")]
#[command(about = "TaskBench - timed CRUD scenario against MongoDB and PostgreSQL", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print each run report as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the document-store scenario
    Mongo(MongoArgs),

    /// Run the relational-store scenario
    Postgres(PostgresArgs),

    /// Run both scenarios, one after the other
    All {
        #[command(flatten)]
        mongo: MongoArgs,

        #[command(flatten)]
        postgres: PostgresArgs,
    },

    /// Create the relational tables
    InitDb(PgArgs),
}

#[derive(Args, Clone)]
pub struct MongoArgs {
    /// MongoDB connection string
    #[arg(id = "mongo_uri", long = "mongo-uri", env = mongo_config::ENV_URI, default_value = mongo_config::DEFAULT_URI)]
    pub uri: String,

    /// MongoDB database name
    #[arg(id = "mongo_database", long = "mongo-database", env = mongo_config::ENV_DATABASE, default_value = mongo_config::DEFAULT_DATABASE)]
    pub database: String,

    /// Point the task at the inserted lookup ids instead of literal 1s
    #[arg(long)]
    pub resolve_references: bool,
}

impl MongoArgs {
    pub fn config(&self) -> MongoConfig {
        MongoConfig::new(self.uri.clone(), self.database.clone())
    }

    pub fn reference_mode(&self) -> ReferenceMode {
        if self.resolve_references {
            ReferenceMode::Resolved
        } else {
            ReferenceMode::Placeholder
        }
    }
}

#[derive(Args, Clone)]
pub struct PostgresArgs {
    #[command(flatten)]
    pub connection: PgArgs,

    /// Create the tables before running
    #[arg(long)]
    pub init_schema: bool,
}

#[derive(Args, Clone)]
pub struct PgArgs {
    /// PostgreSQL host
    #[arg(id = "pg_host", long = "pg-host", env = pg_config::ENV_HOST)]
    pub host: String,

    /// PostgreSQL port
    #[arg(id = "pg_port", long = "pg-port", env = pg_config::ENV_PORT)]
    pub port: u16,

    /// PostgreSQL user
    #[arg(id = "pg_user", long = "pg-user", env = pg_config::ENV_USER)]
    pub user: String,

    /// PostgreSQL password
    #[arg(id = "pg_password", long = "pg-password", env = pg_config::ENV_PASSWORD, hide_env_values = true)]
    pub password: String,

    /// PostgreSQL database name
    #[arg(id = "pg_database", long = "pg-database", env = pg_config::ENV_DATABASE)]
    pub database: String,
}

impl PgArgs {
    /// Validated connection parameters
    pub fn config(&self) -> taskbench_postgres::Result<PgConfig> {
        let config = PgConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        };
        config.validate()?;

        Ok(config)
    }
}
