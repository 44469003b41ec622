use anyhow::Result;

use crate::cli::{Cli, Commands, MongoArgs};
use taskbench_core::{Backend, RunReport};
use taskbench_mongo::MongoBackend;
use taskbench_postgres::{PgConfig, PgStore, PostgresBackend};

pub async fn execute(cli: Cli) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Mongo(args) => {
            let report = run_mongo(&args).await;
            print_report(&report, json)?;
        }

        Commands::Postgres(args) => {
            let config = args.connection.config()?;
            if args.init_schema {
                init_schema(&config).await?;
            }

            let report = run_backend(&mut PostgresBackend::new(config)).await;
            print_report(&report, json)?;
        }

        Commands::All { mongo, postgres } => {
            // Validate everything before either runner touches a database
            let config = postgres.connection.config()?;
            if postgres.init_schema {
                init_schema(&config).await?;
            }

            let mongo_report = run_mongo(&mongo).await;
            print_report(&mongo_report, json)?;

            let pg_report = run_backend(&mut PostgresBackend::new(config)).await;
            print_report(&pg_report, json)?;
        }

        Commands::InitDb(args) => {
            let config = args.config()?;
            init_schema(&config).await?;
            println!("✓ Database schema initialized");
        }
    }

    Ok(())
}

async fn run_mongo(args: &MongoArgs) -> RunReport {
    let mut backend = MongoBackend::new(args.config()).with_reference_mode(args.reference_mode());
    run_backend(&mut backend).await
}

async fn run_backend(backend: &mut dyn Backend) -> RunReport {
    println!("Running {} scenario...", backend.name());
    taskbench_core::run(backend).await
}

async fn init_schema(config: &PgConfig) -> Result<()> {
    let mut store = PgStore::connect(config).await?;
    let created = store.init_schema().await;
    store.close().await?;
    created?;

    tracing::info!("Schema ready on {}:{}/{}", config.host, config.port, config.database);
    Ok(())
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    for phase in &report.phases {
        match &phase.error {
            None => println!("  {}: {:.3}ms", phase.label, phase.elapsed_ms),
            Some(error) => println!("  {}: failed after {:.3}ms ({})", phase.label, phase.elapsed_ms, error),
        }

        if let Some(rows) = phase.output.as_ref().and_then(|o| o.rows()) {
            for row in rows {
                println!("    {}", row);
            }
        }
    }

    if report.cleaned {
        println!("  Database cleared");
    }

    match (&report.error, &report.cleanup_error) {
        (None, None) => println!("✓ {} run {} completed", report.backend, report.run_id),
        (Some(error), _) => println!("✗ {} run {} failed: {}", report.backend, report.run_id, error),
        (None, Some(error)) => println!("✗ {} cleanup failed: {}", report.backend, error),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    }

    Ok(())
}
