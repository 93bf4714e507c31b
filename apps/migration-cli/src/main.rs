use clap::{Parser, ValueEnum};
use migration::MigrationCommand;
use neutrino_backend::infra::db::run_migration;
use neutrino_backend::{telemetry, DbKind};

#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Neutrino database migration tool")]
struct Args {
    /// Migration command: up | down | fresh | reset | refresh | status
    command: MigrationCommand,

    /// Database type
    #[arg(
        short,
        long,
        value_enum,
        default_value = "postgres",
        help = "Database type: postgres, sqlite-file"
    )]
    db: Db,
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.to_string().contains("invalid value") && e.to_string().contains("--db") {
                eprintln!("Unsupported database type provided.");
                eprintln!();
                eprintln!("In-memory SQLite is not supported here: each CLI run would migrate");
                eprintln!("a fresh database that disappears when the command exits.");
                eprintln!();
                eprintln!("Supported database types:");
                eprintln!("  postgres    - PostgreSQL database");
                eprintln!("  sqlite-file - SQLite file database (NEUTRINO_SQLITE_PATH)");
                std::process::exit(1);
            }
            e.exit();
        }
    };

    let db_kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };

    if let Err(e) = run_migration(db_kind, args.command).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
