use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstore_kernel::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "bookstore", version, about = "Bookstore catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations, then serve HTTP until interrupted
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply pending migrations and exit
    Migrate,
    /// Print the HTTP routes exposed by the registered modules
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookstore_app::serve(settings).await
        }
        Command::Migrate => {
            let applied = bookstore_app::migrate(&settings).await?;
            tracing::info!(applied, url = %settings.database.url, "migrations complete");
            println!("applied {} migration(s)", applied);
            Ok(())
        }
        Command::Routes => {
            // Route listing needs module metadata only, never a live connection.
            let pool = sqlx::sqlite::SqlitePoolOptions::new()
                .connect_lazy(&settings.database.url)
                .context("invalid database url")?;
            let registry = bookstore_app::build_registry(&pool);
            let document = bookstore_http::router::openapi_document(&registry);

            if let Some(paths) = document["paths"].as_object() {
                tracing::info!(modules = registry.module_count(), paths = paths.len(), "listing routes");
                for (path, item) in paths {
                    let verbs: Vec<String> = item
                        .as_object()
                        .map(|ops| ops.keys().map(|verb| verb.to_uppercase()).collect())
                        .unwrap_or_default();
                    println!("{:<24} {}", path, verbs.join(", "));
                }
            }
            Ok(())
        }
    }
}
