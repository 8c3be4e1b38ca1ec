use anyhow::{Context, Result};
use ingredient_suggest::cli::{parse_args, Command, Settings};
use ingredient_suggest::ingestion::IngestionOutcome;
use ingredient_suggest::server;
use ingredient_suggest::state::AppContext;
use ingredient_suggest::suggest::{is_valid_term, MIN_QUERY_LENGTH};
use tracing_subscriber::EnvFilter;

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Model loading and ingestion are blocking and can take a while on first
/// run, so they happen off the async workers and before any listener binds.
async fn bootstrap(settings: &Settings) -> Result<(AppContext, IngestionOutcome)> {
    tracing::info!(
        model = %settings.embedding_model,
        db_path = %settings.db_path.display(),
        "Initializing embedding model and vector index"
    );
    let owned = settings.clone();
    let (ctx, outcome) = tokio::task::spawn_blocking(move || AppContext::bootstrap(&owned))
        .await
        .context("Startup task panicked")??;

    match outcome {
        IngestionOutcome::Skipped { existing } => {
            tracing::info!(existing, "Collection already populated, skipping ingestion")
        }
        IngestionOutcome::Populated { inserted } => {
            tracing::info!(inserted, "Catalog ingested")
        }
    }
    Ok((ctx, outcome))
}

async fn run(command: Command, settings: Settings) -> Result<()> {
    match command {
        Command::Serve => {
            let (ctx, _) = bootstrap(&settings).await?;
            server::serve(ctx, &settings).await
        }
        Command::Ingest => {
            let (ctx, outcome) = bootstrap(&settings).await?;
            match outcome {
                IngestionOutcome::Skipped { existing } => {
                    println!("Index already holds {} ingredients, nothing to do.", existing)
                }
                IngestionOutcome::Populated { inserted } => {
                    println!("Ingested {} ingredients into '{}'.", inserted, ctx.collection().name())
                }
            }
            Ok(())
        }
        Command::Suggest { termo } => {
            if !is_valid_term(&termo) {
                anyhow::bail!("Search term must have at least {} characters", MIN_QUERY_LENGTH);
            }
            let (ctx, _) = bootstrap(&settings).await?;
            let response = ctx
                .suggest(termo.clone())
                .await
                .with_context(|| format!("Failed to get suggestions for '{}'", termo))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = parse_args();
    init_tracing(&cli.settings);

    let command = cli.command.unwrap_or(Command::Serve);
    if let Err(e) = run(command, cli.settings).await {
        tracing::error!(error = %format!("{:#}", e), "Fatal error");
        return Err(e);
    }
    Ok(())
}
