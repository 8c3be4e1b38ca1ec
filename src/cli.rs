use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::search::DEFAULT_EMBEDDING_MODEL;

#[derive(Parser, Debug)]
#[command(author, version, about = "Autocomplete suggestions for culinary ingredients", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ingest the catalog if needed and serve HTTP (default)
    Serve,
    /// Ingest the catalog if the index is empty, then exit
    Ingest,
    /// Print suggestions for one term as JSON
    Suggest {
        /// Search term
        termo: String,
    },
}

/// Runtime configuration. Every option can come from the environment (or a
/// `.env` file).
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Embedding model name
    #[arg(long, global = true, env = "EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Directory holding the persistent vector index
    #[arg(long, global = true, env = "CHROMA_DB_PATH", default_value = "./chroma_data")]
    pub db_path: PathBuf,

    /// Ingredient catalog JSON; the bundled catalog is used when unset
    #[arg(long, global = true, env = "INGREDIENTS_PATH")]
    pub catalog: Option<PathBuf>,

    /// Where downloaded model files are cached
    #[arg(long, global = true, env = "MODEL_CACHE_DIR")]
    pub model_cache_dir: Option<PathBuf>,

    /// Comma-separated allowed CORS origins, `*` for any
    #[arg(long, global = true, env = "CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    #[arg(long, global = true, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, global = true, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Settings {
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", addr, e))
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ingredient_suggest"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.settings.db_path, PathBuf::from("./chroma_data"));
        assert_eq!(cli.settings.cors_origin_list(), vec!["*"]);
    }

    #[test]
    fn test_subcommand_and_global_flags() {
        let cli = Cli::try_parse_from([
            "ingredient_suggest",
            "suggest",
            "leite",
            "--embedding-model",
            "minishlab/potion-base-8M",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::Suggest { termo: "leite".into() }));
        assert_eq!(cli.settings.embedding_model, "minishlab/potion-base-8M");
    }

    #[test]
    fn test_cors_origin_list() {
        let cli = Cli::try_parse_from([
            "ingredient_suggest",
            "--cors-origins",
            "http://localhost:3000, https://app.example.com,,",
        ])
        .unwrap();
        assert_eq!(
            cli.settings.cors_origin_list(),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_socket_addr() {
        let cli = Cli::try_parse_from(["ingredient_suggest", "--host", "127.0.0.1", "--port", "9000"]).unwrap();
        assert_eq!(cli.settings.socket_addr().unwrap().port(), 9000);

        let cli = Cli::try_parse_from(["ingredient_suggest", "--host", "not a host"]).unwrap();
        assert!(cli.settings.socket_addr().is_err());
    }
}
