use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;

use crate::ai::{FormulaProxy, GenerationDefaults, OpenAiProvider, ProviderConfig};
use crate::api::{run_api_server, ApiConfig, AppState};
use crate::error::RelishResult;
use crate::store::ReviewStore;
use crate::types::ReviewFields;

/// Example rows loaded by `relish seed` when no file is given.
const DEFAULT_SEED: &str = include_str!("../../data/reviews.json");

/// Execute the serve command
pub async fn serve(
    host: String,
    port: u16,
    db: PathBuf,
    assets: Option<PathBuf>,
    model: Option<String>,
) -> anyhow::Result<()> {
    println!("{}", "🍽️  Relish - Review grid server".bold().green());
    println!("   Database: {}", db.display());

    let mut provider_config = ProviderConfig::from_env();
    if let Some(model) = model {
        provider_config.model = model;
    }
    println!("   Model: {}", provider_config.model.cyan());
    if provider_config.api_key.is_none() {
        println!(
            "{}",
            "⚠️  OPENAI_API_KEY is not set - =AI() formulas will return the error content"
                .yellow()
        );
    }
    println!();

    let store = ReviewStore::open(&db)?;
    let provider = OpenAiProvider::new(provider_config)?;
    let proxy = FormulaProxy::new(Arc::new(provider), GenerationDefaults::default());

    let state = Arc::new(AppState {
        store,
        proxy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: Utc::now(),
    });

    let config = ApiConfig {
        host,
        port,
        assets_dir: assets,
    };

    run_api_server(config, state).await
}

/// Execute the seed command - recreate the reviews table with example data
pub fn seed(db: PathBuf, file: Option<PathBuf>) -> RelishResult<()> {
    println!("{}", "🌱 Relish - Seeding review data".bold().green());
    println!("   Database: {}", db.display());

    let raw = match &file {
        Some(path) => {
            println!("   Source: {}", path.display());
            fs::read_to_string(path)?
        }
        None => {
            println!("   Source: built-in example reviews");
            DEFAULT_SEED.to_string()
        }
    };

    let drafts: Vec<ReviewFields> = serde_json::from_str(&raw)?;

    let store = ReviewStore::open(&db)?;
    let count = store.seed(&drafts)?;

    println!();
    println!(
        "{} {} rows written",
        "✅".green(),
        count.to_string().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_seed_parses() {
        let drafts: Vec<ReviewFields> = serde_json::from_str(DEFAULT_SEED).unwrap();

        assert!(!drafts.is_empty());
        // Every built-in row names its restaurant and carries a review
        for draft in &drafts {
            assert!(draft.restaurant.is_some());
            assert!(draft.review.is_some());
        }
    }

    #[test]
    fn test_seed_writes_default_rows() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("reviews.db");

        seed(db.clone(), None).unwrap();

        let store = ReviewStore::open(&db).unwrap();
        let expected: Vec<ReviewFields> = serde_json::from_str(DEFAULT_SEED).unwrap();
        assert_eq!(store.find_all().unwrap().len(), expected.len());
    }

    #[test]
    fn test_seed_from_custom_file() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("reviews.db");
        let file = dir.path().join("rows.json");
        fs::write(
            &file,
            r#"[{"restaurant": "Pho 88", "review": "Great broth"}]"#,
        )
        .unwrap();

        seed(db.clone(), Some(file)).unwrap();

        let store = ReviewStore::open(&db).unwrap();
        let all = store.find_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].fields.restaurant, Some("Pho 88".to_string()));
    }

    #[test]
    fn test_seed_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("reviews.db");
        let file = dir.path().join("rows.json");
        fs::write(&file, "not json").unwrap();

        assert!(seed(db, Some(file)).is_err());
    }
}
