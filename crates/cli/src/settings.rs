//! Document database connection settings.
//!
//! Each value comes from a command-line flag, falling back to the
//! environment (a `.env` file is honoured):
//!
//! - `--url` / `MONGODB_URL` (or `MONGO_URL`) - connection string, required
//! - `--database` / `MONGODB_DATABASE` (or `MONGO_DATABASE`) - required
//! - `--collection` / `CATEGORIES_COLLECTION` - default `categories`

use clap::Args;

use crate::commands::MigrationError;

/// Collection holding categories when nothing else is configured.
pub const DEFAULT_COLLECTION: &str = "categories";

/// Connection flags shared by every database command.
#[derive(Debug, Clone, Default, Args)]
pub struct MongoArgs {
    /// Connection string (overrides `MONGODB_URL`)
    #[arg(long)]
    pub url: Option<String>,

    /// Database name (overrides `MONGODB_DATABASE`)
    #[arg(long)]
    pub database: Option<String>,

    /// Categories collection name (overrides `CATEGORIES_COLLECTION`)
    #[arg(long)]
    pub collection: Option<String>,
}

/// Resolved connection settings.
#[derive(Clone)]
pub struct MongoSettings {
    pub url: String,
    pub database: String,
    pub collection: String,
}

// Connection strings may embed credentials.
impl std::fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSettings")
            .field("url", &"[REDACTED]")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

impl MongoSettings {
    /// Resolve settings from flags and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::MissingConfig` if the URL or database is unset.
    pub fn resolve(args: MongoArgs) -> Result<Self, MigrationError> {
        let _ = dotenvy::dotenv();
        Self::resolve_with(args, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::MissingConfig` if the URL or database is unset.
    pub fn resolve_with(
        args: MongoArgs,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, MigrationError> {
        let env = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        };

        let url = args
            .url
            .or_else(|| env(&["MONGODB_URL", "MONGO_URL"]))
            .ok_or(MigrationError::MissingConfig("MONGODB_URL"))?;
        let database = args
            .database
            .or_else(|| env(&["MONGODB_DATABASE", "MONGO_DATABASE"]))
            .ok_or(MigrationError::MissingConfig("MONGODB_DATABASE"))?;
        let collection = args
            .collection
            .or_else(|| env(&["CATEGORIES_COLLECTION"]))
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        Ok(Self {
            url,
            database,
            collection,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_fallbacks_and_default_collection() {
        let settings = MongoSettings::resolve_with(
            MongoArgs::default(),
            lookup(&[("MONGO_URL", "mongodb://db:27017"), ("MONGO_DATABASE", "tiles")]),
        )
        .unwrap();
        assert_eq!(settings.url, "mongodb://db:27017");
        assert_eq!(settings.database, "tiles");
        assert_eq!(settings.collection, DEFAULT_COLLECTION);
    }

    #[test]
    fn test_flags_override_environment() {
        let args = MongoArgs {
            url: Some("mongodb://flag:27017".to_string()),
            database: None,
            collection: Some("product_categories".to_string()),
        };
        let settings = MongoSettings::resolve_with(
            args,
            lookup(&[
                ("MONGODB_URL", "mongodb://env:27017"),
                ("MONGODB_DATABASE", "tiles"),
                ("CATEGORIES_COLLECTION", "ignored"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.url, "mongodb://flag:27017");
        assert_eq!(settings.collection, "product_categories");
    }

    #[test]
    fn test_missing_url_is_reported() {
        let err = MongoSettings::resolve_with(MongoArgs::default(), lookup(&[])).unwrap_err();
        assert!(matches!(err, MigrationError::MissingConfig("MONGODB_URL")));
    }

    #[test]
    fn test_debug_redacts_url() {
        let settings = MongoSettings {
            url: "mongodb://user:hunter2@db".to_string(),
            database: "tiles".to_string(),
            collection: "categories".to_string(),
        };
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
