//! Category index migration.
//!
//! Categories used to carry a unique index on `slug` alone, which stops the
//! same subcategory (say "bathroom") from existing under two parents. This
//! migration replaces it with a unique index on `(slug, parent)`.
//!
//! # Usage
//!
//! ```bash
//! # Apply
//! tilestore-cli migrate category-index
//!
//! # Show what would change
//! tilestore-cli migrate category-index --dry-run
//!
//! # List current index names
//! tilestore-cli indexes
//! ```
//!
//! Running the migration again is harmless: dropping an absent index counts
//! as success and re-creating an identical index is a no-op.

use async_trait::async_trait;
use mongodb::bson::Document;
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::{info, warn};

use crate::settings::MongoSettings;

/// Name of the legacy single-field unique index.
pub const LEGACY_INDEX: &str = "slug_1";

/// Name of the compound unique index.
pub const COMPOUND_INDEX: &str = "slug_1_parent_1";

/// `NamespaceNotFound`: the collection does not exist.
const NAMESPACE_NOT_FOUND: i32 = 26;

/// `IndexNotFound`: no index with the given name.
const INDEX_NOT_FOUND: i32 = 27;

/// `IndexOptionsConflict` and `IndexKeySpecsConflict`.
const INDEX_CONFLICT: [i32; 2] = [85, 86];

/// Errors that abort a migration.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// An index with the target name exists with a different definition.
    #[error("Index {0} exists with a different definition")]
    Conflict(String),
}

/// Whether a failed drop only means there was nothing to drop.
const fn is_absent_code(code: i32) -> bool {
    matches!(code, NAMESPACE_NOT_FOUND | INDEX_NOT_FOUND)
}

fn command_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        _ => None,
    }
}

fn is_absent(err: &mongodb::error::Error) -> bool {
    command_code(err).is_some_and(is_absent_code)
}

// =============================================================================
// Index store
// =============================================================================

/// A unique index definition: key fields in order, all ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueIndex {
    pub name: String,
    pub fields: Vec<String>,
}

impl UniqueIndex {
    /// The `(slug, parent)` index this migration installs.
    #[must_use]
    pub fn slug_parent() -> Self {
        Self {
            name: COMPOUND_INDEX.to_string(),
            fields: vec!["slug".to_string(), "parent".to_string()],
        }
    }

    fn keys(&self) -> Document {
        self.fields
            .iter()
            .map(|field| (field.clone(), 1_i32.into()))
            .collect()
    }
}

/// What happened to an index the migration tried to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped,
    Absent,
}

/// The index operations the migration needs from a collection.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Names of all indexes; empty if the collection does not exist.
    async fn index_names(&self) -> Result<Vec<String>, MigrationError>;

    /// Drop an index by name. A missing index or collection is `Absent`.
    async fn drop_index(&self, name: &str) -> Result<DropOutcome, MigrationError>;

    /// Create a unique index. Creating an identical index again is a no-op.
    async fn create_unique_index(&self, index: &UniqueIndex) -> Result<(), MigrationError>;
}

/// [`IndexStore`] over a MongoDB collection.
pub struct MongoIndexStore {
    collection: Collection<Document>,
}

impl MongoIndexStore {
    #[must_use]
    pub fn new(client: &Client, settings: &MongoSettings) -> Self {
        Self {
            collection: client
                .database(&settings.database)
                .collection(&settings.collection),
        }
    }
}

#[async_trait]
impl IndexStore for MongoIndexStore {
    async fn index_names(&self) -> Result<Vec<String>, MigrationError> {
        match self.collection.list_index_names().await {
            Ok(names) => Ok(names),
            Err(e) if is_absent(&e) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn drop_index(&self, name: &str) -> Result<DropOutcome, MigrationError> {
        match self.collection.drop_index(name).await {
            Ok(()) => Ok(DropOutcome::Dropped),
            Err(e) if is_absent(&e) => Ok(DropOutcome::Absent),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_unique_index(&self, index: &UniqueIndex) -> Result<(), MigrationError> {
        let model = IndexModel::builder()
            .keys(index.keys())
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(index.name.clone())
                    .build(),
            )
            .build();

        match self.collection.create_index(model).await {
            Ok(_) => Ok(()),
            Err(e) if command_code(&e).is_some_and(|code| INDEX_CONFLICT.contains(&code)) => {
                Err(MigrationError::Conflict(index.name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Migration
// =============================================================================

/// The changes a migration run would make, given the current indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub drop_legacy: bool,
    pub create_compound: bool,
}

impl Plan {
    /// Work out the plan from the current index names.
    #[must_use]
    pub fn from_index_names(names: &[String]) -> Self {
        Self {
            drop_legacy: names.iter().any(|n| n == LEGACY_INDEX),
            create_compound: !names.iter().any(|n| n == COMPOUND_INDEX),
        }
    }

    /// Whether the collection is already migrated.
    #[must_use]
    pub const fn is_noop(self) -> bool {
        !self.drop_legacy && !self.create_compound
    }
}

/// Result of an applied migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub legacy: DropOutcome,
}

/// Drop the legacy index, then ensure the compound one.
///
/// # Errors
///
/// Returns any database error other than an absent index or collection.
pub async fn apply(store: &dyn IndexStore) -> Result<Report, MigrationError> {
    let legacy = store.drop_index(LEGACY_INDEX).await?;
    match legacy {
        DropOutcome::Dropped => info!(index = LEGACY_INDEX, "Dropped legacy index"),
        DropOutcome::Absent => info!(index = LEGACY_INDEX, "Legacy index already absent"),
    }

    store.create_unique_index(&UniqueIndex::slug_parent()).await?;
    info!(index = COMPOUND_INDEX, "Compound unique index in place");

    Ok(Report { legacy })
}

/// Report what [`apply`] would do without changing anything.
///
/// # Errors
///
/// Returns an error if the index list cannot be read.
pub async fn plan(store: &dyn IndexStore) -> Result<Plan, MigrationError> {
    let names = store.index_names().await?;
    info!(indexes = ?names, "Current indexes");

    let plan = Plan::from_index_names(&names);
    if plan.is_noop() {
        info!("Nothing to do: collection is already migrated");
    } else {
        if plan.drop_legacy {
            info!(index = LEGACY_INDEX, "Would drop");
        }
        if plan.create_compound {
            info!(index = COMPOUND_INDEX, "Would create (unique on slug, parent)");
        }
    }
    Ok(plan)
}

async fn connect(settings: &MongoSettings) -> Result<Client, MigrationError> {
    let mut options = ClientOptions::parse(&settings.url).await?;
    options.app_name = Some("tilestore-cli".to_string());
    Ok(Client::with_options(options)?)
}

/// Run the category index migration against the configured database.
///
/// The client is shut down whether or not the migration succeeds.
///
/// # Errors
///
/// Returns an error if the connection or any non-benign index operation fails.
pub async fn category_index(settings: &MongoSettings, dry_run: bool) -> Result<(), MigrationError> {
    info!(
        database = %settings.database,
        collection = %settings.collection,
        dry_run,
        "Migrating category index"
    );

    let client = connect(settings).await?;
    let result = {
        let store = MongoIndexStore::new(&client, settings);
        if dry_run {
            plan(&store).await.map(|_| ())
        } else {
            apply(&store).await.map(|_| ())
        }
    };

    client.shutdown().await;

    match &result {
        Ok(()) if !dry_run => info!("Category index migration complete"),
        Ok(()) => {}
        Err(e) => warn!(error = %e, "Category index migration aborted"),
    }
    result
}

/// List index names on the configured collection.
///
/// # Errors
///
/// Returns an error if the connection or listing fails.
pub async fn list_indexes(settings: &MongoSettings) -> Result<Vec<String>, MigrationError> {
    let client = connect(settings).await?;
    let result = MongoIndexStore::new(&client, settings).index_names().await;
    client.shutdown().await;
    result
}
