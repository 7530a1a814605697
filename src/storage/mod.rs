use crate::domain::message::{Message, NewMessage};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub mod memory;
pub mod message_repo;
pub mod records;

pub use memory::InMemoryMessageRepository;
pub use message_repo::PgMessageRepository;

pub type DbPool = Pool<Postgres>;

/// Persistence for messages. Every operation is scoped to an organization
/// except `create`/`update`, which carry the organization on the message.
///
/// Each call is atomic on its own; nothing spans calls.
#[async_trait]
pub trait MessageRepository: Send + Sync + std::fmt::Debug {
    async fn list_by_organization(&self, organization_id: Uuid) -> Result<Vec<Message>>;

    async fn find_by_id(&self, organization_id: Uuid, id: Uuid) -> Result<Option<Message>>;

    /// Exact, case-sensitive title match regardless of `is_active`.
    async fn find_by_title(&self, organization_id: Uuid, title: &str) -> Result<Option<Message>>;

    /// Persists a new message and returns it with its assigned id.
    async fn create(&self, message: NewMessage) -> Result<Message>;

    async fn update(&self, message: &Message) -> Result<()>;

    /// Returns `false` when nothing matched.
    async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<bool>;

    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> Result<()>;
}

/// Initializes the database connection pool.
///
/// # Errors
/// Returns `sqlx::Error` if the connection fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> std::result::Result<DbPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(max_connections).connect(database_url).await
}

/// Applies the embedded migrations.
///
/// # Errors
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
