use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Statement,
};

use crate::entity::{Customers, Favorites};

/// Indexes the entity-derived DDL cannot express. Both are scoped to live rows
/// so a soft-deleted row never blocks re-inserting the same key.
const INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS favorites_active_pair_idx \
     ON favorites (customer_id, product_id) WHERE deleted_at IS NULL",
    "CREATE INDEX IF NOT EXISTS favorites_customer_created_idx \
     ON favorites (customer_id, created_at)",
    "CREATE UNIQUE INDEX IF NOT EXISTS customers_active_email_idx \
     ON customers (email) WHERE deleted_at IS NULL",
];

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    if database_url.starts_with("sqlite") {
        // Every SQLite connection to `:memory:` opens its own database.
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Create the `customers` and `favorites` tables and their indexes if missing.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    create_table(conn, Customers).await?;
    create_table(conn, Favorites).await?;

    let backend = conn.get_database_backend();
    for index in INDEXES {
        conn.execute(Statement::from_string(backend, *index)).await?;
    }

    Ok(())
}

async fn create_table<E: EntityTrait>(conn: &DatabaseConnection, entity: E) -> Result<()> {
    let backend = conn.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}
