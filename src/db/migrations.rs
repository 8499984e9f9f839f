// Database Migrations
// Embedded, versioned schema for both PostgreSQL and SQLite

use crate::db::config::DatabaseType;
use crate::db::connection::DatabasePool;
use crate::error::TlsError;

/// Name of the table that records applied migrations
pub const MIGRATIONS_TABLE: &str = "_certwatch_migrations";

/// One schema step, with the statements for each backend
struct Migration {
    version: i64,
    description: &'static str,
    sqlite: &'static [&'static str],
    postgres: &'static [&'static str],
}

impl Migration {
    fn statements(&self, db_type: DatabaseType) -> &'static [&'static str] {
        match db_type {
            DatabaseType::Sqlite => self.sqlite,
            DatabaseType::Postgres => self.postgres,
        }
    }
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 20250101001,
    description: "create_certificate_records",
    sqlite: &[
        r#"
        CREATE TABLE IF NOT EXISTS certificate_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            expiry_date TIMESTAMP NOT NULL,
            issuer TEXT NOT NULL,
            subject TEXT NOT NULL,
            issued_date TIMESTAMP NOT NULL,
            version INTEGER NOT NULL,
            serial_number TEXT NOT NULL,
            signature_algorithm TEXT NOT NULL,
            sans TEXT NOT NULL DEFAULT '',
            tls_version TEXT NOT NULL
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_certificate_records_name ON certificate_records (name)",
    ],
    postgres: &[
        r#"
        CREATE TABLE IF NOT EXISTS certificate_records (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            expiry_date TIMESTAMPTZ NOT NULL,
            issuer TEXT NOT NULL,
            subject TEXT NOT NULL,
            issued_date TIMESTAMPTZ NOT NULL,
            version INTEGER NOT NULL,
            serial_number TEXT NOT NULL,
            signature_algorithm TEXT NOT NULL,
            sans TEXT NOT NULL DEFAULT '',
            tls_version TEXT NOT NULL
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_certificate_records_name ON certificate_records (name)",
    ],
}];

/// Run database migrations
///
/// Safe to call on every start: applied versions are skipped.
pub async fn run_migrations(pool: &DatabasePool) -> crate::Result<()> {
    create_migrations_table(pool).await?;

    let db_type = pool.db_type();
    for migration in MIGRATIONS {
        if is_applied(pool, migration.version).await? {
            continue;
        }

        tracing::info!(
            "Applying migration {} ({})",
            migration.version,
            migration.description
        );

        for statement in migration.statements(db_type) {
            execute(pool, statement).await.map_err(|e| {
                TlsError::Database(format!(
                    "Failed to execute migration {}: {}",
                    migration.description, e
                ))
            })?;
        }

        record_applied(pool, migration).await?;
    }

    Ok(())
}

/// Versions already applied, in ascending order
pub async fn applied_versions(pool: &DatabasePool) -> crate::Result<Vec<i64>> {
    let query = format!("SELECT version FROM {} ORDER BY version", MIGRATIONS_TABLE);

    let versions = match pool {
        DatabasePool::Postgres(pg_pool) => {
            sqlx::query_scalar::<_, i64>(&query).fetch_all(pg_pool).await
        }
        DatabasePool::Sqlite(sqlite_pool) => {
            sqlx::query_scalar::<_, i64>(&query)
                .fetch_all(sqlite_pool)
                .await
        }
    }
    .map_err(|e| TlsError::Database(format!("Failed to read migration status: {}", e)))?;

    Ok(versions)
}

async fn create_migrations_table(pool: &DatabasePool) -> crate::Result<()> {
    let query = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            version BIGINT PRIMARY KEY,
            description TEXT NOT NULL,
            installed_on TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        MIGRATIONS_TABLE
    );

    execute(pool, &query)
        .await
        .map_err(|e| TlsError::Database(format!("Failed to create migrations table: {}", e)))
}

async fn is_applied(pool: &DatabasePool, version: i64) -> crate::Result<bool> {
    let count = match pool {
        DatabasePool::Postgres(pg_pool) => {
            sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM {} WHERE version = $1",
                MIGRATIONS_TABLE
            ))
            .bind(version)
            .fetch_one(pg_pool)
            .await
        }
        DatabasePool::Sqlite(sqlite_pool) => {
            sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM {} WHERE version = ?",
                MIGRATIONS_TABLE
            ))
            .bind(version)
            .fetch_one(sqlite_pool)
            .await
        }
    }
    .map_err(|e| TlsError::Database(format!("Failed to check migration status: {}", e)))?;

    Ok(count > 0)
}

async fn record_applied(pool: &DatabasePool, migration: &Migration) -> crate::Result<()> {
    let result = match pool {
        DatabasePool::Postgres(pg_pool) => sqlx::query(&format!(
            "INSERT INTO {} (version, description) VALUES ($1, $2)",
            MIGRATIONS_TABLE
        ))
        .bind(migration.version)
        .bind(migration.description)
        .execute(pg_pool)
        .await
        .map(|_| ()),
        DatabasePool::Sqlite(sqlite_pool) => sqlx::query(&format!(
            "INSERT INTO {} (version, description) VALUES (?, ?)",
            MIGRATIONS_TABLE
        ))
        .bind(migration.version)
        .bind(migration.description)
        .execute(sqlite_pool)
        .await
        .map(|_| ()),
    };

    result.map_err(|e| {
        TlsError::Database(format!(
            "Failed to record migration {}: {}",
            migration.description, e
        ))
    })
}

async fn execute(pool: &DatabasePool, statement: &str) -> Result<(), sqlx::Error> {
    match pool {
        DatabasePool::Postgres(pg_pool) => {
            sqlx::query(statement).execute(pg_pool).await?;
        }
        DatabasePool::Sqlite(sqlite_pool) => {
            sqlx::query(statement).execute(sqlite_pool).await?;
        }
    }
    Ok(())
}
