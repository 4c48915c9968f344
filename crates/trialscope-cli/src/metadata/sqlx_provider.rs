//! SQLx-based catalog introspection.
//!
//! Supports PostgreSQL, MySQL, and SQLite databases.

use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use thiserror::Error;
use tracing::debug;
use trialscope_core::{ColumnInput, ForeignKeyInput, Nullability, SchemaSnapshot, TableInput};

/// Error raised while reading a live catalog.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Only the scheme is kept so credentials never reach logs.
    #[error("unsupported database URL scheme '{0}'")]
    UnsupportedUrl(String),

    #[error("catalog query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Database type inferred from connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Postgres,
    Mysql,
    Sqlite,
}

impl DatabaseType {
    /// Infer database type from a connection URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::Mysql)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

/// One row of a columns query, before grouping into tables.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CatalogColumn {
    pub table_schema: Option<String>,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
}

/// Reads a structural snapshot from a database's system catalog.
pub struct SqlxMetadataProvider {
    pool: AnyPool,
    db_type: DatabaseType,
    schema: String,
}

impl SqlxMetadataProvider {
    /// Connects to the database at `url`. `schema` filters PostgreSQL and
    /// MySQL catalogs; SQLite has a single namespace and ignores it.
    pub async fn connect(url: &str, schema: &str) -> Result<Self, MetadataError> {
        let db_type = DatabaseType::from_url(url).ok_or_else(|| {
            MetadataError::UnsupportedUrl(url.split(':').next().unwrap_or_default().to_string())
        })?;

        sqlx::any::install_default_drivers();
        let pool = AnyPool::connect(url).await?;

        Ok(Self {
            pool,
            db_type,
            schema: schema.to_string(),
        })
    }

    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    pub async fn fetch_snapshot(&self) -> Result<SchemaSnapshot, MetadataError> {
        let (columns, foreign_keys) = match self.db_type {
            DatabaseType::Postgres => (
                self.fetch_postgres_columns().await?,
                self.fetch_postgres_foreign_keys().await?,
            ),
            DatabaseType::Mysql => (
                self.fetch_mysql_columns().await?,
                self.fetch_mysql_foreign_keys().await?,
            ),
            DatabaseType::Sqlite => self.fetch_sqlite_catalog().await?,
        };

        let tables = group_columns(columns);
        debug!(
            database = self.db_type.as_str(),
            schema = %self.schema,
            tables = tables.len(),
            foreign_keys = foreign_keys.len(),
            "introspected live catalog"
        );
        Ok(SchemaSnapshot {
            tables,
            foreign_keys,
        })
    }

    async fn fetch_postgres_columns(&self) -> Result<Vec<CatalogColumn>, MetadataError> {
        let query = r#"
            SELECT
                c.table_schema::text AS table_schema,
                c.table_name::text AS table_name,
                c.column_name::text AS column_name,
                c.data_type::text AS data_type,
                c.is_nullable::text AS is_nullable,
                CASE WHEN pk.column_name IS NOT NULL THEN true ELSE false END AS is_primary_key
            FROM information_schema.columns c
            LEFT JOIN (
                SELECT kcu.table_schema, kcu.table_name, kcu.column_name
                FROM information_schema.table_constraints tc
                JOIN information_schema.key_column_usage kcu
                    ON tc.constraint_name = kcu.constraint_name
                    AND tc.table_schema = kcu.table_schema
                WHERE tc.constraint_type = 'PRIMARY KEY'
            ) pk ON c.table_schema = pk.table_schema
                AND c.table_name = pk.table_name
                AND c.column_name = pk.column_name
            WHERE c.table_schema = $1
            ORDER BY c.table_name, c.ordinal_position
        "#;

        let rows = sqlx::query(query)
            .bind(self.schema.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(column_from_row).collect()
    }

    async fn fetch_postgres_foreign_keys(&self) -> Result<Vec<ForeignKeyInput>, MetadataError> {
        let query = r#"
            SELECT
                kcu.table_name::text AS child_table,
                kcu.column_name::text AS child_column,
                ccu.table_name::text AS parent_table,
                ccu.column_name::text AS parent_column
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
                ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
            JOIN information_schema.constraint_column_usage ccu
                ON tc.constraint_name = ccu.constraint_name
                AND tc.table_schema = ccu.table_schema
            WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = $1
            ORDER BY child_table, child_column
        "#;

        let rows = sqlx::query(query)
            .bind(self.schema.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(foreign_key_from_row).collect()
    }

    async fn fetch_mysql_columns(&self) -> Result<Vec<CatalogColumn>, MetadataError> {
        let query = r#"
            SELECT
                TABLE_SCHEMA AS table_schema,
                TABLE_NAME AS table_name,
                COLUMN_NAME AS column_name,
                DATA_TYPE AS data_type,
                IS_NULLABLE AS is_nullable,
                CASE WHEN COLUMN_KEY = 'PRI' THEN 1 ELSE 0 END AS is_primary_key
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = ?
            ORDER BY TABLE_NAME, ORDINAL_POSITION
        "#;

        let rows = sqlx::query(query)
            .bind(self.schema.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(column_from_row).collect()
    }

    async fn fetch_mysql_foreign_keys(&self) -> Result<Vec<ForeignKeyInput>, MetadataError> {
        let query = r#"
            SELECT
                TABLE_NAME AS child_table,
                COLUMN_NAME AS child_column,
                REFERENCED_TABLE_NAME AS parent_table,
                REFERENCED_COLUMN_NAME AS parent_column
            FROM information_schema.KEY_COLUMN_USAGE
            WHERE TABLE_SCHEMA = ? AND REFERENCED_TABLE_NAME IS NOT NULL
            ORDER BY TABLE_NAME, COLUMN_NAME
        "#;

        let rows = sqlx::query(query)
            .bind(self.schema.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(foreign_key_from_row).collect()
    }

    /// SQLite has no information_schema; walk sqlite_master and the table pragmas.
    async fn fetch_sqlite_catalog(
        &self,
    ) -> Result<(Vec<CatalogColumn>, Vec<ForeignKeyInput>), MetadataError> {
        let tables_query = r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
        "#;
        let table_rows = sqlx::query(tables_query).fetch_all(&self.pool).await?;

        let mut columns = Vec::new();
        let mut pending_keys = Vec::new();

        for table_row in table_rows {
            let table_name: String = table_row.try_get("name")?;
            let quoted = table_name.replace('\'', "''");

            let columns_query = format!("PRAGMA table_info('{quoted}')");
            let column_rows = sqlx::query(&columns_query).fetch_all(&self.pool).await?;
            for row in &column_rows {
                columns.push(CatalogColumn {
                    table_schema: None,
                    table_name: table_name.clone(),
                    column_name: row.try_get("name")?,
                    data_type: row.try_get("type")?,
                    nullable: !flag(row, "notnull"),
                    primary_key: flag(row, "pk"),
                });
            }

            let keys_query = format!("PRAGMA foreign_key_list('{quoted}')");
            let key_rows = sqlx::query(&keys_query).fetch_all(&self.pool).await?;
            for row in &key_rows {
                let parent_table: String = row.try_get("table")?;
                let parent_column = row.try_get::<Option<String>, _>("to").ok().flatten();
                pending_keys.push((
                    table_name.clone(),
                    row.try_get::<String, _>("from")?,
                    parent_table,
                    parent_column,
                ));
            }
        }

        // `REFERENCES parent` without a column targets the parent's primary key.
        let foreign_keys = pending_keys
            .into_iter()
            .filter_map(|(child_table, child_column, parent_table, parent_column)| {
                let parent_column = parent_column.or_else(|| {
                    columns
                        .iter()
                        .find(|c| c.table_name == parent_table && c.primary_key)
                        .map(|c| c.column_name.clone())
                })?;
                Some(ForeignKeyInput {
                    child_table,
                    child_column,
                    parent_table,
                    parent_column,
                })
            })
            .collect();

        Ok((columns, foreign_keys))
    }
}

fn column_from_row(row: &AnyRow) -> Result<CatalogColumn, MetadataError> {
    let nullable: String = row.try_get("is_nullable")?;
    Ok(CatalogColumn {
        table_schema: Some(row.try_get("table_schema")?),
        table_name: row.try_get("table_name")?,
        column_name: row.try_get("column_name")?,
        data_type: row.try_get("data_type")?,
        nullable: Nullability::Text(nullable).as_bool().unwrap_or(true),
        primary_key: flag(row, "is_primary_key"),
    })
}

fn foreign_key_from_row(row: &AnyRow) -> Result<ForeignKeyInput, MetadataError> {
    Ok(ForeignKeyInput {
        child_table: row.try_get("child_table")?,
        child_column: row.try_get("child_column")?,
        parent_table: row.try_get("parent_table")?,
        parent_column: row.try_get("parent_column")?,
    })
}

/// Reads a boolean that databases report as bool or integer.
fn flag(row: &AnyRow, column: &str) -> bool {
    if let Ok(val) = row.try_get::<bool, _>(column) {
        return val;
    }
    if let Ok(val) = row.try_get::<i32, _>(column) {
        return val != 0;
    }
    if let Ok(val) = row.try_get::<i64, _>(column) {
        return val != 0;
    }
    false
}

/// Groups catalog rows into tables, keeping first-seen table order and
/// declared column order.
pub(crate) fn group_columns(columns: Vec<CatalogColumn>) -> Vec<TableInput> {
    let mut tables: Vec<TableInput> = Vec::new();
    for column in columns {
        let position = tables.iter().position(|t| {
            t.table_name == column.table_name && t.table_schema == column.table_schema
        });
        let index = match position {
            Some(index) => index,
            None => {
                tables.push(TableInput {
                    table_name: column.table_name.clone(),
                    table_schema: column.table_schema.clone(),
                    description: None,
                    domain: None,
                    rows_per_study: None,
                    columns: Vec::new(),
                });
                tables.len() - 1
            }
        };
        tables[index].columns.push(ColumnInput {
            column_name: column.column_name,
            data_type: if column.data_type.is_empty() {
                "unknown".to_string()
            } else {
                column.data_type.to_lowercase()
            },
            is_nullable: Nullability::Flag(column.nullable),
            is_primary_key: column.primary_key,
            description: None,
        });
    }
    tables
}

/// Connects to a database and reads its structural snapshot.
///
/// Runs on a private runtime, so it must not be called from async code.
pub fn fetch_snapshot_from_database(
    url: &str,
    schema: &str,
) -> Result<(DatabaseType, SchemaSnapshot), MetadataError> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let provider = SqlxMetadataProvider::connect(url, schema).await?;
        let snapshot = provider.fetch_snapshot().await?;
        provider.pool.close().await;
        Ok((provider.db_type(), snapshot))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(table: &str, name: &str, primary_key: bool) -> CatalogColumn {
        CatalogColumn {
            table_schema: Some("ctgov".to_string()),
            table_name: table.to_string(),
            column_name: name.to_string(),
            data_type: "INTEGER".to_string(),
            nullable: !primary_key,
            primary_key,
        }
    }

    #[test]
    fn test_database_type_from_url() {
        assert_eq!(
            DatabaseType::from_url("postgres://localhost/aact"),
            Some(DatabaseType::Postgres)
        );
        assert_eq!(
            DatabaseType::from_url("postgresql://localhost/aact"),
            Some(DatabaseType::Postgres)
        );
        assert_eq!(
            DatabaseType::from_url("mariadb://localhost/aact"),
            Some(DatabaseType::Mysql)
        );
        assert_eq!(
            DatabaseType::from_url("sqlite::memory:"),
            Some(DatabaseType::Sqlite)
        );
        assert_eq!(DatabaseType::from_url("oracle://localhost/aact"), None);
    }

    #[test]
    fn test_unsupported_url_hides_credentials() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(SqlxMetadataProvider::connect(
                "oracle://admin:secret@db/aact",
                "ctgov",
            ))
            .err()
            .unwrap();
        let message = err.to_string();
        assert_eq!(message, "unsupported database URL scheme 'oracle'");
        assert!(!message.contains("secret"));
    }

    #[test]
    fn test_group_columns_keeps_declared_order() {
        let tables = group_columns(vec![
            column("studies", "nct_id", true),
            column("studies", "phase", false),
            column("conditions", "id", true),
            column("conditions", "nct_id", false),
        ]);
        let names: Vec<_> = tables.iter().map(|t| t.table_name.as_str()).collect();
        assert_eq!(names, vec!["studies", "conditions"]);
        let columns: Vec<_> = tables[0]
            .columns
            .iter()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(columns, vec!["nct_id", "phase"]);
        assert!(tables[0].columns[0].is_primary_key);
        assert_eq!(tables[0].columns[0].is_nullable, Nullability::Flag(false));
        assert_eq!(tables[0].columns[0].data_type, "integer");
    }

    #[test]
    fn test_group_columns_fills_missing_type() {
        let mut untyped = column("notes", "body", false);
        untyped.data_type.clear();
        let tables = group_columns(vec![untyped]);
        assert_eq!(tables[0].columns[0].data_type, "unknown");
    }
}
