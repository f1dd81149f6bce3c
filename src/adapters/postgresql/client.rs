//! PostgreSQL client implementation
//!
//! This module provides the pooled client that reads table pages.

use super::rows::rows_to_batch;
use crate::adapters::traits::PageFetcher;
use crate::config::PostgresSourceConfig;
use crate::domain::{AnonymizeError, Result, SourceError};
use crate::frame::Batch;
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for colmask
///
/// Holds a connection pool and the table being read.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: PostgresSourceConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// Connections are opened lazily on the first query.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed or the pool
    /// cannot be built.
    pub fn new(config: PostgresSourceConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config =
            config.uri.expose_secret().as_ref().parse().map_err(|e| {
                AnonymizeError::Configuration(format!(
                    "Invalid PostgreSQL connection string: {}",
                    e
                ))
            })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                SourceError::ConnectionFailed(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| SourceError::ConnectionFailed(format!("Connection test failed: {}", e)))?;

        tracing::info!(
            database = %self.connection_string_safe(),
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            SourceError::ConnectionFailed(format!("Failed to get connection from pool: {}", e))
                .into()
        })
    }

    /// Execute a query under the configured statement timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the query fails.
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.execute(&timeout_query, &[]).await.map_err(|e| {
            SourceError::QueryFailed(format!("Failed to set statement timeout: {}", e))
        })?;

        client
            .query(query, params)
            .await
            .map_err(|e| SourceError::QueryFailed(format!("{}: {}", query, e)).into())
    }

    /// SQL for one page
    pub fn page_query(&self, limit: usize, offset: usize) -> String {
        page_query(&self.config.table, self.config.order_by.as_deref(), limit, offset)
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> String {
        redact_uri(self.config.uri.expose_secret().as_ref())
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

#[async_trait]
impl PageFetcher for PostgreSQLClient {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Batch> {
        let sql = self.page_query(limit, offset);
        tracing::debug!(sql = %sql, "Fetching page");
        let rows = self.query(&sql, &[]).await?;
        rows_to_batch(&rows, offset)
    }

    fn describe(&self) -> String {
        format!("{} table {}", self.connection_string_safe(), self.config.table)
    }
}

/// `SELECT * FROM <table> [ORDER BY <col>] LIMIT <limit> OFFSET <offset>`
///
/// Identifiers are validated by the configuration layer.
pub fn page_query(table: &str, order_by: Option<&str>, limit: usize, offset: usize) -> String {
    match order_by {
        Some(column) => format!(
            "SELECT * FROM {} ORDER BY {} LIMIT {} OFFSET {}",
            table, column, limit, offset
        ),
        None => format!("SELECT * FROM {} LIMIT {} OFFSET {}", table, limit, offset),
    }
}

/// Connection URI with any credentials replaced by `***`
pub fn redact_uri(uri: &str) -> String {
    let (scheme, rest) = uri.split_once("://").unwrap_or(("postgresql", uri));
    match rest.rsplit_once('@') {
        Some((_, host)) => format!("{}://***@{}", scheme, host),
        None => format!("{}://{}", scheme, rest),
    }
}
