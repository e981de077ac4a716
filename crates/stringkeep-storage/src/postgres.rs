// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client/server PostgreSQL driver.
//!
//! One `tokio_postgres::Client` per driver; its connection future runs on a
//! spawned task until [`SqlDriver::close`] aborts it.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

use stringkeep_config::PostgresSettings;
use stringkeep_core::{Backend, Row, SqlDriver, SqlValue, StoreError};

fn connect_err(e: tokio_postgres::Error) -> StoreError {
    StoreError::Connect {
        backend: Backend::Postgres,
        source: Box::new(e),
    }
}

type Param = Box<dyn ToSql + Send + Sync>;

fn to_params(args: &[SqlValue]) -> Vec<Param> {
    args.iter()
        .map(|arg| -> Param {
            match arg {
                SqlValue::Null => Box::new(None::<String>),
                SqlValue::Integer(i) => Box::new(*i),
                SqlValue::Text(s) => Box::new(s.clone()),
            }
        })
        .collect()
}

fn as_refs(params: &[Param]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|p| &**p as &(dyn ToSql + Sync))
        .collect()
}

fn decode_row(row: &tokio_postgres::Row) -> Result<Row, StoreError> {
    let mut out = Vec::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let ty = column.type_();
        let value = if *ty == Type::INT8 {
            row.try_get::<_, Option<i64>>(i)
                .map(|v| v.map_or(SqlValue::Null, SqlValue::Integer))
        } else if *ty == Type::INT4 {
            row.try_get::<_, Option<i32>>(i)
                .map(|v| v.map_or(SqlValue::Null, |v| SqlValue::Integer(v.into())))
        } else if *ty == Type::INT2 {
            row.try_get::<_, Option<i16>>(i)
                .map(|v| v.map_or(SqlValue::Null, |v| SqlValue::Integer(v.into())))
        } else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME].contains(ty) {
            row.try_get::<_, Option<String>>(i)
                .map(|v| v.map_or(SqlValue::Null, SqlValue::Text))
        } else {
            return Err(StoreError::Internal(format!(
                "unsupported column type {ty} for column `{}`",
                column.name()
            )));
        };
        out.push(value.map_err(StoreError::storage)?);
    }
    Ok(out)
}

/// PostgreSQL positional parameter: `$1`, `$2`, ...
pub fn placeholder(index: usize) -> String {
    format!("${index}")
}

/// Records table DDL with a server-assigned 64-bit id.
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
                id BIGSERIAL PRIMARY KEY,
                value TEXT NOT NULL
            )"
    )
}

/// PostgreSQL driver holding a single client connection.
pub struct PostgresDriver {
    client: Client,
    connection: Mutex<Option<JoinHandle<()>>>,
}

impl PostgresDriver {
    /// Connect with `settings` (TLS disabled) and ping the server.
    pub async fn connect(settings: &PostgresSettings) -> Result<Self, StoreError> {
        debug!(dsn = %settings, "connecting to PostgreSQL");

        let mut config = tokio_postgres::Config::new();
        config
            .user(&settings.user)
            .password(&settings.password)
            .host(&settings.host)
            .port(settings.port)
            .dbname(&settings.dbname)
            .ssl_mode(SslMode::Disable);

        let (client, connection) = config.connect(NoTls).await.map_err(connect_err)?;
        let handle = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection closed with error");
            }
        });

        let driver = Self {
            client,
            connection: Mutex::new(Some(handle)),
        };
        driver
            .client
            .simple_query("SELECT 1")
            .await
            .map_err(connect_err)?;
        Ok(driver)
    }
}

#[async_trait]
impl SqlDriver for PostgresDriver {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    fn placeholder(&self, index: usize) -> String {
        placeholder(index)
    }

    fn create_table_sql(&self, table: &str) -> String {
        create_table_sql(table)
    }

    async fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<u64, StoreError> {
        let params = to_params(args);
        self.client
            .execute(sql, &as_refs(&params))
            .await
            .map_err(StoreError::storage)
    }

    async fn query_row(&self, sql: &str, args: &[SqlValue]) -> Result<Option<Row>, StoreError> {
        let params = to_params(args);
        let row = self
            .client
            .query_opt(sql, &as_refs(&params))
            .await
            .map_err(StoreError::storage)?;
        row.as_ref().map(decode_row).transpose()
    }

    async fn query_all(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>, StoreError> {
        let params = to_params(args);
        let rows = self
            .client
            .query(sql, &as_refs(&params))
            .await
            .map_err(StoreError::storage)?;
        rows.iter().map(decode_row).collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .simple_query("SELECT 1")
            .await
            .map(|_| ())
            .map_err(StoreError::storage)
    }

    async fn close(&self) -> Result<(), StoreError> {
        if let Some(handle) = self.connection.lock().await.take() {
            handle.abort();
            debug!("PostgreSQL connection task stopped");
        }
        Ok(())
    }
}
