//! Schema introspection.
//!
//! One fetch is one pass over one connection:
//!
//! 1. open the session;
//! 2. load table and column descriptions with two bulk queries;
//! 3. list tables and views, then the columns of each;
//! 4. resolve types, logical names and identifiers per column;
//! 5. close the session on every path and return a sorted snapshot.
//!
//! Nothing is written to the source database.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::catalog::{CatalogColumn, CatalogConnector, CatalogResult, CatalogSession};
use super::error::{FetchError, FetchResult};
use super::types::{ColumnMeta, MetadataSnapshot, TableMeta};
use crate::config::{ConnectionParams, Credentials};
use crate::naming::to_camel_case;
use crate::typemap::{map_native_type, type_code_name};

/// Schema assumed when the catalog reports none.
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Builds [`MetadataSnapshot`]s through a [`CatalogConnector`].
pub struct SchemaIntrospector<C> {
    connector: C,
    default_schema: String,
}

impl<C: CatalogConnector> SchemaIntrospector<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            default_schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    /// Override the schema used for tables listed without one.
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }

    /// Fetch a complete snapshot.
    ///
    /// Open failures are [`FetchError::Connection`]; any later catalog
    /// failure is [`FetchError::Introspection`]. No partial snapshot is ever
    /// returned.
    pub async fn fetch(
        &self,
        profile_id: &str,
        params: &ConnectionParams,
        credentials: &Credentials,
    ) -> FetchResult<MetadataSnapshot> {
        info!(profile_id, target = %params.display_string(), "fetching metadata");

        let mut session = self
            .connector
            .open(params, credentials)
            .await
            .map_err(FetchError::Connection)?;

        let result = self.introspect(&mut session).await;
        close_quietly(&mut session).await;
        let tables = result.map_err(FetchError::Introspection)?;

        let snapshot = MetadataSnapshot::new(profile_id, &params.database, tables);
        info!(
            profile_id,
            tables = snapshot.tables.len(),
            columns = snapshot.column_count(),
            "fetched metadata"
        );
        Ok(snapshot)
    }

    /// Open a connection, run `SELECT 1`, and close it.
    pub async fn test_connection(
        &self,
        params: &ConnectionParams,
        credentials: &Credentials,
    ) -> FetchResult<()> {
        let mut session = self
            .connector
            .open(params, credentials)
            .await
            .map_err(FetchError::Connection)?;
        let result = session.ping().await;
        close_quietly(&mut session).await;
        result.map_err(FetchError::Connection)
    }

    async fn introspect(&self, session: &mut C::Session) -> CatalogResult<Vec<TableMeta>> {
        let table_descriptions: HashMap<String, String> = session
            .table_descriptions()
            .await?
            .into_iter()
            .filter_map(|d| {
                non_blank(d.description).map(|text| (format!("{}.{}", d.schema, d.table), text))
            })
            .collect();
        let column_descriptions: HashMap<String, String> = session
            .column_descriptions()
            .await?
            .into_iter()
            .filter_map(|d| {
                non_blank(d.description)
                    .map(|text| (format!("{}.{}.{}", d.schema, d.table, d.column), text))
            })
            .collect();
        debug!(
            tables = table_descriptions.len(),
            columns = column_descriptions.len(),
            "loaded descriptions"
        );

        let listed = session.list_tables().await?;
        let mut tables = Vec::with_capacity(listed.len());
        for table in listed {
            let schema = non_blank(table.schema).unwrap_or_else(|| self.default_schema.clone());
            let table_key = format!("{}.{}", schema, table.name);

            let columns = session
                .list_columns(&schema, &table.name)
                .await?
                .into_iter()
                .map(|column| {
                    let key = format!("{}.{}", table_key, column.name);
                    let annotation = column_descriptions.get(&key).map(String::as_str);
                    build_column(&schema, &table.name, column, annotation)
                })
                .collect();

            tables.push(TableMeta {
                table_description: table_descriptions.get(&table_key).cloned(),
                schema_name: schema,
                table_name: table.name,
                columns,
            });
        }

        Ok(tables)
    }
}

async fn close_quietly<S: CatalogSession>(session: &mut S) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close catalog session");
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve one driver column into a [`ColumnMeta`].
///
/// The description is the annotation if present, else the driver remarks;
/// the logical name is the description, else the column name.
pub fn build_column(
    schema: &str,
    table: &str,
    column: CatalogColumn,
    annotation: Option<&str>,
) -> ColumnMeta {
    let jdbc_type = type_code_name(column.type_code);
    let db_type_name = non_blank(column.type_name).unwrap_or_else(|| jdbc_type.clone());
    let types = map_native_type(column.type_code, &db_type_name);

    let column_description = annotation
        .map(str::to_string)
        .or_else(|| non_blank(column.remarks));
    let logical_name = column_description
        .clone()
        .unwrap_or_else(|| column.name.clone());

    ColumnMeta {
        schema_name: schema.to_string(),
        table_name: table.to_string(),
        camel_case_name: to_camel_case(&column.name),
        column_name: column.name,
        column_description,
        logical_name,
        db_type_name,
        jdbc_type,
        types,
        column_size: column.column_size,
        decimal_digits: column.decimal_digits,
        char_octet_length: column.char_octet_length,
        column_default: column.column_default,
    }
}
