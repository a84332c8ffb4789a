//! In-memory catalog used by the metadata integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use schemadoc::config::{ConnectionParams, Credentials};
use schemadoc::metadata::{
    CatalogColumn, CatalogConnector, CatalogError, CatalogResult, CatalogSession, CatalogTable,
    ColumnDescription, TableDescription,
};
use schemadoc::worker::WorkerError;

#[derive(Debug, Default)]
pub struct Calls {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub description_queries: AtomicUsize,
    pub column_queries: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
struct Catalog {
    tables: Vec<(CatalogTable, Vec<CatalogColumn>)>,
    table_descriptions: Vec<TableDescription>,
    column_descriptions: Vec<ColumnDescription>,
    fail_open: bool,
    fail_list_columns: bool,
    fail_ping: bool,
}

/// A connector serving a fixed catalog. Clones share call counters.
#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    catalog: Arc<Catalog>,
    pub calls: Arc<Calls>,
}

pub struct FakeSession {
    catalog: Arc<Catalog>,
    calls: Arc<Calls>,
}

#[derive(Debug, Default)]
pub struct FakeCatalogBuilder {
    catalog: Catalog,
}

impl FakeCatalog {
    pub fn builder() -> FakeCatalogBuilder {
        FakeCatalogBuilder::default()
    }
}

impl FakeCatalogBuilder {
    pub fn table(mut self, schema: Option<&str>, name: &str, columns: Vec<CatalogColumn>) -> Self {
        self.catalog.tables.push((
            CatalogTable {
                schema: schema.map(str::to_string),
                name: name.to_string(),
                remarks: None,
            },
            columns,
        ));
        self
    }

    pub fn table_description(mut self, schema: &str, table: &str, text: &str) -> Self {
        self.catalog.table_descriptions.push(TableDescription {
            schema: schema.to_string(),
            table: table.to_string(),
            description: Some(text.to_string()),
        });
        self
    }

    pub fn column_description(
        mut self,
        schema: &str,
        table: &str,
        column: &str,
        text: &str,
    ) -> Self {
        self.catalog.column_descriptions.push(ColumnDescription {
            schema: schema.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            description: Some(text.to_string()),
        });
        self
    }

    pub fn fail_open(mut self) -> Self {
        self.catalog.fail_open = true;
        self
    }

    pub fn fail_list_columns(mut self) -> Self {
        self.catalog.fail_list_columns = true;
        self
    }

    pub fn fail_ping(mut self) -> Self {
        self.catalog.fail_ping = true;
        self
    }

    pub fn build(self) -> FakeCatalog {
        FakeCatalog {
            catalog: Arc::new(self.catalog),
            calls: Arc::new(Calls::default()),
        }
    }
}

pub fn column(name: &str, type_code: i32, type_name: &str) -> CatalogColumn {
    CatalogColumn {
        name: name.to_string(),
        type_code,
        type_name: Some(type_name.to_string()),
        ..Default::default()
    }
}

pub fn params() -> ConnectionParams {
    ConnectionParams::new("localhost", 1433, "sales", "reader")
}

pub fn credentials() -> Credentials {
    Credentials::password("secret")
}

#[async_trait]
impl CatalogConnector for FakeCatalog {
    type Session = FakeSession;

    async fn open(
        &self,
        _params: &ConnectionParams,
        _credentials: &Credentials,
    ) -> CatalogResult<FakeSession> {
        self.calls.opens.fetch_add(1, Ordering::SeqCst);
        if self.catalog.fail_open {
            let login = WorkerError::from_code("LOGIN_FAILED", "login failed for user 'reader'");
            return Err(login.into());
        }
        Ok(FakeSession {
            catalog: Arc::clone(&self.catalog),
            calls: Arc::clone(&self.calls),
        })
    }
}

#[async_trait]
impl CatalogSession for FakeSession {
    async fn table_descriptions(&mut self) -> CatalogResult<Vec<TableDescription>> {
        self.calls.description_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.catalog.table_descriptions.clone())
    }

    async fn column_descriptions(&mut self) -> CatalogResult<Vec<ColumnDescription>> {
        self.calls.description_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.catalog.column_descriptions.clone())
    }

    async fn list_tables(&mut self) -> CatalogResult<Vec<CatalogTable>> {
        Ok(self.catalog.tables.iter().map(|(t, _)| t.clone()).collect())
    }

    async fn list_columns(
        &mut self,
        _schema: &str,
        table: &str,
    ) -> CatalogResult<Vec<CatalogColumn>> {
        self.calls.column_queries.fetch_add(1, Ordering::SeqCst);
        if self.catalog.fail_list_columns {
            return Err(CatalogError::other("permission denied on sys.columns"));
        }
        Ok(self
            .catalog
            .tables
            .iter()
            .find(|(t, _)| t.name == table)
            .map(|(_, columns)| columns.clone())
            .unwrap_or_default())
    }

    async fn ping(&mut self) -> CatalogResult<()> {
        if self.catalog.fail_ping {
            return Err(CatalogError::other("connection reset"));
        }
        Ok(())
    }

    async fn close(&mut self) -> CatalogResult<()> {
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
