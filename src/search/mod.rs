//! Logical-name index and search over a [`MetadataSnapshot`].
//!
//! The index is rebuilt from a snapshot whenever needed; it is never stored.
//! It serves two consumers: column search by logical name, and the parser's
//! comment lookup by bare column name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::metadata::{ColumnMeta, MetadataSnapshot, TableMeta};
use crate::parser::LogicalNameLookup;

/// How a query is compared with a logical name. Both ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchMode {
    /// Whole-string equality.
    #[default]
    Exact,
    /// Substring containment.
    Partial,
}

impl MatchMode {
    fn matches(&self, logical_name: &str, query: &str) -> bool {
        let target = logical_name.to_lowercase();
        let query = query.to_lowercase();
        match self {
            MatchMode::Exact => target == query,
            MatchMode::Partial => target.contains(&query),
        }
    }
}

/// One (query, column) hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch<'s> {
    /// The query that matched; the column's logical name when listing all.
    pub query: &'s str,
    pub table: &'s TableMeta,
    pub column: &'s ColumnMeta,
}

/// Matches in query order, then snapshot order, plus the queries that
/// matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome<'s> {
    pub matches: Vec<SearchMatch<'s>>,
    pub unmatched: Vec<String>,
}

/// Lookup from column keys to columns of one snapshot.
pub struct LogicalNameIndex<'s> {
    snapshot: &'s MetadataSnapshot,
    /// `schema.table.column`, case preserved.
    by_qualified: HashMap<String, (&'s TableMeta, &'s ColumnMeta)>,
    /// Lower-cased bare column name. Later columns overwrite earlier ones.
    by_bare: HashMap<String, &'s ColumnMeta>,
}

impl<'s> LogicalNameIndex<'s> {
    pub fn build(snapshot: &'s MetadataSnapshot) -> Self {
        let mut by_qualified = HashMap::new();
        let mut by_bare = HashMap::new();

        for table in &snapshot.tables {
            for column in &table.columns {
                by_qualified.insert(column.qualified_name(), (table, column));
                by_bare.insert(column.column_name.to_lowercase(), column);
            }
        }

        Self {
            snapshot,
            by_qualified,
            by_bare,
        }
    }

    pub fn snapshot(&self) -> &'s MetadataSnapshot {
        self.snapshot
    }

    pub fn len(&self) -> usize {
        self.by_qualified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_qualified.is_empty()
    }

    /// Column by `schema.table.column` (exact case).
    pub fn get(&self, qualified_name: &str) -> Option<&'s ColumnMeta> {
        self.by_qualified.get(qualified_name).map(|(_, column)| *column)
    }

    /// Column by bare name, any case.
    pub fn get_bare(&self, column_name: &str) -> Option<&'s ColumnMeta> {
        self.by_bare.get(&column_name.to_lowercase()).copied()
    }

    /// Table that owns a `schema.table.column` key.
    pub fn table_of(&self, qualified_name: &str) -> Option<&'s TableMeta> {
        self.by_qualified.get(qualified_name).map(|(table, _)| *table)
    }

    /// Search columns by logical name.
    ///
    /// Queries are trimmed and blank ones dropped. With no queries left,
    /// every column passing the filters is returned, keyed by its own
    /// logical name. Blank filters do not restrict; the schema filter
    /// compares for equality and the table filter for containment, both
    /// ignoring case.
    pub fn search<Q: AsRef<str>>(
        &self,
        queries: &'s [Q],
        mode: MatchMode,
        schema_filter: &str,
        table_filter: &str,
    ) -> SearchOutcome<'s> {
        let candidates: Vec<&'s TableMeta> = self
            .snapshot
            .tables
            .iter()
            .filter(|t| matches_schema(&t.schema_name, schema_filter))
            .filter(|t| matches_table(&t.table_name, table_filter))
            .collect();

        let queries: Vec<&'s str> = queries
            .iter()
            .map(|q| q.as_ref().trim())
            .filter(|q| !q.is_empty())
            .collect();

        let mut outcome = SearchOutcome::default();

        if queries.is_empty() {
            for &table in &candidates {
                for column in &table.columns {
                    outcome.matches.push(SearchMatch {
                        query: column.logical_name.as_str(),
                        table,
                        column,
                    });
                }
            }
            return outcome;
        }

        for query in queries {
            let before = outcome.matches.len();
            for &table in &candidates {
                for column in table
                    .columns
                    .iter()
                    .filter(|c| mode.matches(&c.logical_name, query))
                {
                    outcome.matches.push(SearchMatch {
                        query,
                        table,
                        column,
                    });
                }
            }
            if outcome.matches.len() == before {
                outcome.unmatched.push(query.to_string());
            }
        }

        outcome
    }
}

impl LogicalNameLookup for LogicalNameIndex<'_> {
    fn logical_name(&self, key: &str) -> Option<&str> {
        self.by_bare.get(key).map(|c| c.logical_name.as_str())
    }
}

fn matches_schema(schema: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || schema.to_lowercase() == filter.to_lowercase()
}

fn matches_table(table: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || table.to_lowercase().contains(&filter.to_lowercase())
}
