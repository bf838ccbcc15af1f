//! In-memory definition backend
//!
//! A fully in-process backend with real transaction semantics (a pending
//! catalog that only merges into the committed catalog on commit). Used by
//! the CLI's apply command and by tests; real deployments provide their own
//! `Backend` over a live connection.
//!
//! Supports deterministic fault injection (`fail_after_statements`) so
//! rollback paths can be exercised without a live database.

use std::collections::BTreeMap;

use crate::db::{Index, Table, TableSignature};
use crate::materialize::backend::Backend;
use crate::materialize::errors::{BackendError, BackendResult};
use crate::materialize::sql::{render_create_index, render_create_table};

#[derive(Debug, Clone)]
struct CatalogEntry {
    table: Table,
    indexes: Vec<Index>,
}

impl CatalogEntry {
    fn signature(&self) -> TableSignature {
        // Index membership lives on the catalog entry, not the stored
        // table value, so introspection reflects what was actually created.
        let mut table = self.table.clone();
        table.indexes = self.indexes.clone();
        table.signature()
    }
}

/// In-memory backend with a committed and a pending catalog.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    committed: BTreeMap<String, CatalogEntry>,
    pending: BTreeMap<String, CatalogEntry>,
    in_transaction: bool,
    script: Vec<String>,
    tx_script_start: usize,
    statements_executed: usize,
    fail_after: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the Nth statement after this call (1-based), for rollback tests.
    pub fn fail_after_statements(&mut self, n: usize) {
        self.fail_after = Some(self.statements_executed + n);
    }

    /// Names of committed tables, in catalog order.
    pub fn table_names(&self) -> Vec<String> {
        self.committed.keys().cloned().collect()
    }

    /// The DDL script of every committed statement, in execution order.
    pub fn script(&self) -> &[String] {
        &self.script
    }

    fn execute(&mut self, sql: String) -> BackendResult<()> {
        self.statements_executed += 1;
        if self.fail_after == Some(self.statements_executed) {
            return Err(BackendError::Execution(format!(
                "injected failure at statement {}",
                self.statements_executed
            )));
        }
        self.script.push(sql);
        Ok(())
    }

    fn require_transaction(&self) -> BackendResult<()> {
        if self.in_transaction {
            Ok(())
        } else {
            Err(BackendError::Transaction(
                "no open transaction".to_string(),
            ))
        }
    }
}

impl Backend for MemoryBackend {
    fn begin(&mut self) -> BackendResult<()> {
        if self.in_transaction {
            return Err(BackendError::Transaction(
                "transaction already open".to_string(),
            ));
        }
        self.in_transaction = true;
        self.pending.clear();
        self.tx_script_start = self.script.len();
        Ok(())
    }

    fn commit(&mut self) -> BackendResult<()> {
        self.require_transaction()?;
        let pending = std::mem::take(&mut self.pending);
        self.committed.extend(pending);
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> BackendResult<()> {
        self.require_transaction()?;
        // Drop uncommitted catalog entries and their script lines.
        self.pending.clear();
        self.script.truncate(self.tx_script_start);
        self.in_transaction = false;
        Ok(())
    }

    fn create_table(&mut self, table: &Table) -> BackendResult<()> {
        self.require_transaction()?;
        let name = table.name.clone();
        if self.committed.contains_key(&name) || self.pending.contains_key(&name) {
            return Err(BackendError::Execution(format!(
                "relation '{}' already exists",
                name
            )));
        }
        self.execute(render_create_table(table))?;
        self.pending.insert(
            name,
            CatalogEntry {
                table: table.clone(),
                indexes: Vec::new(),
            },
        );
        Ok(())
    }

    fn create_index(&mut self, index: &Index) -> BackendResult<()> {
        self.require_transaction()?;
        // Copy-on-write into the pending catalog so rollback undoes index
        // additions to committed tables too.
        if !self.pending.contains_key(&index.table) {
            match self.committed.get(&index.table) {
                Some(entry) => {
                    self.pending.insert(index.table.clone(), entry.clone());
                }
                None => {
                    return Err(BackendError::Execution(format!(
                        "relation '{}' does not exist",
                        index.table
                    )))
                }
            }
        }
        let sql = render_create_index(index);
        self.execute(sql)?;
        if let Some(entry) = self.pending.get_mut(&index.table) {
            entry.indexes.push(index.clone());
        }
        Ok(())
    }

    fn table_signature(&mut self, name: &str) -> BackendResult<Option<TableSignature>> {
        // Introspection sees committed state plus the open transaction.
        Ok(self
            .pending
            .get(name)
            .or_else(|| self.committed.get(name))
            .map(CatalogEntry::signature))
    }
}
