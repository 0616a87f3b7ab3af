//! Database access seam
//!
//! The registry never speaks a wire protocol itself. Everything it needs
//! from a server goes through [`QueryRunner`], and runners are opened
//! through a [`Connector`]. Production code plugs in a MySQL-compatible
//! client; tests plug in scripted fakes.

use async_trait::async_trait;
use std::sync::Arc;

use crate::app::models::{ConnectionLocator, ConnectionParams};
use crate::Result;

/// One cell of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
    Null,
}

impl SqlValue {
    /// The cell as text, if it holds any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The cell as an integer, parsing text cells that look numeric
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(n) => Some(*n),
            SqlValue::Text(s) => s.parse().ok(),
            SqlValue::Null => None,
        }
    }

    /// Whether the cell holds a bare number rather than a name
    pub fn is_numeric(&self) -> bool {
        match self {
            SqlValue::Int(_) => true,
            SqlValue::Text(s) => !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
            SqlValue::Null => false,
        }
    }
}

/// One result row.
pub type Row = Vec<SqlValue>;

/// A live connection to one server.
///
/// Runners are shared between every adaptor registered from the same
/// server, so statements must qualify table names with the database they
/// target. Implementations honor `wait_timeout` from the parameters they
/// were opened with and may reconnect transparently after `disconnect`
/// when `reconnect_when_lost` was requested.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Run one statement and collect every result row.
    ///
    /// `params` bind to `?` placeholders in order.
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>>;

    /// The identity of this connection
    fn locator(&self) -> ConnectionLocator;

    /// Whether the connection has no statement in flight
    fn is_idle(&self) -> bool {
        true
    }

    /// Tear the connection down; a later statement may reopen it
    fn disconnect(&self) {}
}

/// Opens query runners from connection parameters.
///
/// Connecting eagerly is part of the contract: a connector surfaces
/// authentication failures at `connect` time, not on the first statement.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, params: &ConnectionParams) -> Result<Arc<dyn QueryRunner>>;
}
