//! [`QueryExecutor`] backed by a live PostgreSQL server.
//!
//! A client is opened for every call and dropped when the call returns, so
//! no connection outlives a single statement or batch.

use std::time::Duration;

use postgres::{Client, Config, NoTls, SimpleQueryMessage};
use tracing::{debug, info, warn};

use crate::config::ShellConfig;
use crate::error::Result;
use crate::executor::{FieldDescriptor, QueryExecutor, QueryResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl From<&ShellConfig> for ConnectionSettings {
    fn from(config: &ShellConfig) -> Self {
        Self {
            host: config.db_host.clone(),
            port: config.db_port,
            user: config.db_user.clone(),
            password: config.db_pwd.clone(),
            dbname: config.pivot.clone(),
        }
    }
}

impl ConnectionSettings {
    fn to_config(&self) -> Config {
        let mut config = Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.dbname)
            .connect_timeout(CONNECT_TIMEOUT);
        config
    }
}

/// Connects per call using [`ConnectionSettings`].
#[derive(Debug, Clone)]
pub struct PgExecutor {
    settings: ConnectionSettings,
}

impl PgExecutor {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Checks the settings by running `SELECT NOW()`.
    pub fn test_connection(&mut self) -> Result<()> {
        self.execute("SELECT NOW()").map(|_| ())
    }

    fn connect(&self) -> Result<Client> {
        let s = &self.settings;
        debug!(host = %s.host, port = s.port, user = %s.user, db = %s.dbname, "Connecting");
        self.settings.to_config().connect(NoTls).map_err(|err| {
            warn!(host = %s.host, port = s.port, db = %s.dbname, error = %err, "Connection failed");
            err.into()
        })
    }
}

/// `atttypmod` and `attnum` of one table column.
const ATTRIBUTE_QUERY: &str =
    "SELECT atttypmod, attnum FROM pg_catalog.pg_attribute WHERE attrelid = $1 AND attnum = $2";

/// What the catalog knows about a column that comes straight from a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attribute {
    type_modifier: i32,
    number: i16,
}

/// The row description only carries the table OID and attribute number, so
/// the modifier is read back from `pg_attribute` on the same connection.
fn lookup_attribute(client: &mut Client, table_oid: u32, column_id: i16) -> Result<Option<Attribute>> {
    let Some(row) = client.query_opt(ATTRIBUTE_QUERY, &[&table_oid, &column_id])? else {
        return Ok(None);
    };
    Ok(Some(Attribute {
        type_modifier: row.try_get(0)?,
        number: row.try_get(1)?,
    }))
}

/// Describes result column `index`. Columns without a backing table
/// attribute (expressions, literals) get an unknown modifier and their
/// 1-based result position.
fn field_descriptor(name: &str, type_id: u32, index: usize, attribute: Option<Attribute>) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        type_id,
        type_modifier: attribute.map_or(-1, |a| a.type_modifier),
        ordinal_position: attribute
            .and_then(|a| usize::try_from(a.number).ok())
            .unwrap_or(index + 1),
    }
}

impl QueryExecutor for PgExecutor {
    fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        let mut client = self.connect()?;

        // The extended protocol describes the columns without running the
        // statement; the simple protocol then runs it and returns text.
        let statement = client.prepare(sql)?;
        let mut fields = Vec::with_capacity(statement.columns().len());
        for (i, column) in statement.columns().iter().enumerate() {
            let attribute = match (column.table_oid(), column.column_id()) {
                (Some(table_oid), Some(column_id)) => {
                    lookup_attribute(&mut client, table_oid, column_id)?
                }
                _ => None,
            };
            fields.push(field_descriptor(column.name(), column.type_().oid(), i, attribute));
        }

        let mut rows = Vec::new();
        for message in client.simple_query(sql)? {
            if let SimpleQueryMessage::Row(row) = message {
                rows.push((0..row.len()).map(|i| row.get(i).map(str::to_string)).collect());
            }
        }

        debug!(fields = fields.len(), rows = rows.len(), "Executed statement");
        Ok(QueryResult { fields, rows })
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        let mut client = self.connect()?;
        client.batch_execute(sql)?;
        info!(db = %self.settings.dbname, statements = sql.matches(';').count(), "Executed script");
        Ok(())
    }
}
