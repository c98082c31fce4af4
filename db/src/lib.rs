//! Database access, schema introspection and persistence for etshell.
//!
//! - [`QueryExecutor`] is the query capability handed to the wizards and the
//!   shell; [`PgExecutor`] implements it against PostgreSQL.
//! - [`describe_columns`] lists the live columns of a table.
//! - [`ShellConfig`] persists the pivot and credentials as JSON.
//! - [`save_query`] writes generated SQL to disk.
//!
//! # Quick start
//!
//! ```no_run
//! use etshell_db::{ConnectionSettings, PgExecutor, ShellConfig, describe_columns};
//!
//! let config = ShellConfig::load_or_create("./configuration.json").unwrap();
//! let mut executor = PgExecutor::new(ConnectionSettings::from(&config));
//! for column in describe_columns(&mut executor, "c_order").unwrap() {
//!     println!("{}) {} {}", column.ordinal_position, column.name, column.type_label);
//! }
//! ```

mod config;
mod error;
mod executor;
mod files;
mod introspect;
mod pg;

pub use config::{DEFAULT_CONFIG_PATH, ShellConfig};
pub use error::{ConfigError, QueryError, Result};
pub use executor::{FieldDescriptor, QueryExecutor, QueryResult};
pub use files::{save_query, save_query_in, timestamped_name};
pub use introspect::{LiveColumn, describe_columns};
pub use pg::{ConnectionSettings, PgExecutor};
