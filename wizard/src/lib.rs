//! Interactive wizards that turn a conversation into DDL.
//!
//! The wizards ask questions through a [`Console`], validate every answer
//! locally (re-asking with a specific message when it is wrong) and hand
//! back [`PendingDdl`] values. They never run what they build: deciding
//! whether a statement is printed, executed or saved belongs to the caller.
//!
//! - [`CreateTableWizard`]: prefix and name, then columns until the stop
//!   ordinal, producing one `CREATE TABLE` script.
//! - [`AlterTableWizard`]: one statement per call against the live columns
//!   of an existing table.
//! - [`confirm_drop`]: a confirmed `DROP TABLE`.
//!
//! # Examples
//!
//! ```
//! use etshell_core::SessionContext;
//! use etshell_wizard::{CreateTableWizard, ScriptedConsole};
//!
//! let session = SessionContext::new("openbravo", "tad");
//! let mut console = ScriptedConsole::new([
//!     "tst", "orders",
//!     "3", "status", "Y", "", "N",
//!     "10",
//! ]);
//!
//! let ddl = CreateTableWizard::new(&session).run(&mut console).unwrap();
//! assert!(ddl.text.contains("status character varying (60) NOT NULL"));
//! ```

mod alter;
mod columns;
mod console;
mod create;
mod error;
mod pending;

pub use alter::{AlterOperation, AlterTableWizard, confirm_drop};
pub use console::{Console, ScriptedConsole};
pub use create::CreateTableWizard;
pub use error::{ConsoleError, Result, WizardError};
pub use pending::PendingDdl;
