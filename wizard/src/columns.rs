//! Column questions shared by the create and alter wizards.

use etshell_core::{
    ColumnSpec, ColumnType, ConstraintSpec, ForeignKeyRef, IndexSpec, STOP_ORDINAL,
    ValidationError, catalog_menu, validate_column_name,
};
use etshell_ddl::{Assembler, unqualified};
use rand::Rng;
use tracing::debug;

use crate::console::Console;
use crate::error::Result;

/// A column collected from the user, with what it brings along.
#[derive(Debug)]
pub(crate) struct NewColumn {
    pub column: ColumnSpec,
    pub constraints: Vec<ConstraintSpec>,
    pub index: Option<IndexSpec>,
}

/// Asks for a catalog ordinal until a valid one or the stop ordinal is
/// given. Returns `None` on stop.
pub(crate) fn ask_column_type<C>(console: &mut C, label: &str) -> Result<Option<ColumnType>>
where
    C: Console + ?Sized,
{
    console.notify(&format!("{label} Adding columns:\n{}", catalog_menu()));
    loop {
        let answer = console.ask(&format!("{label} Column type: "), true)?;
        if answer == STOP_ORDINAL.to_string() {
            return Ok(None);
        }
        match ColumnType::parse_choice(&answer) {
            Some(ty) => return Ok(Some(ty)),
            None => console.notify(
                &ValidationError::InvalidChoice {
                    answer,
                    expected: format!("a number from 1 to {STOP_ORDINAL}"),
                }
                .to_string(),
            ),
        }
    }
}

/// Asks for a catalog type without the stop entry.
pub(crate) fn ask_replacement_type<C>(console: &mut C, label: &str) -> Result<ColumnType>
where
    C: Console + ?Sized,
{
    let menu: String = ColumnType::ALL
        .iter()
        .map(|ty| format!("    {}) {} ({})\n", ty.ordinal(), ty.label(), ty.description()))
        .collect();
    console.notify(&format!("{label} New type:\n{menu}"));
    loop {
        let answer = console.ask(&format!("{label} Column type: "), true)?;
        match ColumnType::parse_choice(&answer) {
            Some(ty) => return Ok(ty),
            None => console.notify(
                &ValidationError::InvalidChoice {
                    answer,
                    expected: format!("a number from 1 to {}", ColumnType::ALL.len()),
                }
                .to_string(),
            ),
        }
    }
}

/// Asks for a valid column name that `taken` does not already know.
pub(crate) fn ask_column_name<C>(
    console: &mut C,
    prompt: &str,
    taken: impl Fn(&str) -> bool,
) -> Result<String>
where
    C: Console + ?Sized,
{
    loop {
        let name = console.ask(prompt, true)?;
        if let Err(err) = validate_column_name(&name) {
            console.notify(&err.to_string());
            continue;
        }
        if taken(&name) {
            console.notify(&ValidationError::DuplicateColumn(name).to_string());
            continue;
        }
        return Ok(name);
    }
}

/// Returns `name`, compressed if it is over the limit. The user is told
/// about any change.
pub(crate) fn fit_with_notice<C, R>(
    console: &mut C,
    ddl: &mut Assembler<R>,
    kind: &str,
    name: String,
) -> String
where
    C: Console + ?Sized,
    R: Rng,
{
    let compressor = ddl.compressor();
    if compressor.fits(&name) {
        return name;
    }
    let limit = compressor.limit();
    let short = compressor.shorten(&name);
    console.notify(&format!(
        "The {kind} name {name} is longer than {limit} characters. It has been shortened to {short}."
    ));
    short
}

/// Picks the first candidate whose fitted form is free, numbering the last
/// one if every candidate is taken. The user is told when the chosen name
/// differs from the first candidate.
///
/// Compression is lossy, so distinct candidates can collide once shortened;
/// the check runs on the fitted names.
pub(crate) fn fit_unique<C, R>(
    console: &mut C,
    ddl: &mut Assembler<R>,
    kind: &str,
    candidates: &[String],
    taken: &dyn Fn(&str) -> bool,
) -> String
where
    C: Console + ?Sized,
    R: Rng,
{
    let compressor = ddl.compressor();
    let limit = compressor.limit();

    let mut chosen = None;
    let mut last = None;
    for candidate in candidates {
        let fitted = compressor.shorten(candidate);
        if !taken(&fitted) {
            chosen = Some((candidate.as_str(), fitted));
            break;
        }
        last = Some((candidate.as_str(), fitted));
    }

    let (original, name, renumbered) = match (chosen, last) {
        (Some((original, fitted)), _) => (original, fitted, false),
        (None, Some((original, fitted))) => (original, numbered(&fitted, limit, taken), true),
        (None, None) => return String::new(),
    };

    let first = candidates[0].as_str();
    if !renumbered && original == first && name != first {
        console.notify(&format!(
            "The {kind} name {first} is longer than {limit} characters. It has been shortened to {name}."
        ));
    } else if name != first {
        console.notify(&format!(
            "The {kind} name {first} is already in use. It has been renamed to {name}."
        ));
    }
    debug!(kind, original, name = %name, "Picked constraint name");
    name
}

/// Tells the user about every name the assembler shortened on its own.
pub(crate) fn announce_renames<C, R>(console: &mut C, ddl: &mut Assembler<R>)
where
    C: Console + ?Sized,
    R: Rng,
{
    let limit = ddl.compressor().limit();
    for rename in ddl.take_renames() {
        console.notify(&format!(
            "The name {} is longer than {limit} characters. It has been shortened to {}.",
            rename.original, rename.shortened
        ));
    }
}

/// `<base>_<n>` for the smallest `n` not taken, cut to `limit`.
fn numbered(base: &str, limit: usize, taken: &dyn Fn(&str) -> bool) -> String {
    (1..)
        .map(|n| {
            let suffix = format!("_{n}");
            let stem: String = base.chars().take(limit.saturating_sub(suffix.len())).collect();
            format!("{}{suffix}", stem.trim_end_matches('_'))
        })
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Walks through the questions for one column of type `column_type`.
///
/// `column_taken` and `constraint_taken` report names already in use on
/// `table`.
pub(crate) fn ask_new_column<C, R>(
    console: &mut C,
    ddl: &mut Assembler<R>,
    label: &str,
    table: &str,
    column_type: ColumnType,
    column_taken: impl Fn(&str) -> bool,
    constraint_taken: impl Fn(&str) -> bool,
) -> Result<NewColumn>
where
    C: Console + ?Sized,
    R: Rng,
{
    let name = ask_column_name(console, &format!("{label} Column name: "), column_taken)?;
    let mut column = ColumnSpec::new(&name, column_type);
    let mut constraints = Vec::new();
    let mut index = None;

    if console.confirm(&format!("{label} Not Null? (Y/N) "))? {
        column = column.not_null();
        let default = console.ask(&format!("{label} Default value: "), false)?;
        if !default.is_empty() {
            column = column.with_default(default);
        }
    }

    if console.confirm(&format!("{label} Is Foreign Key? (Y/N) "))? {
        let external_table =
            console.ask(&format!("{label} (FOREIGN KEY) External Table Name: "), true)?;
        let external_column =
            console.ask(&format!("{label} (FOREIGN KEY) External Table Column: "), true)?;
        let link_to_parent =
            console.confirm(&format!("{label} (FOREIGN KEY) Is Link to Parent Column? (Y/N) "))?;

        let constraint_name = fit_unique(
            console,
            ddl,
            "foreign key",
            &[
                ForeignKeyRef::default_name(table, unqualified(&external_table)),
                ForeignKeyRef::column_name(table, &name),
            ],
            &constraint_taken,
        );

        let reference = ForeignKeyRef {
            external_table,
            external_column,
            constraint_name,
            link_to_parent,
        };
        if link_to_parent {
            index = Some(IndexSpec::new(table, &name));
        }
        column = column.with_foreign_key(reference.clone());
        constraints.push(ConstraintSpec::ForeignKey {
            column: name.clone(),
            reference,
        });
    }

    if column_type.is_yes_no()
        && console.confirm(&format!(
            "{label} Do you want to add a Y/N check for this column? (Y/N) "
        ))?
    {
        let taken_here = |candidate: &str| {
            constraint_taken(candidate)
                || constraints
                    .iter()
                    .any(|c: &ConstraintSpec| c.name().eq_ignore_ascii_case(candidate))
        };
        let constraint_name = fit_unique(
            console,
            ddl,
            "check constraint",
            &[ConstraintSpec::check_name(table, &name)],
            &taken_here,
        );
        constraints.push(ConstraintSpec::YnCheck {
            column: name.clone(),
            constraint_name,
        });
    }

    debug!(
        table,
        column = %name,
        constraints = constraints.len(),
        indexed = index.is_some(),
        "Collected column"
    );
    Ok(NewColumn {
        column,
        constraints,
        index,
    })
}

#[cfg(test)]
mod tests {
    use etshell_core::Compressor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::console::ScriptedConsole;

    fn assembler() -> Assembler<StdRng> {
        Assembler::with_compressor(Compressor::with_rng(StdRng::seed_from_u64(5)))
    }

    #[test]
    fn test_invalid_ordinals_reprompt() {
        let mut console = ScriptedConsole::new(["0", "11", "abc", "7"]);
        let ty = ask_column_type(&mut console, "[openbravo][tst_orders]").unwrap();
        assert_eq!(ty, Some(ColumnType::Numeric));
        // One menu plus three rejections.
        assert_eq!(console.messages().len(), 4);
        assert!(console.messages()[1].contains("'0' is not a valid option"));
    }

    #[test]
    fn test_stop_ordinal_ends_collection() {
        let mut console = ScriptedConsole::new(["10"]);
        assert_eq!(ask_column_type(&mut console, "[p]").unwrap(), None);
    }

    #[test]
    fn test_replacement_type_has_no_stop_entry() {
        let mut console = ScriptedConsole::new(["10", "1"]);
        let ty = ask_replacement_type(&mut console, "[p]").unwrap();
        assert_eq!(ty, ColumnType::Id);
        assert!(!console.messages()[0].contains("Stop"));
        assert!(console.messages()[1].contains("'10' is not a valid option"));
    }

    #[test]
    fn test_column_name_rules() {
        let long = "a".repeat(31);
        let mut console = ScriptedConsole::new([long.as_str(), "bad name", "status", "note"]);
        let name = ask_column_name(&mut console, "Column name: ", |n| n == "status").unwrap();
        assert_eq!(name, "note");
        let messages = console.messages();
        assert!(messages[0].contains("31 characters"), "{}", messages[0]);
        assert!(messages[1].contains("not a valid identifier"), "{}", messages[1]);
        assert!(messages[2].contains("already exists"), "{}", messages[2]);
    }

    #[test]
    fn test_default_only_asked_for_not_null() {
        let mut ddl = assembler();
        let mut console = ScriptedConsole::new(["note", "N", "N"]);
        let new = ask_new_column(
            &mut console,
            &mut ddl,
            "[p][tst_orders]",
            "tst_orders",
            ColumnType::Text,
            |_| false,
            |_| false,
        )
        .unwrap();
        assert!(!new.column.not_null);
        assert_eq!(new.column.default_value, None);
        assert!(!console.prompts().iter().any(|p| p.contains("Default value")));
    }

    #[test]
    fn test_foreign_key_with_parent_link() {
        let mut ddl = assembler();
        let mut console = ScriptedConsole::new([
            "c_order_id",
            "Y",
            "",
            "Y",
            "public.c_order",
            "c_order_id",
            "Y",
        ]);
        let new = ask_new_column(
            &mut console,
            &mut ddl,
            "[p][tst_lines]",
            "tst_lines",
            ColumnType::Id,
            |_| false,
            |_| false,
        )
        .unwrap();

        assert!(new.column.not_null);
        assert_eq!(new.column.default_value, None);
        let reference = new.column.foreign_key.as_ref().unwrap();
        assert_eq!(reference.constraint_name, "tst_lines_c_order");
        assert_eq!(reference.external_table, "public.c_order");
        assert_eq!(new.constraints.len(), 1);
        assert_eq!(new.index, Some(IndexSpec::new("tst_lines", "c_order_id")));
        assert!(console.messages().is_empty());
    }

    #[test]
    fn test_taken_foreign_key_name_falls_back_to_column() {
        let mut ddl = assembler();
        let mut console =
            ScriptedConsole::new(["salesrep_id", "N", "Y", "ad_user", "ad_user_id", "N"]);
        let new = ask_new_column(
            &mut console,
            &mut ddl,
            "[p][tst_lines]",
            "tst_lines",
            ColumnType::Id,
            |_| false,
            |name| name == "tst_lines_ad_user",
        )
        .unwrap();
        assert_eq!(new.constraints[0].name(), "tst_lines_salesrep_id_fk");
        assert_eq!(new.index, None);
    }

    #[test]
    fn test_collision_is_checked_after_compression() {
        let first = "tst_purchase_requisition_c_order".to_string();
        let fallback = "tst_purchase_requisition_c_orderalt_id_fk".to_string();
        let mut ddl = assembler();
        // A clone draws the same random sequence, so it predicts the first
        // fitted name.
        let already_used = ddl.clone().compressor().shorten(&first);

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let name = fit_unique(
            &mut console,
            &mut ddl,
            "foreign key",
            &[first.clone(), fallback],
            &|candidate: &str| candidate == already_used,
        );

        assert_ne!(name, already_used);
        assert!(name.len() <= 30, "{name}");
        assert_eq!(console.messages().len(), 1);
        assert!(console.messages()[0].contains(&format!("{first} is already in use")));
    }

    #[test]
    fn test_every_candidate_taken_numbers_the_last() {
        let mut ddl = assembler();
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let taken = ["tst_lines_ad_user", "tst_lines_salesrep_id_fk"];
        let name = fit_unique(
            &mut console,
            &mut ddl,
            "foreign key",
            &taken.map(String::from),
            &|candidate: &str| taken.contains(&candidate),
        );
        assert_eq!(name, "tst_lines_salesrep_id_fk_1");
        assert_eq!(
            console.messages(),
            ["The foreign key name tst_lines_ad_user is already in use. It has been renamed to tst_lines_salesrep_id_fk_1."]
        );
    }

    #[test]
    fn test_numbered_names_stay_within_limit() {
        let base = "tst_abcdefghijklmnopqrstuvwxyz";
        assert_eq!(base.len(), 30);
        assert_eq!(numbered(base, 30, &|_| false), "tst_abcdefghijklmnopqrstuvwx_1");
        assert_eq!(
            numbered("tst_orders_chk", 30, &|n: &str| n == "tst_orders_chk_1"),
            "tst_orders_chk_2"
        );
    }

    #[test]
    fn test_yes_no_foreign_key_and_check_names_differ() {
        let mut ddl = assembler();
        let mut console = ScriptedConsole::new([
            "isapproved", "N", "Y", "ad_ref_list", "value", "N", "Y",
        ]);
        let new = ask_new_column(
            &mut console,
            &mut ddl,
            "[p]",
            "tst_lines",
            ColumnType::YesNo,
            |_| false,
            |name| name == "tst_lines_isapproved_chk",
        )
        .unwrap();
        let names: Vec<&str> = new.constraints.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["tst_lines_ad_ref_list", "tst_lines_isapproved_chk_1"]);
    }

    #[test]
    fn test_long_check_name_is_shortened_with_notice() {
        let mut ddl = assembler();
        let table = "tst_purchase_requisition";
        let mut console = ScriptedConsole::new(["isprocessed", "Y", "'N'", "N", "Y"]);
        let new = ask_new_column(
            &mut console,
            &mut ddl,
            "[p]",
            table,
            ColumnType::YesNo,
            |_| false,
            |_| false,
        )
        .unwrap();

        assert_eq!(new.column.default_value.as_deref(), Some("'N'"));
        let name = new.constraints[0].name();
        assert!(name.len() <= 30, "{name}");
        assert!(name.starts_with("tst_"));
        assert_eq!(console.messages().len(), 1);
        assert!(console.messages()[0].contains("shortened to"));
    }
}
