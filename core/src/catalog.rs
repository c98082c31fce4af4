//! Static column type catalog and PostgreSQL type-name lookup.
//!
//! The catalog is the only source of physical column types: the wizard
//! presents it as a numbered menu and users pick an ordinal, so the type
//! token written into DDL is always one of the entries below.
//!
//! The type-name lookup goes the other way, turning the type OID and
//! modifier reported by the server for a live column into a readable label.

use serde::{Deserialize, Serialize};

/// Ordinal that ends the column collection loop.
///
/// One past the last catalog entry.
pub const STOP_ORDINAL: u8 = 10;

/// Physical column types offered when adding a column.
///
/// # Examples
///
/// ```
/// use etshell_core::ColumnType;
///
/// let ty = ColumnType::from_ordinal(2).unwrap();
/// assert_eq!(ty, ColumnType::YesNo);
/// assert_eq!(ty.sql_type(), "character (1)");
/// assert!(ColumnType::from_ordinal(10).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// `character varying (32)`, used for ID references.
    Id,
    /// `character (1)`, used for Y/N flags.
    YesNo,
    /// `character varying (60)`.
    ShortText,
    /// `character varying (255)`.
    Text,
    /// `timestamp without time zone`.
    Timestamp,
    /// `character varying (2000)`.
    LongText,
    /// `numeric`.
    Numeric,
    /// `character varying (10)`.
    Code,
    /// `character varying (3000)`.
    ExtraLongText,
}

impl ColumnType {
    /// All catalog entries in menu order.
    pub const ALL: [ColumnType; 9] = [
        ColumnType::Id,
        ColumnType::YesNo,
        ColumnType::ShortText,
        ColumnType::Text,
        ColumnType::Timestamp,
        ColumnType::LongText,
        ColumnType::Numeric,
        ColumnType::Code,
        ColumnType::ExtraLongText,
    ];

    /// Looks up a catalog entry by its 1-based menu ordinal.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        let index = usize::from(ordinal).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Parses a user answer such as `" 3 "` into a catalog entry.
    pub fn parse_choice(answer: &str) -> Option<Self> {
        answer.trim().parse::<u8>().ok().and_then(Self::from_ordinal)
    }

    /// Returns the 1-based menu ordinal.
    pub fn ordinal(self) -> u8 {
        match self {
            ColumnType::Id => 1,
            ColumnType::YesNo => 2,
            ColumnType::ShortText => 3,
            ColumnType::Text => 4,
            ColumnType::Timestamp => 5,
            ColumnType::LongText => 6,
            ColumnType::Numeric => 7,
            ColumnType::Code => 8,
            ColumnType::ExtraLongText => 9,
        }
    }

    /// Returns the physical type token emitted into DDL.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Id => "character varying (32)",
            ColumnType::YesNo => "character (1)",
            ColumnType::ShortText => "character varying (60)",
            ColumnType::Text => "character varying (255)",
            ColumnType::Timestamp => "timestamp without time zone",
            ColumnType::LongText => "character varying (2000)",
            ColumnType::Numeric => "numeric",
            ColumnType::Code => "character varying (10)",
            ColumnType::ExtraLongText => "character varying (3000)",
        }
    }

    /// Returns the menu label, e.g. `Character Varying (32)`.
    pub fn label(self) -> &'static str {
        match self {
            ColumnType::Id => "Character Varying (32)",
            ColumnType::YesNo => "Character (1)",
            ColumnType::ShortText => "Character Varying (60)",
            ColumnType::Text => "Character Varying (255)",
            ColumnType::Timestamp => "Timestamp Without Time Zone",
            ColumnType::LongText => "Character Varying (2000)",
            ColumnType::Numeric => "Numeric",
            ColumnType::Code => "Character Varying (10)",
            ColumnType::ExtraLongText => "Character Varying (3000)",
        }
    }

    /// Returns the usage hint shown next to the label.
    pub fn description(self) -> &'static str {
        match self {
            ColumnType::Id => "Used for ID references",
            ColumnType::YesNo => "Used for Y/N values or boolean values",
            ColumnType::ShortText => "Used for short generic values",
            ColumnType::Text => "Used for long generic values",
            ColumnType::Timestamp => "Used for dates",
            ColumnType::LongText => "Used for really long generic values",
            ColumnType::Numeric => "For numeric values",
            ColumnType::Code => "For short values",
            ColumnType::ExtraLongText => "For long values",
        }
    }

    /// Whether columns of this type may carry a Y/N check constraint.
    pub fn is_yes_no(self) -> bool {
        self == ColumnType::YesNo
    }
}

/// Renders the catalog as a numbered menu, ending with the stop entry.
pub fn catalog_menu() -> String {
    let mut menu = String::new();
    for ty in ColumnType::ALL {
        menu.push_str(&format!(
            "    {}) {} ({})\n",
            ty.ordinal(),
            ty.label(),
            ty.description()
        ));
    }
    menu.push_str(&format!("    {STOP_ORDINAL}) Stop creating columns\n"));
    menu
}

/// Maps a PostgreSQL type OID to its SQL name.
pub fn type_name(type_id: u32) -> Option<&'static str> {
    let name = match type_id {
        16 => "boolean",
        17 => "bytea",
        18 => "\"char\"",
        19 => "name",
        20 => "bigint",
        21 => "smallint",
        23 => "integer",
        25 => "text",
        26 => "oid",
        114 => "json",
        700 => "real",
        701 => "double precision",
        1042 => "character",
        1043 => "character varying",
        1082 => "date",
        1083 => "time without time zone",
        1114 => "timestamp without time zone",
        1184 => "timestamp with time zone",
        1266 => "time with time zone",
        1700 => "numeric",
        2950 => "uuid",
        3802 => "jsonb",
        _ => return None,
    };
    Some(name)
}

/// Builds a human label for a live column type.
///
/// `type_modifier` is the raw `atttypmod`; `-1` means unknown or
/// unconstrained. Character types carry their length, numerics their
/// precision and scale.
///
/// # Examples
///
/// ```
/// use etshell_core::type_label;
///
/// assert_eq!(type_label(1043, 36), "character varying (32)");
/// assert_eq!(type_label(1043, -1), "character varying");
/// assert_eq!(type_label(1700, ((10 << 16) | 2) + 4), "numeric (10,2)");
/// assert_eq!(type_label(99999, -1), "unknown (oid 99999)");
/// ```
pub fn type_label(type_id: u32, type_modifier: i32) -> String {
    let Some(name) = type_name(type_id) else {
        return format!("unknown (oid {type_id})");
    };

    // Both character and numeric modifiers are offset by the varlena header size.
    let payload = type_modifier - 4;
    match type_id {
        1042 | 1043 if payload >= 0 => format!("{name} ({payload})"),
        1700 if payload >= 0 => {
            let precision = (payload >> 16) & 0xffff;
            let scale = payload & 0xffff;
            format!("{name} ({precision},{scale})")
        }
        _ => name.to_string(),
    }
}
