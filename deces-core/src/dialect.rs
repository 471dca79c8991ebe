//! Historical schema dialects of the INSEE death files.
//!
//! Each era of publication used a different column layout:
//! - 1975–1997: fixed-width anonymous detail lines, no header;
//! - 1998–2018: semicolon-delimited anonymous detail CSV with split
//!   year/month/day date columns;
//! - 2019–: the nominative "personnes décédées" CSV with names, compact
//!   `YYYYMMDD` dates, and an act number.
//!
//! A dialect is an immutable declarative descriptor — delimiter or field
//! widths, character encoding, the column-to-canonical mapping, and one date
//! rule per date field. Adding an era means adding one descriptor here; the
//! normalizer never branches on years or column names itself.

use encoding_rs::Encoding;

/// First year the detail files switched from fixed-width text to CSV.
pub const FIRST_CSV_YEAR: i32 = 1998;

/// First year of the nominative "personnes décédées" files.
pub const NOMINATIVE_FROM: i32 = 2019;

/// Canonical text fields a dialect column can map into.
///
/// Dates are not listed here — they go through [`DateRule`] because two of
/// the three eras reconstruct them from split sub-fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Nom,
    Prenoms,
    Sexe,
    CommuneDeces,
    DepartementDeces,
    RegionDeces,
    CommuneDomicile,
    CommuneNaissance,
    PaysNaissance,
    NumeroActe,
}

/// How rows are physically laid out in the decoded text.
#[derive(Debug, Clone, Copy)]
pub enum RowLayout {
    /// Delimited rows with a header line naming the columns.
    Delimited { delimiter: u8 },
    /// Fixed-width rows with no header; columns are declared character
    /// ranges (start offset and width, in characters after decoding).
    FixedWidth { fields: &'static [FixedField] },
}

/// One declared column of a fixed-width layout.
#[derive(Debug, Clone, Copy)]
pub struct FixedField {
    pub name: &'static str,
    pub start: usize,
    pub len: usize,
}

/// How a dialect encodes a calendar date.
#[derive(Debug, Clone, Copy)]
pub enum DateRule {
    /// A single `YYYYMMDD` column. Partially-zeroed values (`19370000`)
    /// fail calendar validation and yield null.
    Compact(&'static str),
    /// Separate year/month/day columns, composed into an ISO date only when
    /// all three are present and form a valid calendar date.
    Composite {
        year: &'static str,
        month: &'static str,
        day: &'static str,
    },
}

/// Immutable descriptor for one historical column layout.
pub struct SchemaDialect {
    pub name: &'static str,
    pub encoding: &'static Encoding,
    pub layout: RowLayout,
    /// Whether this era publishes name fields at all. Eras without names
    /// produce `None` ("unknown"), never an empty string.
    pub has_names: bool,
    /// Source column name per canonical field. Fields with no entry are
    /// absent from this era and stay null.
    pub columns: &'static [(Field, &'static str)],
    pub date_naissance: DateRule,
    pub date_deces: DateRule,
}

impl SchemaDialect {
    /// Source column mapped to `field`, if this era declares one.
    pub fn column_for(&self, field: Field) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, col)| *col)
    }
}

/// Fixed-width anonymous detail lines, 1975–1997.
///
/// No names, no act number, no region code. Both dates are split into
/// year/month/day sub-fields.
pub static FIXED_1975: SchemaDialect = SchemaDialect {
    name: "detail-fixe-1975",
    encoding: encoding_rs::WINDOWS_1252,
    layout: RowLayout::FixedWidth {
        fields: &[
            FixedField { name: "SEXE", start: 0, len: 1 },
            FixedField { name: "ANAIS", start: 1, len: 4 },
            FixedField { name: "MNAIS", start: 5, len: 2 },
            FixedField { name: "JNAIS", start: 7, len: 2 },
            FixedField { name: "COMNAIS", start: 9, len: 5 },
            FixedField { name: "PAYSNAIS", start: 14, len: 5 },
            FixedField { name: "ADEC", start: 19, len: 4 },
            FixedField { name: "MDEC", start: 23, len: 2 },
            FixedField { name: "JDEC", start: 25, len: 2 },
            FixedField { name: "DEPDEC", start: 27, len: 2 },
            FixedField { name: "COMDEC", start: 29, len: 5 },
            FixedField { name: "COMDOM", start: 34, len: 5 },
        ],
    },
    has_names: false,
    columns: &[
        (Field::Sexe, "SEXE"),
        (Field::CommuneNaissance, "COMNAIS"),
        (Field::PaysNaissance, "PAYSNAIS"),
        (Field::DepartementDeces, "DEPDEC"),
        (Field::CommuneDeces, "COMDEC"),
        (Field::CommuneDomicile, "COMDOM"),
    ],
    date_naissance: DateRule::Composite {
        year: "ANAIS",
        month: "MNAIS",
        day: "JNAIS",
    },
    date_deces: DateRule::Composite {
        year: "ADEC",
        month: "MDEC",
        day: "JDEC",
    },
};

/// Semicolon-delimited anonymous detail CSV, 1998–2018.
///
/// Same anonymous content as the fixed-width era plus the region code,
/// with a header row.
pub static DETAIL_1998: SchemaDialect = SchemaDialect {
    name: "detail-csv-1998",
    encoding: encoding_rs::WINDOWS_1252,
    layout: RowLayout::Delimited { delimiter: b';' },
    has_names: false,
    columns: &[
        (Field::Sexe, "SEXE"),
        (Field::CommuneNaissance, "COMNAIS"),
        (Field::PaysNaissance, "PAYSNAIS"),
        (Field::DepartementDeces, "DEPDEC"),
        (Field::CommuneDeces, "COMDEC"),
        (Field::RegionDeces, "REGDEC"),
        (Field::CommuneDomicile, "COMDOM"),
    ],
    date_naissance: DateRule::Composite {
        year: "ANAIS",
        month: "MNAIS",
        day: "JNAIS",
    },
    date_deces: DateRule::Composite {
        year: "ADEC",
        month: "MDEC",
        day: "JDEC",
    },
};

/// Nominative "personnes décédées" CSV, 2019 onward.
///
/// Names, act number, compact `YYYYMMDD` dates. `Lieu naissance` carries the
/// birth place label (the country for foreign births) and lands in the same
/// canonical field as the older eras' PAYSNAIS.
pub static NOMINATIF_2019: SchemaDialect = SchemaDialect {
    name: "nominatif-2019",
    encoding: encoding_rs::WINDOWS_1252,
    layout: RowLayout::Delimited { delimiter: b';' },
    has_names: true,
    columns: &[
        (Field::Nom, "Nom"),
        (Field::Prenoms, "Prénoms"),
        (Field::Sexe, "Sexe"),
        (Field::CommuneNaissance, "Code lieu naissance"),
        (Field::PaysNaissance, "Lieu naissance"),
        (Field::CommuneDeces, "Code lieu décès"),
        (Field::NumeroActe, "Numéro acte"),
    ],
    date_naissance: DateRule::Compact("Date naissance"),
    date_deces: DateRule::Compact("Date décès"),
};

/// Select the dialect in force for a given publication year.
pub fn dialect_for_year(year: i32) -> &'static SchemaDialect {
    if year >= NOMINATIVE_FROM {
        &NOMINATIF_2019
    } else if year >= FIRST_CSV_YEAR {
        &DETAIL_1998
    } else {
        &FIXED_1975
    }
}
