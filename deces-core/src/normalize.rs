//! Record normalization — parses decoded text under a schema dialect into
//! canonical records.
//!
//! Failure containment is row-level: a malformed row degrades its affected
//! fields to null (or is skipped when it cannot be split at all) and parsing
//! continues. The normalizer itself never fails a period.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::dialect::{DateRule, Field, RowLayout, SchemaDialect};
use crate::record::{CanonicalRecord, Sexe};

/// Output of one normalization pass.
#[derive(Debug)]
pub struct Normalized {
    pub records: Vec<CanonicalRecord>,
    pub stats: NormalizeStats,
}

/// Row accounting for progress reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeStats {
    /// Data rows seen (header excluded).
    pub rows: usize,
    /// Rows that could not be split into fields at all and were skipped.
    pub skipped_rows: usize,
}

/// Parse decoded text under `dialect`, producing one canonical record per
/// data row. `annee` is the period year stamped on every record.
pub fn normalize(text: &str, dialect: &SchemaDialect, annee: i32) -> Normalized {
    match dialect.layout {
        RowLayout::Delimited { delimiter } => normalize_delimited(text, dialect, delimiter, annee),
        RowLayout::FixedWidth { fields } => normalize_fixed(text, dialect, fields, annee),
    }
}

fn normalize_delimited(
    text: &str,
    dialect: &SchemaDialect,
    delimiter: u8,
    annee: i32,
) -> Normalized {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    // Header-name → column-index map. A file whose header lacks a mapped
    // column simply yields null for that field on every row.
    let header_index: HashMap<String, usize> = match reader.headers() {
        Ok(headers) => headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect(),
        Err(_) => HashMap::new(),
    };

    let mut records = Vec::new();
    let mut stats = NormalizeStats::default();

    for row in reader.records() {
        stats.rows += 1;
        let row = match row {
            Ok(row) => row,
            Err(_) => {
                stats.skipped_rows += 1;
                continue;
            }
        };

        let get = |col: &'static str| -> Option<String> {
            header_index
                .get(col)
                .and_then(|&i| row.get(i))
                .map(|v| v.trim().to_string())
        };
        records.push(build_record(dialect, annee, get));
    }

    Normalized { records, stats }
}

fn normalize_fixed(
    text: &str,
    dialect: &SchemaDialect,
    fields: &'static [crate::dialect::FixedField],
    annee: i32,
) -> Normalized {
    let mut records = Vec::new();
    let mut stats = NormalizeStats::default();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        stats.rows += 1;

        // Character offsets, not byte offsets: the decoded text may contain
        // accented characters from the Latin-1 payload.
        let chars: Vec<char> = line.chars().collect();
        let get = |col: &'static str| -> Option<String> {
            let field = fields.iter().find(|f| f.name == col)?;
            if field.start >= chars.len() {
                return None;
            }
            let end = (field.start + field.len).min(chars.len());
            Some(chars[field.start..end].iter().collect::<String>().trim().to_string())
        };
        records.push(build_record(dialect, annee, get));
    }

    Normalized { records, stats }
}

/// Assemble one canonical record from a per-row column getter.
///
/// `get` returns the trimmed raw value for a declared source column, or
/// `None` when the column is missing from the header or the row is short.
fn build_record(
    dialect: &SchemaDialect,
    annee: i32,
    get: impl Fn(&'static str) -> Option<String>,
) -> CanonicalRecord {
    // A declared-but-empty name is "known empty" (Some("")); an era without
    // name columns leaves the field null ("unknown"). Other text fields have
    // no such distinction and collapse empty values to null.
    let name_field = |field: Field| -> Option<String> {
        dialect.column_for(field).and_then(|col| get(col))
    };
    let text_field = |field: Field| -> Option<String> {
        dialect
            .column_for(field)
            .and_then(|col| get(col))
            .filter(|v| !v.is_empty())
    };

    let sexe = dialect
        .column_for(Field::Sexe)
        .and_then(|col| get(col))
        .map(|raw| Sexe::parse(&raw))
        .unwrap_or(Sexe::Inconnu);

    CanonicalRecord {
        nom: name_field(Field::Nom),
        prenoms: name_field(Field::Prenoms),
        sexe,
        date_naissance: resolve_date(&dialect.date_naissance, &get),
        date_deces: resolve_date(&dialect.date_deces, &get),
        commune_deces: text_field(Field::CommuneDeces),
        departement_deces: text_field(Field::DepartementDeces),
        region_deces: text_field(Field::RegionDeces),
        commune_domicile: text_field(Field::CommuneDomicile),
        commune_naissance: text_field(Field::CommuneNaissance),
        pays_naissance: text_field(Field::PaysNaissance),
        numero_acte: text_field(Field::NumeroActe),
        annee,
    }
}

/// Resolve a date rule against a row. Any malformed or incomplete input
/// yields `None` — never a partially-formed date, never an error.
fn resolve_date(
    rule: &DateRule,
    get: &impl Fn(&'static str) -> Option<String>,
) -> Option<NaiveDate> {
    match rule {
        DateRule::Compact(col) => parse_compact_date(&get(col)?),
        DateRule::Composite { year, month, day } => {
            let y: i32 = get(year)?.parse().ok()?;
            let m: u32 = get(month)?.parse().ok()?;
            let d: u32 = get(day)?.parse().ok()?;
            // from_ymd_opt rejects month 0, day 0, and impossible dates.
            NaiveDate::from_ymd_opt(y, m, d)
        }
    }
}

/// Parse a compact `YYYYMMDD` date. INSEE pads unknown components with
/// zeroes (`19370000`), which fails calendar validation and yields `None`.
fn parse_compact_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DETAIL_1998, FIXED_1975, NOMINATIF_2019};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const NOMINATIF_HEADER: &str = "Nom;Prénoms;Sexe;Date naissance;Code lieu naissance;Lieu naissance;Date décès;Code lieu décès;Numéro acte";

    #[test]
    fn nominative_row_maps_every_field() {
        let text = format!(
            "{NOMINATIF_HEADER}\nDURAND;MARIE LOUISE;2;19340227;75112;PARIS;20230115;69381;117\n"
        );
        let out = normalize(&text, &NOMINATIF_2019, 2023);

        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.nom.as_deref(), Some("DURAND"));
        assert_eq!(r.prenoms.as_deref(), Some("MARIE LOUISE"));
        assert_eq!(r.sexe, Sexe::Feminin);
        assert_eq!(r.date_naissance, Some(ymd(1934, 2, 27)));
        assert_eq!(r.date_deces, Some(ymd(2023, 1, 15)));
        assert_eq!(r.commune_naissance.as_deref(), Some("75112"));
        assert_eq!(r.pays_naissance.as_deref(), Some("PARIS"));
        assert_eq!(r.commune_deces.as_deref(), Some("69381"));
        assert_eq!(r.numero_acte.as_deref(), Some("117"));
        assert_eq!(r.annee, 2023);
        // Fields this era does not publish stay null.
        assert_eq!(r.departement_deces, None);
        assert_eq!(r.region_deces, None);
        assert_eq!(r.commune_domicile, None);
    }

    #[test]
    fn zero_padded_compact_date_degrades_to_null() {
        let text = format!("{NOMINATIF_HEADER}\nMARTIN;JEAN;1;19370000;;;20221203;75056;42\n");
        let out = normalize(&text, &NOMINATIF_2019, 2022);

        let r = &out.records[0];
        assert_eq!(r.date_naissance, None);
        assert_eq!(r.date_deces, Some(ymd(2022, 12, 3)));
    }

    #[test]
    fn known_empty_name_is_distinct_from_unknown() {
        let text = format!("{NOMINATIF_HEADER}\n;JEAN;1;;;;20221203;75056;42\n");
        let nominative = normalize(&text, &NOMINATIF_2019, 2022);
        // Declared column, empty value: known empty.
        assert_eq!(nominative.records[0].nom.as_deref(), Some(""));

        let detail = "ADEC;MDEC;JDEC;ANAIS;MNAIS;JNAIS;SEXE;DEPDEC;COMDEC;REGDEC;COMDOM;COMNAIS;PAYSNAIS\n2001;06;09;1921;03;30;2;69;69381;84;69381;69003;FRANCE\n";
        let anonymous = normalize(detail, &DETAIL_1998, 2001);
        // Era without name columns: unknown.
        assert_eq!(anonymous.records[0].nom, None);
    }

    #[test]
    fn composite_dates_compose_only_when_fully_valid() {
        let header = "ADEC;MDEC;JDEC;ANAIS;MNAIS;JNAIS;SEXE;DEPDEC;COMDEC;REGDEC;COMDOM;COMNAIS;PAYSNAIS";
        let text = format!(
            "{header}\n\
             2023;4;7;1950;10;23;1;75;75114;11;75112;75109;FRANCE\n\
             2023;;7;1950;10;23;2;75;75114;11;75112;75109;FRANCE\n\
             2023;11;00;1950;10;23;1;75;75114;11;75112;75109;FRANCE\n"
        );
        let out = normalize(&text, &DETAIL_1998, 2023);

        assert_eq!(out.records.len(), 3);
        // Single-digit month and day are zero-padded through NaiveDate.
        assert_eq!(out.records[0].date_deces, Some(ymd(2023, 4, 7)));
        assert_eq!(
            out.records[0].date_deces.unwrap().to_string(),
            "2023-04-07"
        );
        // Missing month → null; the row itself still converts.
        assert_eq!(out.records[1].date_deces, None);
        assert_eq!(out.records[1].date_naissance, Some(ymd(1950, 10, 23)));
        // Day "00" is not a calendar date → null.
        assert_eq!(out.records[2].date_deces, None);
    }

    #[test]
    fn short_row_degrades_fields_and_continues() {
        let text = format!(
            "{NOMINATIF_HEADER}\n\
             DUPONT;PIERRE;1;19401112;13055;MARSEILLE;20230601;13055;9\n\
             BROKEN;ROW\n\
             LEROY;ANNE;2;19520704;59350;LILLE;20230602;59350;10\n"
        );
        let out = normalize(&text, &NOMINATIF_2019, 2023);

        assert_eq!(out.stats.rows, 3);
        assert_eq!(out.records.len(), 3);
        let broken = &out.records[1];
        assert_eq!(broken.nom.as_deref(), Some("BROKEN"));
        assert_eq!(broken.date_deces, None);
        assert_eq!(broken.numero_acte, None);
        // The rows around the malformed one are unaffected.
        assert_eq!(out.records[2].nom.as_deref(), Some("LEROY"));
    }

    #[test]
    fn fixed_width_line_parses_by_character_ranges() {
        // SEXE ANAIS MNAIS JNAIS COMNAIS PAYSNAIS ADEC MDEC JDEC DEPDEC COMDEC COMDOM
        let line = "11923051775112     19831102757511475112";
        let out = normalize(line, &FIXED_1975, 1983);

        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.sexe, Sexe::Masculin);
        assert_eq!(r.date_naissance, Some(ymd(1923, 5, 17)));
        assert_eq!(r.date_deces, Some(ymd(1983, 11, 2)));
        assert_eq!(r.commune_naissance.as_deref(), Some("75112"));
        assert_eq!(r.pays_naissance, None); // blank range → null
        assert_eq!(r.departement_deces.as_deref(), Some("75"));
        assert_eq!(r.commune_deces.as_deref(), Some("75114"));
        assert_eq!(r.commune_domicile.as_deref(), Some("75112"));
        assert_eq!(r.nom, None);
        assert_eq!(r.numero_acte, None);
    }

    #[test]
    fn truncated_fixed_width_line_yields_nulls_not_errors() {
        let line = "2192305";
        let out = normalize(line, &FIXED_1975, 1980);

        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.sexe, Sexe::Feminin);
        assert_eq!(r.date_naissance, None);
        assert_eq!(r.date_deces, None);
        assert_eq!(r.commune_deces, None);
    }

    #[test]
    fn every_era_produces_the_full_field_set() {
        let nominative = format!("{NOMINATIF_HEADER}\nX;Y;1;19500101;a;b;20200101;c;1\n");
        let detail = "ADEC;MDEC;JDEC;ANAIS;MNAIS;JNAIS;SEXE;DEPDEC;COMDEC;REGDEC;COMDOM;COMNAIS;PAYSNAIS\n2001;06;09;1921;03;30;2;69;69381;84;69381;69003;FRANCE\n";
        let fixed = "11923051775112     19831102757511475112";

        for (text, dialect, annee) in [
            (nominative.as_str(), &NOMINATIF_2019, 2020),
            (detail, &DETAIL_1998, 2001),
            (fixed, &FIXED_1975, 1983),
        ] {
            let out = normalize(text, dialect, annee);
            let json = serde_json::to_value(&out.records[0]).unwrap();
            let obj = json.as_object().unwrap();
            assert_eq!(obj.len(), 13, "{}: field set must be identical", dialect.name);
            assert_eq!(obj["annee"], annee);
        }
    }
}
