//! Canonical death record — the unified row shape every schema era maps into.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sex as recorded in the source files, normalized to a closed set.
///
/// INSEE encodes sex as `1` (male) / `2` (female); anything else — including
/// a blank field — is `Inconnu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sexe {
    Masculin,
    Feminin,
    Inconnu,
}

impl Sexe {
    /// Parse a raw source value. Accepts the numeric INSEE codes and the
    /// letter forms seen in older extracts.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "1" | "M" | "m" => Sexe::Masculin,
            "2" | "F" | "f" => Sexe::Feminin,
            _ => Sexe::Inconnu,
        }
    }

    /// Wire form: `"M"`, `"F"`, or `None` (serialized as null).
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Sexe::Masculin => Some("M"),
            Sexe::Feminin => Some("F"),
            Sexe::Inconnu => None,
        }
    }
}

impl Serialize for Sexe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.code() {
            Some(code) => serializer.serialize_str(code),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Sexe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Sexe::Inconnu),
            Some(s) => match s.as_str() {
                "M" => Ok(Sexe::Masculin),
                "F" => Ok(Sexe::Feminin),
                other => Err(D::Error::custom(format!("invalid sexe code: {other}"))),
            },
        }
    }
}

/// One normalized death record.
///
/// Every era produces the same field set; fields the era does not supply are
/// `None` and serialize as explicit JSON nulls, so the stored row shape is
/// identical regardless of the source dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub nom: Option<String>,
    pub prenoms: Option<String>,
    pub sexe: Sexe,
    pub date_naissance: Option<NaiveDate>,
    pub date_deces: Option<NaiveDate>,
    pub commune_deces: Option<String>,
    pub departement_deces: Option<String>,
    pub region_deces: Option<String>,
    pub commune_domicile: Option<String>,
    pub commune_naissance: Option<String>,
    pub pays_naissance: Option<String>,
    pub numero_acte: Option<String>,
    /// The period being processed — always present, used as a partition key.
    pub annee: i32,
}

impl CanonicalRecord {
    /// An all-null record for the given period year.
    pub fn empty(annee: i32) -> Self {
        Self {
            nom: None,
            prenoms: None,
            sexe: Sexe::Inconnu,
            date_naissance: None,
            date_deces: None,
            commune_deces: None,
            departement_deces: None,
            region_deces: None,
            commune_domicile: None,
            commune_naissance: None,
            pays_naissance: None,
            numero_acte: None,
            annee,
        }
    }
}
