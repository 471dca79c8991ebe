//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Batch partitioning — sizes, order, and coverage hold for any input
//! 2. Date composition — only fully valid year/month/day triples compose
//! 3. Normalizer field-set invariant — every era yields the same row shape

use proptest::prelude::*;
use std::cell::RefCell;

use deces_core::batch::load_batches;
use deces_core::dialect::{dialect_for_year, DETAIL_1998, FIXED_1975, NOMINATIF_2019};
use deces_core::normalize::normalize;
use deces_core::record::CanonicalRecord;
use deces_core::store::{CommitMode, RecordStore, StoreError};

/// Store double that records batch sizes and accepts everything.
struct CountingStore {
    batch_sizes: RefCell<Vec<usize>>,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            batch_sizes: RefCell::new(Vec::new()),
        }
    }
}

impl RecordStore for CountingStore {
    fn commit(&self, records: &[CanonicalRecord], _mode: CommitMode) -> Result<(), StoreError> {
        self.batch_sizes.borrow_mut().push(records.len());
        Ok(())
    }
}

// ── 1. Batch partitioning ────────────────────────────────────────────

proptest! {
    /// Partitions cover every record exactly once, in order, with every
    /// batch at most `batch_size` and only the last one smaller.
    #[test]
    fn batch_partitioning_invariants(
        record_count in 0usize..5000,
        batch_size in 1usize..2000,
    ) {
        let records: Vec<CanonicalRecord> =
            (0..record_count).map(|_| CanonicalRecord::empty(2020)).collect();
        let store = CountingStore::new();

        let summary = load_batches(&store, &records, batch_size, CommitMode::Insert, |_| {});
        let sizes = store.batch_sizes.borrow();

        prop_assert_eq!(sizes.iter().sum::<usize>(), record_count);
        prop_assert_eq!(summary.committed, record_count);
        prop_assert_eq!(sizes.len(), record_count.div_ceil(batch_size));
        for (i, &size) in sizes.iter().enumerate() {
            prop_assert!(size <= batch_size);
            if i + 1 < sizes.len() {
                prop_assert_eq!(size, batch_size, "only the last batch may be short");
            }
        }
    }
}

// ── 2. Date composition ──────────────────────────────────────────────

proptest! {
    /// A composite date composes exactly when chrono accepts the triple,
    /// and the composed value round-trips the components.
    #[test]
    fn composite_dates_match_calendar_validity(
        year in 1850i32..2100,
        month in 0u32..15,
        day in 0u32..35,
    ) {
        let header = "ADEC;MDEC;JDEC;ANAIS;MNAIS;JNAIS;SEXE;DEPDEC;COMDEC;REGDEC;COMDOM;COMNAIS;PAYSNAIS";
        let text = format!("{header}\n{year};{month};{day};;;;1;;;;;;\n");
        let out = normalize(&text, &DETAIL_1998, year);

        prop_assert_eq!(out.records.len(), 1);
        let expected = chrono::NaiveDate::from_ymd_opt(year, month, day);
        prop_assert_eq!(out.records[0].date_deces, expected);
        if let Some(date) = out.records[0].date_deces {
            prop_assert_eq!(date.to_string(), format!("{year:04}-{month:02}-{day:02}"));
        }
    }
}

// ── 3. Field-set invariant ───────────────────────────────────────────

proptest! {
    /// Whatever the year, the selected dialect normalizes to the identical
    /// 13-field row shape with explicit nulls.
    #[test]
    fn every_year_normalizes_to_the_same_shape(year in 1975i32..2030) {
        let dialect = dialect_for_year(year);
        // A row of the right physical shape but arbitrary emptiness.
        let text = match dialect.name {
            name if name == NOMINATIF_2019.name =>
                "Nom;Prénoms;Sexe;Date naissance;Code lieu naissance;Lieu naissance;Date décès;Code lieu décès;Numéro acte\n;;;;;;;;\n".to_string(),
            name if name == DETAIL_1998.name =>
                "ADEC;MDEC;JDEC;ANAIS;MNAIS;JNAIS;SEXE;DEPDEC;COMDEC;REGDEC;COMDOM;COMNAIS;PAYSNAIS\n;;;;;;;;;;;;\n".to_string(),
            name if name == FIXED_1975.name => format!("9{}", " ".repeat(38)),
            other => panic!("unexpected dialect {other}"),
        };

        let out = normalize(&text, dialect, year);
        prop_assert_eq!(out.records.len(), 1);
        let json = serde_json::to_value(&out.records[0]).unwrap();
        let obj = json.as_object().unwrap();
        prop_assert_eq!(obj.len(), 13);
        prop_assert_eq!(&obj["annee"], &serde_json::json!(year));
    }
}
