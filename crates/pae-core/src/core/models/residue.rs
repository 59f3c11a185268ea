use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// A single data line of a coordinate source.
///
/// Coordinate sources list one line per atom, so a residue is usually backed by
/// several records sharing the same residue number.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueRecord {
    /// Sequential residue number across the whole system.
    pub residue_number: i64,
    /// Chain / segment identifier.
    pub segment_id: String,
    /// Residue identifier within its segment, used when emitting constraints.
    pub positional_id: i64,
    /// Per-residue model confidence (pLDDT, 0-100). Values `<= 0` mean "no data".
    pub confidence: f64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResidueLookupError {
    #[error("No coordinate record for residue number {residue_number}")]
    Missing { residue_number: i64 },
    #[error("Records of residue number {residue_number} disagree on {field}")]
    Conflicting {
        residue_number: i64,
        field: &'static str,
    },
}

/// Identity of a residue as needed for constraint emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueIdentity<'a> {
    pub positional_id: i64,
    pub segment_id: &'a str,
}

/// Lookup of coordinate records keyed by residue number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidueTable {
    records: Vec<ResidueRecord>,
    by_residue: BTreeMap<i64, Vec<usize>>,
}

impl ResidueTable {
    pub fn new(records: Vec<ResidueRecord>) -> Self {
        let mut by_residue: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_residue
                .entry(record.residue_number)
                .or_default()
                .push(idx);
        }
        Self {
            records,
            by_residue,
        }
    }

    pub fn records(&self) -> &[ResidueRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct residue numbers.
    pub fn residue_count(&self) -> usize {
        self.by_residue.len()
    }

    /// Residue number of the first data record in file order.
    pub fn first_residue_number(&self) -> Option<i64> {
        self.records.first().map(|r| r.residue_number)
    }

    /// Residue number of the last data record in file order.
    pub fn last_residue_number(&self) -> Option<i64> {
        self.records.last().map(|r| r.residue_number)
    }

    pub fn records_for(&self, residue_number: i64) -> impl Iterator<Item = &ResidueRecord> {
        let records = &self.records;
        self.by_residue
            .get(&residue_number)
            .into_iter()
            .flatten()
            .map(move |&idx| &records[idx])
    }

    /// All records whose residue number lies in `first..=last`.
    pub fn records_in_range(&self, first: i64, last: i64) -> impl Iterator<Item = &ResidueRecord> {
        let range = if first <= last {
            Some(self.by_residue.range(first..=last))
        } else {
            None
        };
        let records = &self.records;
        range
            .into_iter()
            .flatten()
            .flat_map(move |(_, indices)| indices.iter().map(move |&idx| &records[idx]))
    }

    /// Resolves the positional id and segment id of a residue.
    ///
    /// Every record of the residue must agree on both values.
    pub fn identity(&self, residue_number: i64) -> Result<ResidueIdentity<'_>, ResidueLookupError> {
        let mut records = self.records_for(residue_number);
        let first = records
            .next()
            .ok_or(ResidueLookupError::Missing { residue_number })?;
        for record in records {
            if record.positional_id != first.positional_id {
                return Err(ResidueLookupError::Conflicting {
                    residue_number,
                    field: "positional id",
                });
            }
            if record.segment_id != first.segment_id {
                return Err(ResidueLookupError::Conflicting {
                    residue_number,
                    field: "segment id",
                });
            }
        }
        Ok(ResidueIdentity {
            positional_id: first.positional_id,
            segment_id: &first.segment_id,
        })
    }

    /// Vertex indices after which the chain changes.
    ///
    /// A boundary is recorded for every record whose segment id differs from the
    /// next record's, expressed relative to the first residue number.
    pub fn chain_boundaries(&self) -> BTreeSet<usize> {
        let Some(first) = self.first_residue_number() else {
            return BTreeSet::new();
        };
        self.records
            .windows(2)
            .filter(|pair| pair[0].segment_id != pair[1].segment_id)
            .filter_map(|pair| usize::try_from(pair[0].residue_number - first).ok())
            .collect()
    }
}
