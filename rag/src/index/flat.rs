use std::collections::HashMap;

use docent_core::DocumentId;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::error::{RagError, Result};
use crate::types::{SearchResult, VectorRecord};

use super::cosine_similarity;

/// Records of one document plus the invariants tying them together.
///
/// The dimension is fixed by the first record and forgotten on [`clear`](Self::clear).
#[derive(Debug, Default)]
pub(crate) struct FlatIndex {
    records: Vec<VectorRecord>,
    positions: HashMap<String, usize>,
    dimension: Option<usize>,
    document_id: Option<DocumentId>,
}

impl FlatIndex {
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) const fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub(crate) const fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    /// Tags the index and any untagged records with `id`.
    ///
    /// Fails if records of another document are already stored.
    pub(crate) fn set_document_id(&mut self, id: DocumentId) -> Result<()> {
        if !self.records.is_empty() {
            if let Some(current) = &self.document_id {
                if *current != id {
                    return Err(RagError::DocumentMismatch {
                        expected: current.clone(),
                        actual: id,
                    });
                }
            }
        }
        for record in &mut self.records {
            record.metadata.document_id = Some(id.clone());
        }
        self.document_id = Some(id);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.positions.clear();
        self.dimension = None;
        self.document_id = None;
    }

    /// Inserts or replaces the record with the same id.
    ///
    /// An untagged record takes the index's document id. A tagged record entering an untagged
    /// index tags it, along with the records already stored.
    pub(crate) fn upsert(&mut self, mut record: VectorRecord) -> Result<()> {
        if let Some(expected) = self.dimension {
            let replaces_only = self.records.len() == 1 && self.positions.contains_key(&record.id);
            if record.dim() != expected && !replaces_only {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: record.dim(),
                });
            }
        }
        match (self.document_id.clone(), record.metadata.document_id.clone()) {
            (Some(expected), Some(actual)) if expected != actual => {
                return Err(RagError::DocumentMismatch { expected, actual });
            }
            (Some(expected), None) => record.metadata.document_id = Some(expected),
            (None, Some(actual)) => {
                for stored in &mut self.records {
                    stored.metadata.document_id = Some(actual.clone());
                }
                self.document_id = Some(actual);
            }
            _ => {}
        }

        self.dimension = Some(record.dim());
        if let Some(&position) = self.positions.get(&record.id) {
            self.records[position] = record;
            return Ok(());
        }
        self.positions.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Scores every record against `vector` and returns the best `top_k`.
    ///
    /// Ties keep insertion order.
    pub(crate) fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if self.records.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if let Some(expected) = self.dimension {
            if vector.len() != expected {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .records
            .par_iter()
            .enumerate()
            .map(|(position, record)| (position, cosine_similarity(&record.embedding, vector)))
            .collect();

        scored.par_sort_unstable_by(|a, b| {
            OrderedFloat(b.1)
                .cmp(&OrderedFloat(a.1))
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(position, similarity)| SearchResult {
                record: self.records[position].clone(),
                similarity,
            })
            .collect())
    }

    pub(crate) fn records(&self) -> &[VectorRecord] {
        &self.records
    }
}
