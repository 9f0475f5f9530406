//! Agreement between written category codes and the codes implied by the
//! row headers.
//!
//! A row's predicted category is recovered from its composite header by label
//! prefix ([`CategoryMap::category_from_header`]). Headers that start with a
//! patient name, or with a label missing from the map, have no prediction and
//! count as disagreements.

use std::collections::BTreeMap;

use medrec_model::OutputRow;
use medrec_standards::CategoryMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryAgreement {
    /// Rows written with this category.
    pub support: usize,
    /// Rows whose header maps to this category.
    pub predicted: usize,
    /// Rows where both agree on this category.
    pub agreed: usize,
}

impl CategoryAgreement {
    pub fn precision(&self) -> Option<f64> {
        ratio(self.agreed, self.predicted)
    }

    pub fn recall(&self) -> Option<f64> {
        ratio(self.agreed, self.support)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryEvaluation {
    pub total_rows: usize,
    pub agreed_rows: usize,
    /// Rows whose header matches no label in the map.
    pub unmapped_headers: usize,
    pub per_category: BTreeMap<u32, CategoryAgreement>,
}

impl CategoryEvaluation {
    /// Fraction of rows whose header implies their written category; `None`
    /// for an empty file.
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.agreed_rows, self.total_rows)
    }
}

pub fn evaluate_categories(rows: &[OutputRow], categories: &CategoryMap) -> CategoryEvaluation {
    let mut evaluation = CategoryEvaluation {
        total_rows: rows.len(),
        ..CategoryEvaluation::default()
    };
    for row in rows {
        evaluation
            .per_category
            .entry(row.category_id)
            .or_default()
            .support += 1;
        let Some(predicted) = categories.category_from_header(&row.header) else {
            evaluation.unmapped_headers += 1;
            continue;
        };
        let entry = evaluation.per_category.entry(predicted).or_default();
        entry.predicted += 1;
        if predicted == row.category_id {
            entry.agreed += 1;
            evaluation.agreed_rows += 1;
        }
    }
    evaluation
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}
