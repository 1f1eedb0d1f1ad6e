//! Relation resolution over a term collection.
//!
//! Relations may point at identifiers that are not stored. Both helpers here
//! tolerate that: resolution skips such targets and the report lists them.

use super::{
    document::TermCollection,
    entities::Term,
    repositories::{DanglingRelation, IntegrityReport, RelatedTerm},
};

/// Resolves the relations of `term` against `terms`, in relation order.
#[must_use]
pub fn resolve_relations(terms: &TermCollection, term: &Term) -> Vec<RelatedTerm> {
    term.relations
        .iter()
        .filter_map(|relation| {
            terms
                .get(relation.target_term_id.as_str())
                .map(|target| RelatedTerm {
                    relation: relation.clone(),
                    term: target.clone(),
                })
        })
        .collect()
}

/// Scans every relation of every term for missing targets.
#[must_use]
pub fn scan(terms: &TermCollection) -> IntegrityReport {
    let mut report = IntegrityReport {
        terms: terms.len(),
        ..IntegrityReport::default()
    };
    for term in terms {
        for relation in &term.relations {
            report.relations += 1;
            if !terms.contains(relation.target_term_id.as_str()) {
                report.dangling.push(DanglingRelation {
                    source: term.id.clone(),
                    target: relation.target_term_id.clone(),
                    relation_type: relation.relation_type,
                });
            }
        }
    }
    report
}
