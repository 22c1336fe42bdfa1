use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::index::InvertedIndex;
use crate::DocId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

pub fn execute(index: &InvertedIndex, terms: &[String], combinator: Combinator) -> Vec<DocId> {
    match combinator {
        Combinator::And => and_query(index, terms),
        Combinator::Or => or_query(index, terms),
    }
}

/// Intersection of all query terms' postings, ascending and duplicate
/// free. Empty when the term list is empty or any term is absent.
pub fn and_query(index: &InvertedIndex, terms: &[String]) -> Vec<DocId> {
    let Some((first, rest)) = terms.split_first() else {
        return Vec::new();
    };
    let mut result = index.resolve_postings(first).to_vec();
    for term in rest {
        let postings = index.resolve_postings(term);
        result.retain(|id| postings.binary_search(id).is_ok());
        if result.is_empty() {
            break;
        }
    }
    result
}

/// Union of the query terms' postings, ordered by how many distinct
/// query terms each document matches (descending), with document id
/// ascending on equal match counts — the sort key is (match_count,
/// -doc_id) taken descending.
pub fn or_query(index: &InvertedIndex, terms: &[String]) -> Vec<DocId> {
    let distinct: HashSet<&String> = terms.iter().collect();
    let mut match_counts: HashMap<DocId, usize> = HashMap::new();
    for term in distinct {
        for &id in index.resolve_postings(term) {
            *match_counts.entry(id).or_insert(0) += 1;
        }
    }

    let mut results: Vec<(DocId, usize)> = match_counts.into_iter().collect();
    results.sort_unstable_by_key(|&(id, count)| (Reverse(count), id));
    results.into_iter().map(|(id, _)| id).collect()
}
