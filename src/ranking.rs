//! Ranking
//!
//! Turn the dense importance matrix into ordered lists of training documents.
use crate::errors::InfluenceError;
use crate::evaluator::DocumentImportances;
use crate::utils::items_to_strings;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// How scores of several evaluation documents are combined.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStrength {
    /// One ranking per evaluation document.
    Raw,
    /// A single ranking of scores averaged over evaluation documents.
    Average,
}

impl FromStr for DocumentStrength {
    type Err = InfluenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Raw" => Ok(DocumentStrength::Raw),
            "Average" => Ok(DocumentStrength::Average),
            _ => Err(InfluenceError::ParseString(
                s.to_string(),
                "DocumentStrength".to_string(),
                items_to_strings(vec!["Raw", "Average"]),
            )),
        }
    }
}

/// Which scores are kept, and in which order.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ImportanceValuesSign {
    /// Every score, largest magnitude first.
    All,
    /// Non negative scores, largest first.
    Positive,
    /// Non positive scores, smallest first.
    Negative,
}

impl FromStr for ImportanceValuesSign {
    type Err = InfluenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(ImportanceValuesSign::All),
            "Positive" => Ok(ImportanceValuesSign::Positive),
            "Negative" => Ok(ImportanceValuesSign::Negative),
            _ => Err(InfluenceError::ParseString(
                s.to_string(),
                "ImportanceValuesSign".to_string(),
                items_to_strings(vec!["All", "Positive", "Negative"]),
            )),
        }
    }
}

/// Training document ids and their scores, one list per ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentImportanceRanking {
    pub indices: Vec<Vec<usize>>,
    pub scores: Vec<Vec<f64>>,
}

fn rank_scores(
    scores: &[f64],
    sign: ImportanceValuesSign,
    top_size: Option<usize>,
) -> (Vec<usize>, Vec<f64>) {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    let compare = |a: &usize, b: &usize| -> Ordering {
        let (sa, sb) = (scores[*a], scores[*b]);
        let by_score = match sign {
            ImportanceValuesSign::All => sb.abs().total_cmp(&sa.abs()),
            ImportanceValuesSign::Positive => sb.total_cmp(&sa),
            ImportanceValuesSign::Negative => sa.total_cmp(&sb),
        };
        by_score.then(a.cmp(b))
    };
    order.sort_by(compare);
    order.truncate(top_size.unwrap_or(scores.len()));

    let keep = order
        .iter()
        .take_while(|&&doc| match sign {
            ImportanceValuesSign::All => true,
            ImportanceValuesSign::Positive => scores[doc] >= 0.0,
            ImportanceValuesSign::Negative => scores[doc] <= 0.0,
        })
        .count();
    order.truncate(keep);
    let ranked_scores = order.iter().map(|&doc| scores[doc]).collect();
    (order, ranked_scores)
}

/// Rank training documents by their importance.
///
/// * `importances` - Dense `[train][eval]` importance matrix.
/// * `strength` - One ranking per evaluation document, or a single averaged one.
/// * `sign` - Which scores to keep and how to order them.
/// * `top_size` - Maximum training documents per ranking, all when `None`.
pub fn rank_document_importances(
    importances: &DocumentImportances,
    strength: DocumentStrength,
    sign: ImportanceValuesSign,
    top_size: Option<usize>,
) -> DocumentImportanceRanking {
    let per_ranking: Vec<Vec<f64>> = match strength {
        DocumentStrength::Raw => (0..importances.eval_doc_count)
            .map(|e| {
                (0..importances.train_doc_count)
                    .map(|train| importances.get(train, e))
                    .collect()
            })
            .collect(),
        DocumentStrength::Average => {
            let eval_doc_count = importances.eval_doc_count;
            let averaged = importances
                .rows()
                .map(|row| {
                    if eval_doc_count == 0 {
                        0.0
                    } else {
                        row.iter().sum::<f64>() / eval_doc_count as f64
                    }
                })
                .collect();
            vec![averaged]
        }
    };

    let mut ranking = DocumentImportanceRanking::default();
    for scores in per_ranking {
        let (indices, scores) = rank_scores(&scores, sign, top_size);
        ranking.indices.push(indices);
        ranking.scores.push(scores);
    }
    ranking
}
