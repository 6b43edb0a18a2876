//! Scores an engine against a fixed query set and its expected answers.
//!
//! `queries.txt` and `solutions.txt` hold one line per part, in order:
//! postings, boolean, phrase, tf-idf, cosine. Each solutions line is JSON.

use anyhow::{anyhow, bail, Context, Result};
use ir_core::{DocId, RetrievalEngine};
use serde_json::Value;
use std::collections::BTreeSet;

const EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Postings,
    Boolean,
    Phrase,
    TfIdf,
    Cosine,
}

impl Part {
    const ALL: [Part; 5] = [Part::Postings, Part::Boolean, Part::Phrase, Part::TfIdf, Part::Cosine];

    pub fn title(self) -> &'static str {
        match self {
            Part::Postings => "Inverted Index Test",
            Part::Boolean => "Boolean Retrieval Test",
            Part::Phrase => "Phrase Query Retrieval",
            Part::TfIdf => "TF-IDF Test",
            Part::Cosine => "Cosine Similarity Test",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartReport {
    pub part: Part,
    pub correct: usize,
    pub total: usize,
}

impl PartReport {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.correct as f64 / self.total as f64 }
    }

    pub fn points(&self) -> u8 {
        if self.total > 0 && self.correct == self.total {
            3
        } else if self.correct as f64 > 0.75 * self.total as f64 {
            2
        } else if self.correct > 0 {
            1
        } else {
            0
        }
    }
}

pub fn grade(engine: &RetrievalEngine, queries: &str, solutions: &str) -> Result<Vec<PartReport>> {
    let questions: Vec<&str> = queries.lines().map(str::trim).collect();
    let answers: Vec<&str> = solutions.lines().map(str::trim).collect();
    if questions.len() < Part::ALL.len() || answers.len() < Part::ALL.len() {
        bail!(
            "expected {} lines of queries and solutions, got {} and {}",
            Part::ALL.len(),
            questions.len(),
            answers.len()
        );
    }

    let mut reports = Vec::with_capacity(Part::ALL.len());
    for (i, part) in Part::ALL.into_iter().enumerate() {
        let soln: Value = serde_json::from_str(answers[i])
            .with_context(|| format!("solutions line {}", i + 1))?;
        let report = grade_part(engine, part, questions[i], &soln).with_context(|| part.title())?;
        tracing::debug!(?part, report.correct, report.total, "graded part");
        reports.push(report);
    }
    Ok(reports)
}

fn grade_part(
    engine: &RetrievalEngine,
    part: Part,
    prob: &str,
    soln: &Value,
) -> Result<PartReport> {
    let mut correct = 0;
    let mut total = 0;
    let expected = |i: usize| soln.get(i).ok_or_else(|| anyhow!("no solution for item {i}"));

    match part {
        Part::Postings | Part::Boolean | Part::Phrase => {
            for (i, item) in prob.split(", ").enumerate() {
                total += 1;
                let guess: BTreeSet<DocId> = match part {
                    Part::Postings => engine.posting_unstemmed(item),
                    Part::Boolean => engine.query_retrieve(item),
                    _ => engine.phrase_query_retrieve(item),
                }
                .into_iter()
                .collect();
                if Some(guess) == doc_set(expected(i)?) {
                    correct += 1;
                }
            }
        }
        Part::TfIdf => {
            for (i, item) in prob.split("; ").enumerate() {
                total += 1;
                let (word, doc) = item
                    .split_once(", ")
                    .ok_or_else(|| anyhow!("tf-idf item {item:?} is not `word, doc`"))?;
                let doc: DocId =
                    doc.trim().parse().with_context(|| format!("document id in {item:?}"))?;
                let want = number(expected(i)?)
                    .ok_or_else(|| anyhow!("tf-idf solution {i} is not a number"))?;
                match engine.get_weight_unstemmed(word, doc) {
                    Ok(guess) if (guess - want).abs() <= EPSILON => correct += 1,
                    Ok(_) => {}
                    Err(e) => tracing::debug!(error = %e, "weight lookup missed"),
                }
            }
        }
        Part::Cosine => {
            for (i, query) in prob.split(", ").enumerate() {
                total += 1;
                let want = expected(i)?;
                let want_doc = want.get(0).and_then(Value::as_u64);
                let want_score = want.get(1).and_then(number);
                let top = engine.query_rank(query).into_iter().next();
                if let (Some((doc, score)), Some(want_doc), Some(want_score)) =
                    (top, want_doc, want_score)
                {
                    if u64::from(doc) == want_doc && (score - want_score).abs() <= EPSILON {
                        correct += 1;
                    }
                }
            }
        }
    }
    Ok(PartReport { part, correct, total })
}

fn doc_set(v: &Value) -> Option<BTreeSet<DocId>> {
    v.as_array()?.iter().map(|d| d.as_u64().and_then(|d| DocId::try_from(d).ok())).collect()
}

/// Solutions store floats either as JSON numbers or as strings.
fn number(v: &Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}
