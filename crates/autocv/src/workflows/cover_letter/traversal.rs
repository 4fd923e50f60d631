use super::fields::CoverLetterField;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;

use CoverLetterField::*;

/// Order in which the standard template lays out its markers. Every field
/// points at the one after it; `LastName` ends the chain.
const STANDARD_ORDER: [CoverLetterField; 29] = [
    InitialFirstName,
    InitialLastName,
    Email,
    PresentAddress1,
    LinkedinLink,
    PermanentAddress1,
    PresentAddress2,
    GithubLink,
    PermanentAddress2,
    PresentAddress3,
    PhoneNumber,
    PermanentAddress3,
    Date,
    InitialCompanyName,
    CompanyAddress1,
    CompanyAddress2,
    IsRising,
    SchoolYear,
    JobTitle,
    JobType,
    JobSeason,
    JobYear,
    LastCompanyName,
    SigFirstName,
    SigMiddleInitial,
    SigLastName,
    FirstName,
    MiddleInitial,
    LastName,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraversalError {
    #[error("traversal table is empty")]
    Empty,
    #[error("{0} has more than one transition")]
    DuplicateEntry(CoverLetterField),
    #[error("initial field {0} has no transition entry")]
    MissingInitial(CoverLetterField),
    #[error("{from} transitions to {to}, which has no transition entry")]
    DanglingTarget {
        from: CoverLetterField,
        to: CoverLetterField,
    },
    #[error("traversal revisits {0}; the chain must not contain cycles")]
    Cycle(CoverLetterField),
    #[error("{0} cannot be reached from the initial field")]
    Unreachable(CoverLetterField),
    #[error("invalid traversal document: {0}")]
    Document(String),
}

/// Immutable "next expected field" table.
///
/// Built once and validated up front: the table must form a single chain
/// starting at `initial`, with no cycles and no rows off the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTraversal {
    initial: CoverLetterField,
    transitions: HashMap<CoverLetterField, Option<CoverLetterField>>,
    ordered: Vec<CoverLetterField>,
}

impl FieldTraversal {
    pub fn standard() -> Result<Self, TraversalError> {
        Self::from_order(&STANDARD_ORDER)
    }

    /// Builds a chain where every field points at the one listed after it.
    pub fn from_order(fields: &[CoverLetterField]) -> Result<Self, TraversalError> {
        let initial = *fields.first().ok_or(TraversalError::Empty)?;
        let pairs: Vec<_> = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (*field, fields.get(index + 1).copied()))
            .collect();
        Self::from_transitions(initial, &pairs)
    }

    pub fn from_transitions(
        initial: CoverLetterField,
        pairs: &[(CoverLetterField, Option<CoverLetterField>)],
    ) -> Result<Self, TraversalError> {
        if pairs.is_empty() {
            return Err(TraversalError::Empty);
        }

        let mut transitions = HashMap::with_capacity(pairs.len());
        for (from, to) in pairs {
            if transitions.insert(*from, *to).is_some() {
                return Err(TraversalError::DuplicateEntry(*from));
            }
        }

        if !transitions.contains_key(&initial) {
            return Err(TraversalError::MissingInitial(initial));
        }

        for (from, to) in pairs {
            if let Some(to) = to {
                if !transitions.contains_key(to) {
                    return Err(TraversalError::DanglingTarget {
                        from: *from,
                        to: *to,
                    });
                }
            }
        }

        let mut ordered = Vec::with_capacity(transitions.len());
        let mut seen = HashSet::with_capacity(transitions.len());
        let mut cursor = Some(initial);
        while let Some(field) = cursor {
            if !seen.insert(field) {
                return Err(TraversalError::Cycle(field));
            }
            ordered.push(field);
            cursor = transitions.get(&field).copied().flatten();
        }

        // Table order, so the reported field is stable.
        if let Some((stray, _)) = pairs.iter().find(|(from, _)| !seen.contains(from)) {
            return Err(TraversalError::Unreachable(*stray));
        }

        Ok(Self {
            initial,
            transitions,
            ordered,
        })
    }

    /// Loads a table from JSON:
    /// `{"initial": "EMAIL", "transitions": [["EMAIL", "PHONE_NUMBER"], ["PHONE_NUMBER", null]]}`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, TraversalError> {
        let document: TraversalDocument = serde_json::from_reader(reader)
            .map_err(|err| TraversalError::Document(err.to_string()))?;
        Self::from_transitions(document.initial, &document.transitions)
    }

    pub fn initial(&self) -> CoverLetterField {
        self.initial
    }

    pub fn next(&self, field: CoverLetterField) -> Option<CoverLetterField> {
        self.transitions.get(&field).copied().flatten()
    }

    pub fn contains(&self, field: CoverLetterField) -> bool {
        self.transitions.contains_key(&field)
    }

    /// The chain from the initial field to the terminal one.
    pub fn ordered(&self) -> &[CoverLetterField] {
        &self.ordered
    }

    /// `field` and every field after it in the chain.
    pub fn remaining_from(&self, field: CoverLetterField) -> &[CoverLetterField] {
        self.ordered
            .iter()
            .position(|candidate| *candidate == field)
            .map(|index| &self.ordered[index..])
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct TraversalDocument {
    initial: CoverLetterField,
    transitions: Vec<(CoverLetterField, Option<CoverLetterField>)>,
}
