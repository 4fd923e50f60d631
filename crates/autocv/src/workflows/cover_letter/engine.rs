use super::fields::CoverLetterField;
use super::resolver::{FieldResolver, ResolveError};
use super::traversal::FieldTraversal;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("line {line}: {source}")]
    Resolve {
        line: usize,
        #[source]
        source: ResolveError,
    },
}

/// One marker replaced during a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Substitution {
    /// Zero-based index of the template line.
    pub line: usize,
    pub field: CoverLetterField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledDocument {
    pub lines: Vec<String>,
    pub substitutions: Vec<Substitution>,
    /// Fields still expected when the template ran out, in chain order.
    pub unresolved: Vec<CoverLetterField>,
}

impl FilledDocument {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Every line followed by a newline, the way the document is written to disk.
    pub fn to_text(&self) -> String {
        let capacity = self.lines.iter().map(|line| line.len() + 1).sum();
        let mut text = String::with_capacity(capacity);
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Line-by-line marker substitution driven by a [`FieldTraversal`].
///
/// Only the currently expected field is looked for on each line. When it
/// appears, its first occurrence is replaced and the engine moves on to the
/// next field in the chain; every other line passes through untouched. The
/// engine holds no per-run state, so one instance can serve any number of
/// requests.
#[derive(Debug, Clone)]
pub struct CoverLetterEngine {
    traversal: FieldTraversal,
}

impl CoverLetterEngine {
    pub fn new(traversal: FieldTraversal) -> Self {
        Self { traversal }
    }

    pub fn traversal(&self) -> &FieldTraversal {
        &self.traversal
    }

    pub fn fill<I, S, R>(&self, lines: I, resolver: &R) -> Result<FilledDocument, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        R: FieldResolver + ?Sized,
    {
        let mut expected = Some(self.traversal.initial());
        let mut output = Vec::new();
        let mut substitutions = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let Some(field) = expected else {
                output.push(line.to_string());
                continue;
            };

            let marker = field.marker();
            if !line.contains(marker) {
                output.push(line.to_string());
                continue;
            }

            let value = resolver
                .resolve(field)
                .map_err(|source| EngineError::Resolve {
                    line: index + 1,
                    source,
                })?;
            output.push(line.replacen(marker, &value, 1));
            substitutions.push(Substitution { line: index, field });
            debug!(field = field.name(), line = index + 1, "substituted marker");

            expected = self.traversal.next(field);
        }

        let unresolved = expected
            .map(|field| self.traversal.remaining_from(field).to_vec())
            .unwrap_or_default();
        if !unresolved.is_empty() {
            warn!(
                missing = unresolved.len(),
                first = unresolved[0].name(),
                "template ended before every expected marker was found"
            );
        }

        Ok(FilledDocument {
            lines: output,
            substitutions,
            unresolved,
        })
    }

    pub fn fill_text<R>(&self, template: &str, resolver: &R) -> Result<FilledDocument, EngineError>
    where
        R: FieldResolver + ?Sized,
    {
        self.fill(template.lines(), resolver)
    }
}
