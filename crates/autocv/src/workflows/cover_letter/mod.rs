pub mod domain;
mod engine;
pub mod fields;
mod resolver;
mod traversal;

pub use domain::{
    Address, Applicant, ApplicantError, ApplicantRecord, Company, JobCredentials,
    JobCredentialsError, JobSeason, JobType, SchoolYear,
};
pub use engine::{CoverLetterEngine, EngineError, FilledDocument, Substitution};
pub use fields::CoverLetterField;
pub use resolver::{BindingContext, FieldResolver, ResolveError, DATE_FORMAT};
pub use traversal::{FieldTraversal, TraversalError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Template shipped with the crate; its markers follow
/// [`FieldTraversal::standard`].
pub const STANDARD_TEMPLATE: &str = include_str!("../../../templates/cover_letter.html");

/// Data for one generated letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterRequest {
    pub applicant: Applicant,
    pub company: Company,
    pub job: JobCredentials,
    pub job_title: String,
    pub date: NaiveDate,
}

impl CoverLetterRequest {
    pub fn binding(&self) -> BindingContext<'_> {
        BindingContext::new(
            &self.applicant,
            &self.company,
            &self.job,
            &self.job_title,
            self.date,
        )
    }

    pub fn fill(
        &self,
        engine: &CoverLetterEngine,
        template: &str,
    ) -> Result<FilledDocument, EngineError> {
        engine.fill_text(template, &self.binding())
    }
}
