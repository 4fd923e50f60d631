use super::domain::{Address, Applicant, Company, JobCredentials};
use super::fields::CoverLetterField;
use chrono::NaiveDate;

/// Long month, zero-padded day, four-digit year: `September 05, 1996`.
pub const DATE_FORMAT: &str = "%B %d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no binding rule for {field}")]
    Unbound { field: CoverLetterField },
    #[error("{field} requires a company address, but {company} has none")]
    MissingCompanyAddress {
        field: CoverLetterField,
        company: String,
    },
}

/// Computes the replacement text for a field.
pub trait FieldResolver {
    fn resolve(&self, field: CoverLetterField) -> Result<String, ResolveError>;
}

impl<F> FieldResolver for F
where
    F: Fn(CoverLetterField) -> Result<String, ResolveError>,
{
    fn resolve(&self, field: CoverLetterField) -> Result<String, ResolveError> {
        self(field)
    }
}

/// Everything a cover letter binds against for one generation request.
#[derive(Debug, Clone, Copy)]
pub struct BindingContext<'a> {
    pub applicant: &'a Applicant,
    pub company: &'a Company,
    pub job: &'a JobCredentials,
    pub job_title: &'a str,
    pub date: NaiveDate,
}

impl<'a> BindingContext<'a> {
    pub fn new(
        applicant: &'a Applicant,
        company: &'a Company,
        job: &'a JobCredentials,
        job_title: &'a str,
        date: NaiveDate,
    ) -> Self {
        Self {
            applicant,
            company,
            job,
            job_title,
            date,
        }
    }

    fn company_address(&self, field: CoverLetterField) -> Result<&'a Address, ResolveError> {
        self.company
            .address
            .as_ref()
            .ok_or_else(|| ResolveError::MissingCompanyAddress {
                field,
                company: self.company.name.clone(),
            })
    }
}

impl FieldResolver for BindingContext<'_> {
    fn resolve(&self, field: CoverLetterField) -> Result<String, ResolveError> {
        use CoverLetterField::*;

        let applicant = self.applicant;
        let value = match field {
            InitialFirstName | SigFirstName | FirstName => applicant.first_name().to_string(),
            InitialLastName | SigLastName | LastName => format!(" {}", applicant.last_name()),
            SigMiddleInitial | MiddleInitial => applicant
                .middle_initial()
                .map(|initial| format!(" {initial}."))
                .unwrap_or_default(),
            Email => applicant.email().to_string(),
            PresentAddress1 => applicant.present_address().street_address.clone(),
            PresentAddress2 => applicant.present_address().city_state_zip.clone(),
            PresentAddress3 => tertiary(applicant.present_address()),
            PermanentAddress1 => applicant.permanent_address().street_address.clone(),
            PermanentAddress2 => applicant.permanent_address().city_state_zip.clone(),
            PermanentAddress3 => tertiary(applicant.permanent_address()),
            LinkedinLink => applicant.linkedin_link().to_string(),
            GithubLink => applicant.github_link().to_string(),
            PhoneNumber => applicant.phone().to_string(),
            Date => self.date.format(DATE_FORMAT).to_string(),
            InitialCompanyName | LastCompanyName => self.company.name.clone(),
            CompanyAddress1 => self.company_address(field)?.street_address.clone(),
            CompanyAddress2 => self.company_address(field)?.city_state_zip.clone(),
            IsRising => {
                if applicant.is_rising() {
                    " rising".to_string()
                } else {
                    String::new()
                }
            }
            SchoolYear => format!(" {}", applicant.school_year().label().to_lowercase()),
            JobTitle => self.job_title.to_string(),
            JobSeason => format!(" {}", self.job.job_season().label().to_lowercase()),
            JobYear => format!(" {}", self.job.year()),
            JobType => self.job.job_type().label().to_lowercase(),
        };

        Ok(value)
    }
}

fn tertiary(address: &Address) -> String {
    address.tertiary.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::cover_letter::domain::{
        ApplicantRecord, JobSeason, JobType, SchoolYear,
    };

    fn applicant(middle_initial: Option<&str>, is_rising: bool) -> Applicant {
        Applicant::new(ApplicantRecord {
            full_name: "Grace Hopper".to_string(),
            middle_initial: middle_initial.map(str::to_string),
            email: "grace@example.edu".to_string(),
            github_link: "github.com/ghopper".to_string(),
            linkedin_link: "linkedin.com/in/ghopper".to_string(),
            phone: "(555) 010-0199".to_string(),
            school_year: SchoolYear::Sophomore,
            is_rising,
            present_address: Address::new("300 Dorm Way", "Ames, IA 50011").with_tertiary("Room 214"),
            permanent_address: Address::new("12 Oak Ave", "Cedar Rapids, IA 52401")
                .with_tertiary("P.O. Box 77"),
        })
        .expect("valid applicant")
    }

    fn company() -> Company {
        Company::new("Initech", Address::new("4120 Freidrich Ln", "Austin, TX 78744"))
    }

    fn resolve_with(applicant: &Applicant, company: &Company, field: CoverLetterField) -> String {
        let job = JobCredentials::new(JobType::CoOp, JobSeason::Fall, "2026").expect("valid job");
        let date = NaiveDate::from_ymd_opt(1996, 9, 5).expect("valid date");
        BindingContext::new(applicant, company, &job, "Software Engineer", date)
            .resolve(field)
            .expect("field resolves")
    }

    #[test]
    fn name_fields_share_values_across_placements() {
        let applicant = applicant(None, false);
        let company = company();
        for field in [
            CoverLetterField::InitialFirstName,
            CoverLetterField::SigFirstName,
            CoverLetterField::FirstName,
        ] {
            assert_eq!(resolve_with(&applicant, &company, field), "Grace");
        }
        for field in [
            CoverLetterField::InitialLastName,
            CoverLetterField::SigLastName,
            CoverLetterField::LastName,
        ] {
            assert_eq!(resolve_with(&applicant, &company, field), " Hopper");
        }
    }

    #[test]
    fn middle_initial_is_optional() {
        let company = company();
        let without = applicant(None, false);
        assert_eq!(
            resolve_with(&without, &company, CoverLetterField::MiddleInitial),
            ""
        );
        let with = applicant(Some("Q"), false);
        assert_eq!(
            resolve_with(&with, &company, CoverLetterField::SigMiddleInitial),
            " Q."
        );
    }

    #[test]
    fn rising_flag_renders_as_adjective() {
        let company = company();
        assert_eq!(
            resolve_with(&applicant(None, false), &company, CoverLetterField::IsRising),
            ""
        );
        assert_eq!(
            resolve_with(&applicant(None, true), &company, CoverLetterField::IsRising),
            " rising"
        );
    }

    #[test]
    fn job_and_school_fields_are_lower_cased() {
        let applicant = applicant(None, false);
        let company = company();
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::SchoolYear),
            " sophomore"
        );
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::JobType),
            "co-op"
        );
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::JobSeason),
            " fall"
        );
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::JobYear),
            " 2026"
        );
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::JobTitle),
            "Software Engineer"
        );
    }

    #[test]
    fn date_uses_long_month_and_padded_day() {
        assert_eq!(
            resolve_with(&applicant(None, false), &company(), CoverLetterField::Date),
            "September 05, 1996"
        );
    }

    #[test]
    fn addresses_select_by_role() {
        let applicant = applicant(None, false);
        let company = company();
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::PresentAddress3),
            "Room 214"
        );
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::PermanentAddress3),
            "P.O. Box 77"
        );
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::PermanentAddress2),
            "Cedar Rapids, IA 52401"
        );
        assert_eq!(
            resolve_with(&applicant, &company, CoverLetterField::CompanyAddress1),
            "4120 Freidrich Ln"
        );
    }

    #[test]
    fn company_without_address_fails_address_fields() {
        let applicant = applicant(None, false);
        let company = Company::named("Initech");
        let job = JobCredentials::new(JobType::Internship, JobSeason::Summer, "2026").expect("job");
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).expect("date");
        let context = BindingContext::new(&applicant, &company, &job, "Intern", date);

        assert_eq!(
            context.resolve(CoverLetterField::InitialCompanyName),
            Ok("Initech".to_string())
        );
        assert_eq!(
            context.resolve(CoverLetterField::CompanyAddress2),
            Err(ResolveError::MissingCompanyAddress {
                field: CoverLetterField::CompanyAddress2,
                company: "Initech".to_string(),
            })
        );
    }

    #[test]
    fn every_field_has_a_binding() {
        let applicant = applicant(Some("M"), true);
        let company = company();
        let job = JobCredentials::new(JobType::Internship, JobSeason::Spring, "2027").expect("job");
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).expect("date");
        let context = BindingContext::new(&applicant, &company, &job, "Analyst", date);
        for field in CoverLetterField::ALL {
            assert!(context.resolve(field).is_ok(), "{field} failed to resolve");
        }
    }
}
