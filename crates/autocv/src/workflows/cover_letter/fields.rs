use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder tokens recognised in a cover letter template.
///
/// Several tokens bind to the same applicant value but sit at different
/// places in the letter (heading, body, signature), so each placement has
/// its own token and its own slot in the traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverLetterField {
    InitialFirstName,
    InitialLastName,
    SigFirstName,
    SigMiddleInitial,
    SigLastName,
    FirstName,
    MiddleInitial,
    LastName,
    Email,
    #[serde(rename = "PRESENT_ADDRESS_1")]
    PresentAddress1,
    #[serde(rename = "PRESENT_ADDRESS_2")]
    PresentAddress2,
    #[serde(rename = "PRESENT_ADDRESS_3")]
    PresentAddress3,
    #[serde(rename = "PERMANENT_ADDRESS_1")]
    PermanentAddress1,
    #[serde(rename = "PERMANENT_ADDRESS_2")]
    PermanentAddress2,
    #[serde(rename = "PERMANENT_ADDRESS_3")]
    PermanentAddress3,
    LinkedinLink,
    GithubLink,
    PhoneNumber,
    Date,
    InitialCompanyName,
    LastCompanyName,
    #[serde(rename = "COMPANY_ADDRESS_1")]
    CompanyAddress1,
    #[serde(rename = "COMPANY_ADDRESS_2")]
    CompanyAddress2,
    IsRising,
    SchoolYear,
    JobTitle,
    JobSeason,
    JobYear,
    JobType,
}

impl CoverLetterField {
    pub const ALL: [Self; 29] = [
        Self::InitialFirstName,
        Self::InitialLastName,
        Self::SigFirstName,
        Self::SigMiddleInitial,
        Self::SigLastName,
        Self::FirstName,
        Self::MiddleInitial,
        Self::LastName,
        Self::Email,
        Self::PresentAddress1,
        Self::PresentAddress2,
        Self::PresentAddress3,
        Self::PermanentAddress1,
        Self::PermanentAddress2,
        Self::PermanentAddress3,
        Self::LinkedinLink,
        Self::GithubLink,
        Self::PhoneNumber,
        Self::Date,
        Self::InitialCompanyName,
        Self::LastCompanyName,
        Self::CompanyAddress1,
        Self::CompanyAddress2,
        Self::IsRising,
        Self::SchoolYear,
        Self::JobTitle,
        Self::JobSeason,
        Self::JobYear,
        Self::JobType,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::InitialFirstName => "INITIAL_FIRST_NAME",
            Self::InitialLastName => "INITIAL_LAST_NAME",
            Self::SigFirstName => "SIG_FIRST_NAME",
            Self::SigMiddleInitial => "SIG_MIDDLE_INITIAL",
            Self::SigLastName => "SIG_LAST_NAME",
            Self::FirstName => "FIRST_NAME",
            Self::MiddleInitial => "MIDDLE_INITIAL",
            Self::LastName => "LAST_NAME",
            Self::Email => "EMAIL",
            Self::PresentAddress1 => "PRESENT_ADDRESS_1",
            Self::PresentAddress2 => "PRESENT_ADDRESS_2",
            Self::PresentAddress3 => "PRESENT_ADDRESS_3",
            Self::PermanentAddress1 => "PERMANENT_ADDRESS_1",
            Self::PermanentAddress2 => "PERMANENT_ADDRESS_2",
            Self::PermanentAddress3 => "PERMANENT_ADDRESS_3",
            Self::LinkedinLink => "LINKEDIN_LINK",
            Self::GithubLink => "GITHUB_LINK",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::Date => "DATE",
            Self::InitialCompanyName => "INITIAL_COMPANY_NAME",
            Self::LastCompanyName => "LAST_COMPANY_NAME",
            Self::CompanyAddress1 => "COMPANY_ADDRESS_1",
            Self::CompanyAddress2 => "COMPANY_ADDRESS_2",
            Self::IsRising => "IS_RISING",
            Self::SchoolYear => "SCHOOL_YEAR",
            Self::JobTitle => "JOB_TITLE",
            Self::JobSeason => "JOB_SEASON",
            Self::JobYear => "JOB_YEAR",
            Self::JobType => "JOB_TYPE",
        }
    }

    /// Literal text of the token as it appears in a template.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::InitialFirstName => "[INITIAL_FIRST_NAME]",
            Self::InitialLastName => "[INITIAL_LAST_NAME]",
            Self::SigFirstName => "[SIG_FIRST_NAME]",
            Self::SigMiddleInitial => "[SIG_MIDDLE_INITIAL]",
            Self::SigLastName => "[SIG_LAST_NAME]",
            Self::FirstName => "[FIRST_NAME]",
            Self::MiddleInitial => "[MIDDLE_INITIAL]",
            Self::LastName => "[LAST_NAME]",
            Self::Email => "[EMAIL]",
            Self::PresentAddress1 => "[PRESENT_ADDRESS_1]",
            Self::PresentAddress2 => "[PRESENT_ADDRESS_2]",
            Self::PresentAddress3 => "[PRESENT_ADDRESS_3]",
            Self::PermanentAddress1 => "[PERMANENT_ADDRESS_1]",
            Self::PermanentAddress2 => "[PERMANENT_ADDRESS_2]",
            Self::PermanentAddress3 => "[PERMANENT_ADDRESS_3]",
            Self::LinkedinLink => "[LINKEDIN_LINK]",
            Self::GithubLink => "[GITHUB_LINK]",
            Self::PhoneNumber => "[PHONE_NUMBER]",
            Self::Date => "[DATE]",
            Self::InitialCompanyName => "[INITIAL_COMPANY_NAME]",
            Self::LastCompanyName => "[LAST_COMPANY_NAME]",
            Self::CompanyAddress1 => "[COMPANY_ADDRESS_1]",
            Self::CompanyAddress2 => "[COMPANY_ADDRESS_2]",
            Self::IsRising => "[IS_RISING]",
            Self::SchoolYear => "[SCHOOL_YEAR]",
            Self::JobTitle => "[JOB_TITLE]",
            Self::JobSeason => "[JOB_SEASON]",
            Self::JobYear => "[JOB_YEAR]",
            Self::JobType => "[JOB_TYPE]",
        }
    }
}

impl fmt::Display for CoverLetterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cover letter field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for CoverLetterField {
    type Err = UnknownField;

    /// Accepts either the bare name (`EMAIL`) or the marker (`[EMAIL]`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn markers_wrap_names_in_brackets() {
        for field in CoverLetterField::ALL {
            assert_eq!(field.marker(), format!("[{}]", field.name()));
        }
    }

    #[test]
    fn vocabulary_has_unique_markers() {
        let markers: HashSet<_> = CoverLetterField::ALL.iter().map(|f| f.marker()).collect();
        assert_eq!(markers.len(), CoverLetterField::ALL.len());
    }

    #[test]
    fn parses_names_and_markers() {
        assert_eq!("EMAIL".parse::<CoverLetterField>(), Ok(CoverLetterField::Email));
        assert_eq!("[JOB_TYPE]".parse::<CoverLetterField>(), Ok(CoverLetterField::JobType));
        assert_eq!(
            " present_address_3 ".parse::<CoverLetterField>(),
            Ok(CoverLetterField::PresentAddress3)
        );
        assert!("[EMAIL".parse::<CoverLetterField>().is_err());
        assert!("NICKNAME".parse::<CoverLetterField>().is_err());
    }

    #[test]
    fn serde_uses_template_names() {
        for field in CoverLetterField::ALL {
            let json = serde_json::to_string(&field).expect("serialize");
            assert_eq!(json, format!("\"{}\"", field.name()));
        }
    }
}
