use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchoolYear {
    Freshman,
    Sophomore,
    Junior,
    Senior,
}

impl SchoolYear {
    pub const fn ordered() -> [Self; 4] {
        [Self::Freshman, Self::Sophomore, Self::Junior, Self::Senior]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Freshman => "FRESHMAN",
            Self::Sophomore => "SOPHOMORE",
            Self::Junior => "JUNIOR",
            Self::Senior => "SENIOR",
        }
    }
}

/// Kind of position being applied for.
///
/// The tag and the display form differ for co-ops (`CoOp` prints as
/// `CO-OP`), so output always goes through [`JobType::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "INTERNSHIP", alias = "internship")]
    Internship,
    #[serde(rename = "CO-OP", alias = "CO_OP", alias = "co-op")]
    CoOp,
}

impl JobType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Internship, Self::CoOp]
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Internship => "INTERNSHIP",
            Self::CoOp => "CO_OP",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Internship => "INTERNSHIP",
            Self::CoOp => "CO-OP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobSeason {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl JobSeason {
    pub const fn ordered() -> [Self; 4] {
        [Self::Spring, Self::Summer, Self::Fall, Self::Winter]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
            Self::Winter => "WINTER",
        }
    }
}

/// Failure to parse one of the closed enumerations from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

fn parse_variant<T: Copy>(
    kind: &'static str,
    raw: &str,
    variants: &[T],
    names: impl Fn(T) -> [&'static str; 2],
) -> Result<T, UnknownVariant> {
    let wanted = raw.trim();
    variants
        .iter()
        .copied()
        .find(|variant| {
            names(*variant)
                .iter()
                .any(|name| name.eq_ignore_ascii_case(wanted))
        })
        .ok_or_else(|| UnknownVariant {
            kind,
            value: raw.to_string(),
        })
}

impl FromStr for SchoolYear {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("school year", s, &Self::ordered(), |v| [v.label(), v.label()])
    }
}

impl FromStr for JobType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("job type", s, &Self::ordered(), |v| [v.label(), v.tag()])
    }
}

impl FromStr for JobSeason {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("job season", s, &Self::ordered(), |v| [v.label(), v.label()])
    }
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for JobSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mailing address. The tertiary line is a room number on a present
/// address and a P.O. Box on a permanent one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub street_address: String,
    pub city_state_zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary: Option<String>,
}

impl Address {
    pub fn new(street_address: impl Into<String>, city_state_zip: impl Into<String>) -> Self {
        Self {
            street_address: street_address.into(),
            city_state_zip: city_state_zip.into(),
            tertiary: None,
        }
    }

    pub fn with_tertiary(mut self, tertiary: impl Into<String>) -> Self {
        self.tertiary = Some(tertiary.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicantError {
    #[error("applicant name '{0}' must contain a first and last name separated by whitespace")]
    MalformedName(String),
}

/// Raw applicant fields as supplied by a profile file or a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub full_name: String,
    #[serde(default)]
    pub middle_initial: Option<String>,
    pub email: String,
    pub github_link: String,
    pub linkedin_link: String,
    pub phone: String,
    pub school_year: SchoolYear,
    #[serde(default)]
    pub is_rising: bool,
    pub present_address: Address,
    pub permanent_address: Address,
}

/// Validated applicant. The first and last names are split off the full
/// name once, at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ApplicantRecord", into = "ApplicantRecord")]
pub struct Applicant {
    record: ApplicantRecord,
    first_name: String,
    last_name: String,
}

impl Applicant {
    pub fn new(record: ApplicantRecord) -> Result<Self, ApplicantError> {
        let (first_name, last_name) = split_full_name(&record.full_name)
            .ok_or_else(|| ApplicantError::MalformedName(record.full_name.clone()))?;
        let middle_initial = record
            .middle_initial
            .as_deref()
            .map(str::trim)
            .filter(|initial| !initial.is_empty())
            .map(str::to_string);

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            record: ApplicantRecord {
                middle_initial,
                ..record
            },
        })
    }

    pub fn full_name(&self) -> &str {
        &self.record.full_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn middle_initial(&self) -> Option<&str> {
        self.record.middle_initial.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.record.email
    }

    pub fn github_link(&self) -> &str {
        &self.record.github_link
    }

    pub fn linkedin_link(&self) -> &str {
        &self.record.linkedin_link
    }

    pub fn phone(&self) -> &str {
        &self.record.phone
    }

    pub fn school_year(&self) -> SchoolYear {
        self.record.school_year
    }

    pub fn is_rising(&self) -> bool {
        self.record.is_rising
    }

    pub fn present_address(&self) -> &Address {
        &self.record.present_address
    }

    pub fn permanent_address(&self) -> &Address {
        &self.record.permanent_address
    }

    pub fn record(&self) -> &ApplicantRecord {
        &self.record
    }
}

// The split name parts are derived from `full_name`, so only the record
// takes part in equality.
impl PartialEq for Applicant {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl Eq for Applicant {}

impl TryFrom<ApplicantRecord> for Applicant {
    type Error = ApplicantError;

    fn try_from(record: ApplicantRecord) -> Result<Self, Self::Error> {
        Self::new(record)
    }
}

impl From<Applicant> for ApplicantRecord {
    fn from(applicant: Applicant) -> Self {
        applicant.record
    }
}

fn split_full_name(full_name: &str) -> Option<(&str, &str)> {
    let trimmed = full_name.trim();
    let split_at = trimmed.find(char::is_whitespace)?;
    let first = &trimmed[..split_at];
    let last = trimmed[split_at..].trim_start();
    if first.is_empty() || last.is_empty() {
        return None;
    }
    Some((first, last))
}

/// Hiring company. Two companies are the same company when their names
/// match, whatever their addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Company {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address: Some(address),
        }
    }

    /// Name-only company, used as a lookup key.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }
}

impl PartialEq for Company {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Company {}

impl Hash for Company {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobCredentialsError {
    #[error("job year '{0}' must be 1-4 digits without a leading zero")]
    InvalidYear(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JobCredentialsRecord", into = "JobCredentialsRecord")]
pub struct JobCredentials {
    job_type: JobType,
    job_season: JobSeason,
    year: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCredentialsRecord {
    pub job_type: JobType,
    pub job_season: JobSeason,
    pub year: String,
}

impl JobCredentials {
    pub fn new(
        job_type: JobType,
        job_season: JobSeason,
        year: impl Into<String>,
    ) -> Result<Self, JobCredentialsError> {
        let year = year.into();
        if !is_valid_year(&year) {
            return Err(JobCredentialsError::InvalidYear(year));
        }

        Ok(Self {
            job_type,
            job_season,
            year,
        })
    }

    /// Summer internship of the year containing `today`. Fails for dates
    /// whose year is not 1 to 9999.
    pub fn default_for(today: NaiveDate) -> Result<Self, JobCredentialsError> {
        Self::new(
            JobType::Internship,
            JobSeason::Summer,
            today.year().to_string(),
        )
    }

    pub fn job_type(&self) -> JobType {
        self.job_type
    }

    pub fn job_season(&self) -> JobSeason {
        self.job_season
    }

    pub fn year(&self) -> &str {
        &self.year
    }
}

fn is_valid_year(year: &str) -> bool {
    (1..=4).contains(&year.len())
        && year.bytes().all(|b| b.is_ascii_digit())
        && !year.starts_with('0')
}

impl TryFrom<JobCredentialsRecord> for JobCredentials {
    type Error = JobCredentialsError;

    fn try_from(record: JobCredentialsRecord) -> Result<Self, Self::Error> {
        Self::new(record.job_type, record.job_season, record.year)
    }
}

impl From<JobCredentials> for JobCredentialsRecord {
    fn from(credentials: JobCredentials) -> Self {
        Self {
            job_type: credentials.job_type,
            job_season: credentials.job_season,
            year: credentials.year,
        }
    }
}
