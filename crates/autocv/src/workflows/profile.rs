//! Flat applicant profile file.
//!
//! One value per line, in a fixed order: full name, middle initial, email,
//! GitHub link, LinkedIn link, phone, school year, is-rising flag, then the
//! present and permanent addresses as three lines each (street,
//! city/state/zip, tertiary). Blank middle initial and tertiary lines mean
//! "not set".

use crate::workflows::cover_letter::domain::{
    Address, Applicant, ApplicantError, ApplicantRecord, SchoolYear, UnknownVariant,
};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use tracing::debug;

const PROFILE_FIELDS: [&str; 14] = [
    "full name",
    "middle initial",
    "email",
    "GitHub link",
    "LinkedIn link",
    "phone",
    "school year",
    "is rising",
    "present street address",
    "present city/state/zip",
    "present room",
    "permanent street address",
    "permanent city/state/zip",
    "permanent P.O. Box",
];

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to access applicant profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("applicant profile ends at line {line}; expected the {field}")]
    MissingLine { line: usize, field: &'static str },
    #[error("applicant profile line 7: {0}")]
    InvalidSchoolYear(#[from] UnknownVariant),
    #[error("applicant profile line 8: expected 'true' or 'false', found '{0}'")]
    InvalidFlag(String),
    #[error("applicant profile holds an invalid applicant: {0}")]
    Applicant(#[from] ApplicantError),
}

pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<Applicant, ProfileError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let applicant = parse_profile(file)?;
    debug!(path = %path.display(), "loaded applicant profile");
    Ok(applicant)
}

pub fn parse_profile<R: Read>(reader: R) -> Result<Applicant, ProfileError> {
    let mut lines = BufReader::new(reader).lines();
    let mut values: Vec<String> = Vec::with_capacity(PROFILE_FIELDS.len());

    for (index, field) in PROFILE_FIELDS.into_iter().enumerate() {
        match lines.next() {
            Some(line) => values.push(line?.trim_end_matches('\r').to_string()),
            None => {
                return Err(ProfileError::MissingLine {
                    line: index + 1,
                    field,
                })
            }
        }
    }

    let mut values = values.into_iter();
    let mut next = || values.next().unwrap_or_default();

    let full_name = next();
    let middle_initial = optional(next());
    let email = next();
    let github_link = next();
    let linkedin_link = next();
    let phone = next();
    let school_year: SchoolYear = next().parse()?;
    let is_rising = parse_flag(&next())?;
    let present_address = address(next(), next(), next());
    let permanent_address = address(next(), next(), next());

    let applicant = Applicant::new(ApplicantRecord {
        full_name,
        middle_initial,
        email,
        github_link,
        linkedin_link,
        phone,
        school_year,
        is_rising,
        present_address,
        permanent_address,
    })?;

    Ok(applicant)
}

pub fn write_profile<W: Write>(applicant: &Applicant, mut writer: W) -> Result<(), ProfileError> {
    let present = applicant.present_address();
    let permanent = applicant.permanent_address();
    let rising = if applicant.is_rising() { "true" } else { "false" };
    let lines: [&str; 14] = [
        applicant.full_name(),
        applicant.middle_initial().unwrap_or_default(),
        applicant.email(),
        applicant.github_link(),
        applicant.linkedin_link(),
        applicant.phone(),
        applicant.school_year().label(),
        rising,
        &present.street_address,
        &present.city_state_zip,
        present.tertiary.as_deref().unwrap_or_default(),
        &permanent.street_address,
        &permanent.city_state_zip,
        permanent.tertiary.as_deref().unwrap_or_default(),
    ];

    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Overwrites the profile at `path`, creating its directory on first save.
pub fn save_profile<P: AsRef<Path>>(path: P, applicant: &Applicant) -> Result<(), ProfileError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_profile(applicant, std::io::BufWriter::new(file))?;
    debug!(path = %path.display(), "saved applicant profile");
    Ok(())
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn address(street_address: String, city_state_zip: String, tertiary: String) -> Address {
    Address {
        street_address,
        city_state_zip,
        tertiary: optional(tertiary),
    }
}

fn parse_flag(raw: &str) -> Result<bool, ProfileError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ProfileError::InvalidFlag(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PROFILE: &str = "Grace Hopper\n\
Q\n\
grace@example.edu\n\
github.com/ghopper\n\
linkedin.com/in/ghopper\n\
(555) 010-0199\n\
JUNIOR\n\
true\n\
300 Dorm Way\n\
Ames, IA 50011\n\
Room 214\n\
12 Oak Ave\n\
Cedar Rapids, IA 52401\n\
\n";

    #[test]
    fn parses_every_line_in_order() {
        let applicant = parse_profile(Cursor::new(PROFILE)).expect("profile parses");
        assert_eq!(applicant.first_name(), "Grace");
        assert_eq!(applicant.middle_initial(), Some("Q"));
        assert_eq!(applicant.school_year(), SchoolYear::Junior);
        assert!(applicant.is_rising());
        assert_eq!(
            applicant.present_address().tertiary.as_deref(),
            Some("Room 214")
        );
        assert_eq!(applicant.permanent_address().tertiary, None);
        assert_eq!(applicant.permanent_address().city_state_zip, "Cedar Rapids, IA 52401");
    }

    #[test]
    fn write_then_parse_preserves_the_applicant() {
        let applicant = parse_profile(Cursor::new(PROFILE)).expect("profile parses");
        let mut buffer = Vec::new();
        write_profile(&applicant, &mut buffer).expect("profile writes");
        assert_eq!(String::from_utf8(buffer.clone()).expect("utf8"), PROFILE);
        assert_eq!(parse_profile(Cursor::new(buffer)).expect("reparse"), applicant);
    }

    #[test]
    fn truncated_profile_names_the_missing_field() {
        let truncated: String = PROFILE.lines().take(6).map(|l| format!("{l}\n")).collect();
        match parse_profile(Cursor::new(truncated)) {
            Err(ProfileError::MissingLine { line, field }) => {
                assert_eq!(line, 7);
                assert_eq!(field, "school year");
            }
            other => panic!("expected missing line error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_school_year_and_flag() {
        let bad_year = PROFILE.replace("JUNIOR", "GRADUATE");
        assert!(matches!(
            parse_profile(Cursor::new(bad_year)),
            Err(ProfileError::InvalidSchoolYear(_))
        ));

        let bad_flag = PROFILE.replace("true", "maybe");
        assert!(matches!(
            parse_profile(Cursor::new(bad_flag)),
            Err(ProfileError::InvalidFlag(value)) if value == "maybe"
        ));
    }

    #[test]
    fn rejects_single_word_names() {
        let single = PROFILE.replace("Grace Hopper", "Grace");
        assert!(matches!(
            parse_profile(Cursor::new(single)),
            Err(ProfileError::Applicant(ApplicantError::MalformedName(_)))
        ));
    }

    #[test]
    fn save_and_load_through_the_filesystem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.info");
        let applicant = parse_profile(Cursor::new(PROFILE)).expect("profile parses");

        save_profile(&path, &applicant).expect("save succeeds");
        assert_eq!(load_profile(&path).expect("load succeeds"), applicant);
    }

    #[test]
    fn first_save_creates_the_profile_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app_data").join("config.info");
        let applicant = parse_profile(Cursor::new(PROFILE)).expect("profile parses");

        save_profile(&path, &applicant).expect("save succeeds");
        assert_eq!(load_profile(&path).expect("load succeeds"), applicant);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_profile("./does-not-exist.info"),
            Err(ProfileError::Io(_))
        ));
    }
}
