use autocv::config::{AppConfig, DocumentConfig};
use autocv::error::AppError;
use autocv::telemetry::{self, LogTarget};
use autocv::workflows::cover_letter::{Address, Applicant, ApplicantRecord, SchoolYear};
use autocv::workflows::profile::{load_profile, save_profile};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ProfileShowArgs {
    /// Applicant profile file (overrides APP_PROFILE_PATH)
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
}

/// Edits the stored profile. Flags left out keep their saved values; on a
/// first save every required flag must be given. An empty value clears the
/// middle initial, room and P.O. Box.
#[derive(Args, Debug, Default)]
pub(crate) struct ProfileSetArgs {
    /// Applicant profile file (overrides APP_PROFILE_PATH)
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
    /// Full name, first name then last name
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) middle_initial: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) github: Option<String>,
    #[arg(long)]
    pub(crate) linkedin: Option<String>,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// FRESHMAN, SOPHOMORE, JUNIOR or SENIOR
    #[arg(long)]
    pub(crate) school_year: Option<SchoolYear>,
    /// Whether the school year is a rising one (true or false)
    #[arg(long)]
    pub(crate) rising: Option<bool>,
    #[arg(long)]
    pub(crate) present_street: Option<String>,
    #[arg(long)]
    pub(crate) present_city_state_zip: Option<String>,
    #[arg(long)]
    pub(crate) present_room: Option<String>,
    #[arg(long)]
    pub(crate) permanent_street: Option<String>,
    #[arg(long)]
    pub(crate) permanent_city_state_zip: Option<String>,
    #[arg(long)]
    pub(crate) permanent_po_box: Option<String>,
}

pub(crate) fn run_profile_show(args: ProfileShowArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;

    let path = args.profile.unwrap_or(config.documents.profile_path);
    let applicant = load_profile(&path)?;
    println!("Profile {}", path.display());
    print_applicant(&applicant);
    Ok(())
}

pub(crate) fn run_profile_set(args: ProfileSetArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;

    let (path, applicant) = set_profile(args, &config.documents)?;
    println!("Saved profile {}", path.display());
    print_applicant(&applicant);
    Ok(())
}

/// Validates the merged profile before anything is written.
pub(crate) fn set_profile(
    args: ProfileSetArgs,
    config: &DocumentConfig,
) -> Result<(PathBuf, Applicant), AppError> {
    let path = args
        .profile
        .clone()
        .unwrap_or_else(|| config.profile_path.clone());
    let existing = if path.exists() {
        Some(load_profile(&path)?.record().clone())
    } else {
        None
    };

    let applicant = Applicant::new(merge_record(existing, args)?)?;
    save_profile(&path, &applicant)?;
    info!(path = %path.display(), "saved applicant profile");
    Ok((path, applicant))
}

fn merge_record(
    existing: Option<ApplicantRecord>,
    args: ProfileSetArgs,
) -> Result<ApplicantRecord, AppError> {
    let ProfileSetArgs {
        profile: _,
        name,
        middle_initial,
        email,
        github,
        linkedin,
        phone,
        school_year,
        rising,
        present_street,
        present_city_state_zip,
        present_room,
        permanent_street,
        permanent_city_state_zip,
        permanent_po_box,
    } = args;

    if let Some(mut record) = existing {
        replace(&mut record.full_name, name);
        replace(&mut record.email, email);
        replace(&mut record.github_link, github);
        replace(&mut record.linkedin_link, linkedin);
        replace(&mut record.phone, phone);
        replace(&mut record.present_address.street_address, present_street);
        replace(
            &mut record.present_address.city_state_zip,
            present_city_state_zip,
        );
        replace(&mut record.permanent_address.street_address, permanent_street);
        replace(
            &mut record.permanent_address.city_state_zip,
            permanent_city_state_zip,
        );
        if let Some(value) = middle_initial {
            record.middle_initial = clearable(value);
        }
        if let Some(value) = present_room {
            record.present_address.tertiary = clearable(value);
        }
        if let Some(value) = permanent_po_box {
            record.permanent_address.tertiary = clearable(value);
        }
        if let Some(year) = school_year {
            record.school_year = year;
        }
        if let Some(rising) = rising {
            record.is_rising = rising;
        }
        return Ok(record);
    }

    let mut missing = Vec::new();
    let mut require = |value: Option<String>, flag: &'static str| {
        if value.is_none() {
            missing.push(flag);
        }
        value.unwrap_or_default()
    };
    let full_name = require(name, "--name");
    let email = require(email, "--email");
    let github_link = require(github, "--github");
    let linkedin_link = require(linkedin, "--linkedin");
    let phone = require(phone, "--phone");
    let present_street = require(present_street, "--present-street");
    let present_city_state_zip = require(present_city_state_zip, "--present-city-state-zip");
    let permanent_street = require(permanent_street, "--permanent-street");
    let permanent_city_state_zip =
        require(permanent_city_state_zip, "--permanent-city-state-zip");
    if school_year.is_none() {
        missing.push("--school-year");
    }

    let Some(school_year) = school_year.filter(|_| missing.is_empty()) else {
        return Err(AppError::Rejected(format!(
            "no saved profile yet; also pass {}",
            missing.join(", ")
        )));
    };

    Ok(ApplicantRecord {
        full_name,
        middle_initial: middle_initial.and_then(clearable),
        email,
        github_link,
        linkedin_link,
        phone,
        school_year,
        is_rising: rising.unwrap_or(false),
        present_address: Address {
            street_address: present_street,
            city_state_zip: present_city_state_zip,
            tertiary: present_room.and_then(clearable),
        },
        permanent_address: Address {
            street_address: permanent_street,
            city_state_zip: permanent_city_state_zip,
            tertiary: permanent_po_box.and_then(clearable),
        },
    })
}

fn replace(slot: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn clearable(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn print_applicant(applicant: &Applicant) {
    let rising = if applicant.is_rising() { "rising " } else { "" };
    println!("- Name: {}", applicant.full_name());
    println!(
        "- Middle initial: {}",
        applicant.middle_initial().unwrap_or("(none)")
    );
    println!("- Email: {}", applicant.email());
    println!("- GitHub: {}", applicant.github_link());
    println!("- LinkedIn: {}", applicant.linkedin_link());
    println!("- Phone: {}", applicant.phone());
    println!("- Year: {rising}{}", applicant.school_year());
    print_address("Present address", applicant.present_address());
    print_address("Permanent address", applicant.permanent_address());
}

fn print_address(label: &str, address: &Address) {
    println!("- {label}: {}, {}", address.street_address, address.city_state_zip);
    if let Some(tertiary) = &address.tertiary {
        println!("  {tertiary}");
    }
}
