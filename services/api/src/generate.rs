use crate::infra::{load_engine, load_template, today};
use autocv::config::{AppConfig, DocumentConfig};
use autocv::error::AppError;
use autocv::telemetry::{self, LogTarget};
use autocv::workflows::cover_letter::{
    Address, Company, CoverLetterRequest, FilledDocument, JobCredentials, JobSeason,
    JobType,
};
use autocv::workflows::profile::load_profile;
use autocv::workflows::render::{cover_letter_file_name, HeadlessChromeRenderer};
use chrono::{Datelike, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

/// File name of the filled HTML letter inside the output directory.
pub(crate) const HTML_OUTPUT_NAME: &str = "auto_gen_cover_letter.html";

#[derive(Args, Debug, Default)]
pub(crate) struct GenerateArgs {
    /// Hiring company name
    #[arg(long)]
    pub(crate) company: String,
    /// Company street address
    #[arg(long)]
    pub(crate) company_street: Option<String>,
    /// Company city, state and zip
    #[arg(long)]
    pub(crate) company_city_state_zip: Option<String>,
    /// Job title as it should read in the letter
    #[arg(long)]
    pub(crate) job_title: String,
    /// INTERNSHIP or CO-OP (defaults to INTERNSHIP)
    #[arg(long)]
    pub(crate) job_type: Option<JobType>,
    /// FALL, WINTER, SPRING or SUMMER (defaults to SUMMER)
    #[arg(long)]
    pub(crate) season: Option<JobSeason>,
    /// Year the position starts (defaults to the letter date's year)
    #[arg(long)]
    pub(crate) year: Option<String>,
    /// Letter date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Applicant profile file (overrides APP_PROFILE_PATH)
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
    /// Template to fill (overrides APP_TEMPLATE_PATH)
    #[arg(long)]
    pub(crate) template: Option<PathBuf>,
    /// Where to write the filled HTML (defaults to the output directory)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Print the filled HTML to stdout instead of writing a file
    #[arg(long, conflicts_with_all = ["output", "pdf"])]
    pub(crate) stdout: bool,
    /// Print the filled letter to PDF with headless Chrome
    #[arg(long)]
    pub(crate) pdf: bool,
    /// Open the PDF with the system viewer once it is written
    #[arg(long = "open", requires = "pdf")]
    pub(crate) open_pdf: bool,
    /// Fail when the template runs out before every field is filled
    #[arg(long)]
    pub(crate) strict: bool,
}

#[derive(Debug)]
pub(crate) struct GeneratedLetter {
    pub(crate) document: FilledDocument,
    pub(crate) html_path: Option<PathBuf>,
    pub(crate) pdf_path: Option<PathBuf>,
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;

    let to_stdout = args.stdout;
    let letter = generate_letter(args, &config.documents, today())?;

    if to_stdout {
        print!("{}", letter.document.to_text());
        return Ok(());
    }

    println!(
        "Filled {} field(s) across {} line(s)",
        letter.document.substitutions.len(),
        letter.document.lines.len()
    );
    if !letter.document.is_complete() {
        println!("Unresolved fields:");
        for field in &letter.document.unresolved {
            println!("  - {field}");
        }
    }
    if let Some(path) = &letter.html_path {
        println!("HTML written to {}", path.display());
    }
    if let Some(path) = &letter.pdf_path {
        println!("PDF written to {}", path.display());
    }
    Ok(())
}

pub(crate) fn generate_letter(
    args: GenerateArgs,
    config: &DocumentConfig,
    today: NaiveDate,
) -> Result<GeneratedLetter, AppError> {
    let GenerateArgs {
        company,
        company_street,
        company_city_state_zip,
        job_title,
        job_type,
        season,
        year,
        date,
        profile,
        template,
        output,
        stdout,
        pdf,
        open_pdf,
        strict,
    } = args;

    let mut config = config.clone();
    if let Some(path) = profile {
        config.profile_path = path;
    }
    if template.is_some() {
        config.template_path = template;
    }

    let date = date.unwrap_or(today);
    let applicant = load_profile(&config.profile_path)?;
    let company = company_for(company, company_street, company_city_state_zip)?;
    let job = job_for(job_type, season, year, date)?;
    let engine = load_engine(&config)?;
    let template = load_template(&config)?;

    let request = CoverLetterRequest {
        applicant,
        company,
        job,
        job_title,
        date,
    };
    let document = request.fill(&engine, &template)?;

    if !document.is_complete() {
        let missing = document
            .unresolved
            .iter()
            .map(|field| field.name())
            .collect::<Vec<_>>()
            .join(", ");
        if strict {
            return Err(AppError::Rejected(format!(
                "template ran out before filling {missing}"
            )));
        }
        warn!(unresolved = %missing, "cover letter template is incomplete");
    }

    if stdout {
        return Ok(GeneratedLetter {
            document,
            html_path: None,
            pdf_path: None,
        });
    }

    let html_path = output.unwrap_or_else(|| config.output_dir.join(HTML_OUTPUT_NAME));
    if let Some(parent) = html_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&html_path, document.to_text())?;
    info!(path = %html_path.display(), company = %request.company, "wrote cover letter");

    let pdf_path = if pdf {
        let pdf_path = config
            .output_dir
            .join(cover_letter_file_name(&request.applicant));
        std::fs::create_dir_all(&config.output_dir)?;
        HeadlessChromeRenderer::new(&config.chrome_path).render(&html_path, &pdf_path)?;
        if open_pdf {
            if let Err(err) = open::that(&pdf_path) {
                warn!(path = %pdf_path.display(), error = %err, "failed to open cover letter PDF");
            }
        }
        Some(pdf_path)
    } else {
        None
    };

    Ok(GeneratedLetter {
        document,
        html_path: Some(html_path),
        pdf_path,
    })
}

fn company_for(
    name: String,
    street: Option<String>,
    city_state_zip: Option<String>,
) -> Result<Company, AppError> {
    match (street, city_state_zip) {
        (Some(street), Some(city_state_zip)) => {
            Ok(Company::new(name, Address::new(street, city_state_zip)))
        }
        (None, None) => Ok(Company::named(name)),
        _ => Err(AppError::Rejected(
            "company street and city/state/zip must be given together".to_string(),
        )),
    }
}

/// Unset parts fall back to a summer internship in the letter's year.
fn job_for(
    job_type: Option<JobType>,
    season: Option<JobSeason>,
    year: Option<String>,
    date: NaiveDate,
) -> Result<JobCredentials, AppError> {
    let year = year.unwrap_or_else(|| date.year().to_string());
    Ok(JobCredentials::new(
        job_type.unwrap_or(JobType::Internship),
        season.unwrap_or(JobSeason::Summer),
        year,
    )?)
}

pub(crate) fn run_fields() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;

    let engine = load_engine(&config.documents)?;
    for (index, field) in engine.traversal().ordered().iter().enumerate() {
        println!("{:>2}. {}", index + 1, field.marker());
    }
    Ok(())
}
