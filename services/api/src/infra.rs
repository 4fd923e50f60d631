use autocv::config::DocumentConfig;
use autocv::error::AppError;
use autocv::workflows::companies::CompanyBook;
use autocv::workflows::cover_letter::{CoverLetterEngine, FieldTraversal, STANDARD_TEMPLATE};
use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared by every cover letter request. Only the company book changes
/// after startup.
#[derive(Clone)]
pub(crate) struct DocumentState {
    pub(crate) engine: Arc<CoverLetterEngine>,
    pub(crate) template: Arc<str>,
    pub(crate) companies: Arc<Mutex<CompanyBook>>,
}

impl DocumentState {
    pub(crate) fn new(engine: CoverLetterEngine, template: String) -> Self {
        Self {
            engine: Arc::new(engine),
            template: Arc::from(template),
            companies: Arc::new(Mutex::new(CompanyBook::new())),
        }
    }

    pub(crate) fn from_config(config: &DocumentConfig) -> Result<Self, AppError> {
        Ok(Self::new(load_engine(config)?, load_template(config)?))
    }
}

/// Standard field order unless a traversal table is configured. A bad table
/// stops startup.
pub(crate) fn load_engine(config: &DocumentConfig) -> Result<CoverLetterEngine, AppError> {
    let traversal = match &config.traversal_path {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            let traversal = FieldTraversal::from_json_reader(file)?;
            info!(path = %path.display(), fields = traversal.len(), "loaded field traversal table");
            traversal
        }
        None => FieldTraversal::standard()?,
    };
    Ok(CoverLetterEngine::new(traversal))
}

pub(crate) fn load_template(config: &DocumentConfig) -> Result<String, AppError> {
    match &config.template_path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(STANDARD_TEMPLATE.to_string()),
    }
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
pub(crate) fn document_config(dir: &std::path::Path) -> DocumentConfig {
    DocumentConfig {
        template_path: None,
        profile_path: dir.join("config.info"),
        output_dir: dir.to_path_buf(),
        traversal_path: None,
        chrome_path: dir.join("no-such-browser"),
    }
}
