use crate::workflows::cover_letter::domain::Company;
use std::collections::BTreeMap;

/// Companies saved during a session, keyed by name. Nothing here is
/// persisted.
#[derive(Debug, Default, Clone)]
pub struct CompanyBook {
    companies: BTreeMap<String, Company>,
}

impl CompanyBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and keeps the existing entry when a company with the
    /// same name is already saved.
    pub fn save(&mut self, company: Company) -> bool {
        if self.companies.contains_key(&company.name) {
            return false;
        }
        self.companies.insert(company.name.clone(), company);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Company> {
        self.companies.get(name)
    }

    pub fn contains(&self, company: &Company) -> bool {
        self.companies.contains_key(&company.name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.companies.keys().map(String::as_str)
    }

    pub fn companies(&self) -> impl Iterator<Item = &Company> {
        self.companies.values()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}
