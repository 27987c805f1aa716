use std::path::PathBuf;

use tracing::warn;

/// Letterhead shown at the top of every invoice page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "ProMayoufTech".to_string(),
            address: "123 Tech Avenue, Silicon Valley, CA 94000".to_string(),
            contact: "contact@promayouftech.com | +1-555-TECH-BIZ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceConfig {
    pub company: CompanyProfile,
    /// PNG drawn at the top-left of every page.
    pub logo_path: Option<PathBuf>,
    /// Flate-compress page content.
    pub compress: bool,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            company: CompanyProfile::default(),
            logo_path: None,
            compress: true,
        }
    }
}

impl InvoiceConfig {
    /// Defaults overridden by `INVOICE_COMPANY_NAME`, `INVOICE_COMPANY_ADDRESS`,
    /// `INVOICE_COMPANY_CONTACT`, `INVOICE_LOGO_PATH` and `INVOICE_COMPRESS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(name) = var("INVOICE_COMPANY_NAME") {
            config.company.name = name;
        }
        if let Some(address) = var("INVOICE_COMPANY_ADDRESS") {
            config.company.address = address;
        }
        if let Some(contact) = var("INVOICE_COMPANY_CONTACT") {
            config.company.contact = contact;
        }
        config.logo_path = var("INVOICE_LOGO_PATH").map(PathBuf::from);

        if let Some(raw) = var("INVOICE_COMPRESS") {
            match parse_flag(&raw) {
                Some(flag) => config.compress = flag,
                None => warn!(value = %raw, "ignoring unrecognized INVOICE_COMPRESS"),
            }
        }
        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
