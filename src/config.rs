use std::path::PathBuf;

const DEFAULT_COMPANY: &str = "Company Name";
const DEFAULT_ADDRESS: &str = "No. XX, Street, City, Sri Lanka";
const DEFAULT_CONTACT: &str = "maintenance@company.com | +94 xx xxx xxxx";
const DEFAULT_LOGO: &str = "public/company-logo.jpg";

/// Company branding and asset locations, read once per render.
#[derive(Clone, Debug, PartialEq)]
pub struct Branding {
    pub company_name: String,
    pub address: String,
    pub contact: String,
    pub logo_path: Option<PathBuf>,
    pub regular_font: Option<PathBuf>,
    pub bold_font: Option<PathBuf>,
}

impl Branding {
    /// Reads `COMPANY_NAME`, `COMPANY_ADDRESS`, `COMPANY_CONTACT`,
    /// `REPORT_LOGO_PATH`, `REPORT_FONT_REGULAR` and `REPORT_FONT_BOLD`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Branding::from_env`] with an arbitrary variable source.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            company_name: get("COMPANY_NAME").unwrap_or_else(|| DEFAULT_COMPANY.into()),
            address: get("COMPANY_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.into()),
            contact: get("COMPANY_CONTACT").unwrap_or_else(|| DEFAULT_CONTACT.into()),
            logo_path: Some(PathBuf::from(
                get("REPORT_LOGO_PATH").unwrap_or_else(|| DEFAULT_LOGO.into()),
            )),
            regular_font: get("REPORT_FONT_REGULAR").map(PathBuf::from),
            bold_font: get("REPORT_FONT_BOLD").map(PathBuf::from),
        }
    }

    /// Text-only branding with built-in fonts; nothing is read from disk.
    pub fn plain(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            address: DEFAULT_ADDRESS.into(),
            contact: DEFAULT_CONTACT.into(),
            logo_path: None,
            regular_font: None,
            bold_font: None,
        }
    }
}

impl Default for Branding {
    fn default() -> Self {
        Self::plain(DEFAULT_COMPANY)
    }
}
