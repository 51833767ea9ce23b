use crate::error::ExtractError;
use crate::extractor::{self, decode_dropping_invalid, html_to_text};
use std::path::Path;

/// Built-in term sheet used when no template resource is bundled
pub const FALLBACK_TEMPLATE: &str = "COMMERCIAL LEASE TERM SHEET

Property Address: [Address]
Tenant Name: [Tenant Name]
Landlord Name: [Landlord Name]

LEASE TERMS:

1. PREMISES
   - Suite/Unit Number: [Suite]
   - Rentable Square Feet: [SF]
   - Use: [Permitted Use]

2. LEASE TERM
   - Commencement Date: [Date]
   - Expiration Date: [Date]
   - Term Length: [Years/Months]
   - Option to Extend: [Yes/No, Terms]

3. BASE RENT
   - Initial Annual Base Rent: [Amount]
   - Monthly Base Rent: [Amount]
   - Rent Escalations: [Schedule]

4. ADDITIONAL RENT
   - Operating Expenses: [Details]
   - Property Taxes: [Details]
   - Utilities: [Responsibility]
   - CAM Charges: [Details]

5. SECURITY DEPOSIT
   - Amount: [Amount]
   - Terms: [Details]

6. TENANT IMPROVEMENTS
   - Tenant Improvement Allowance: [Amount]
   - Construction Period: [Timeline]

7. PARKING
   - Number of Spaces: [Number]
   - Type: [Reserved/Unreserved]
   - Cost: [Amount if any]

8. SPECIAL PROVISIONS
   - [Any special terms or conditions]

9. BROKER INFORMATION
   - Landlord's Broker: [Name]
   - Tenant's Broker: [Name]
";

/// Headings-only outline used when the resource exists but cannot be read
pub const FALLBACK_OUTLINE: &str = "COMMERCIAL LEASE TERM SHEET

Property Address: [Address]
Tenant Name: [Tenant Name]
Landlord Name: [Landlord Name]

LEASE TERMS:

1. PREMISES
2. LEASE TERM
3. BASE RENT
4. ADDITIONAL RENT
5. SECURITY DEPOSIT
6. TENANT IMPROVEMENTS
7. PARKING
8. SPECIAL PROVISIONS
9. BROKER INFORMATION
";

/// Where a template's text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// HTML resource file shipped next to the application
    Bundled,
    /// Built-in nine-section term sheet
    Fallback,
    /// Built-in outline, used when the resource could not be read
    Outline,
    /// Supplied with a single request
    Uploaded { filename: String },
}

/// Term sheet template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub text: String,
    pub source: TemplateSource,
}

impl Template {
    pub fn new(text: impl Into<String>, source: TemplateSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// Build a per-request template from an uploaded document
    pub fn from_upload(bytes: &[u8], filename: &str) -> Result<Self, ExtractError> {
        let text = extractor::extract_bytes(bytes, filename)?;
        Ok(Self::new(
            text,
            TemplateSource::Uploaded {
                filename: filename.to_string(),
            },
        ))
    }

    /// First `max_chars` characters, for display
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Load the default template once at startup.
///
/// The resource is an HTML file reduced to its visible text. A missing
/// file gives [`FALLBACK_TEMPLATE`] and an unreadable one gives
/// [`FALLBACK_OUTLINE`]; this never fails.
pub fn load_default_template<P: AsRef<Path>>(path: P) -> Template {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(
            path = %path.display(),
            "Template resource not found, using built-in term sheet"
        );
        return Template::new(FALLBACK_TEMPLATE, TemplateSource::Fallback);
    }

    match std::fs::read(path) {
        Ok(bytes) => {
            let html = decode_dropping_invalid(&bytes);
            Template::new(html_to_text(&html), TemplateSource::Bundled)
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read template resource, using outline"
            );
            Template::new(FALLBACK_OUTLINE, TemplateSource::Outline)
        }
    }
}
