//! Ephemeris product URL construction.
//!
//! Turns a [`GpsTimeIdentifier`] into download targets for the orbit
//! products hosted on the public archives. Pure string work: nothing here
//! touches the network.
//!
//! Template placeholders:
//!   - `{week}` GPS week, zero-padded to 4 digits
//!   - `{id}`   week + day composite, zero-padded to 5 digits
//!   - `{dow}`  day of week, 0 = Sunday
//!   - `{year}` 4-digit year
//!   - `{doy}`  day of year, zero-padded to 3 digits

use serde::Deserialize;
use std::fmt;

use crate::model::{Compression, GpsTimeIdentifier, Product, RemoteProductDescriptor};

// ---------------------------------------------------------------------------
// Archive templates
// ---------------------------------------------------------------------------

/// SOPAC (Scripps) mirror of the IGS final orbits.
pub const DEFAULT_PRECISE_TEMPLATE: &str =
    "https://garner.ucsd.edu/pub/products/{week}/igs{id}.sp3.Z";

/// SOPAC mirror of the IGS rapid orbits.
pub const DEFAULT_RAPID_TEMPLATE: &str =
    "https://garner.ucsd.edu/pub/products/{week}/igr{id}.sp3.Z";

/// GFZ rapid orbits, long-form (IGS v3) file naming.
pub const DEFAULT_GFZ_TEMPLATE: &str = "https://isdc-data.gfz.de/gnss/products/rapid/w{week}/GFZ0OPSRAP_{year}{doy}0000_01D_05M_ORB.SP3.gz";

/// URL template per product. Deserialized from the `[products]` config
/// section; any omitted entry falls back to the public archive default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductTemplates {
    pub precise: String,
    pub rapid: String,
    pub gfz: String,
}

impl Default for ProductTemplates {
    fn default() -> Self {
        Self {
            precise: DEFAULT_PRECISE_TEMPLATE.to_string(),
            rapid: DEFAULT_RAPID_TEMPLATE.to_string(),
            gfz: DEFAULT_GFZ_TEMPLATE.to_string(),
        }
    }
}

impl ProductTemplates {
    pub fn template_for(&self, product: Product) -> &str {
        match product {
            Product::Precise => &self.precise,
            Product::Rapid => &self.rapid,
            Product::Gfz => &self.gfz,
        }
    }

    /// Checks that every template names a file with a known compression
    /// suffix. Returns a description of the first offending template.
    pub fn validate(&self) -> Result<(), String> {
        for product in Product::ALL {
            let template = self.template_for(product);
            if Compression::from_suffix(template).is_none() {
                return Err(format!(
                    "{} template '{}' must end in .gz or .Z",
                    product, template
                ));
            }
            if !template.contains("{week}") && !template.contains("{id}") && !template.contains("{doy}") {
                return Err(format!(
                    "{} template '{}' has no date placeholder",
                    product, template
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A product template that cannot yield a downloadable file name.
#[derive(Debug, PartialEq)]
pub enum ProductError {
    /// The rendered URL ends in neither `.gz` nor `.Z`.
    UnknownCompression { product: Product, url: String },
}

impl fmt::Display for ProductError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductError::UnknownCompression { product, url } => {
                write!(f, "{} URL '{}' must end in .gz or .Z", product, url)
            }
        }
    }
}

impl std::error::Error for ProductError {}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Substitutes the identifier fields into a single template.
pub fn render_template(template: &str, id: &GpsTimeIdentifier) -> String {
    template
        .replace("{week}", &format!("{:04}", id.week))
        .replace("{id}", &format!("{:05}", id.composite_id))
        .replace("{dow}", &id.day_of_week.to_string())
        .replace("{year}", &format!("{:04}", id.year))
        .replace("{doy}", &format!("{:03}", id.day_of_year))
}

/// Builds one descriptor per selected product.
///
/// Output order follows [`Product::ALL`] regardless of the order (or
/// repetition) of `selected`. Fails on the first selected product whose
/// template has no `.gz`/`.Z` suffix.
pub fn build_product_urls(
    id: &GpsTimeIdentifier,
    selected: &[Product],
    templates: &ProductTemplates,
) -> Result<Vec<RemoteProductDescriptor>, ProductError> {
    Product::ALL
        .iter()
        .filter(|&p| selected.contains(p))
        .map(|&product| {
            let url = render_template(templates.template_for(product), id);
            let compression = Compression::from_suffix(&url)
                .ok_or_else(|| ProductError::UnknownCompression { product, url: url.clone() })?;
            let file_name = url.rsplit('/').next().unwrap_or(&url).to_string();
            Ok(RemoteProductDescriptor {
                product,
                label: product.label().to_string(),
                url,
                file_name,
                compression,
            })
        })
        .collect()
}
