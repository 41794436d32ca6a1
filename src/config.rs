//! Run configuration loaded from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::pipeline::Sources;
use crate::report::{CurrencyFormat, ReportOptions};

/// File names of the five source tables, relative to [`DashboardConfig::data_dir`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub orders: String,
    pub payments: String,
    pub items: String,
    pub products: String,
    pub customers: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            orders: "data_1_orders.csv".to_string(),
            payments: "data_2_payments.csv".to_string(),
            items: "data_3_items.csv".to_string(),
            products: "data_4_products.csv".to_string(),
            customers: "data_5_customers.csv".to_string(),
        }
    }
}

/// Everything a dashboard run needs. Missing fields take their defaults.
///
/// ```rust
/// use ecommerce_dashboard::config::DashboardConfig;
///
/// let cfg: DashboardConfig = serde_json::from_str(r#"{ "locale": "pt_BR", "currency": "BRL" }"#).unwrap();
/// assert_eq!(cfg.top_n, 8);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub files: SourceFiles,
    pub title: String,
    pub hero_image: Option<String>,
    pub currency: String,
    pub locale: String,
    pub top_n: usize,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            files: SourceFiles::default(),
            title: "E-Commerce Sales".to_string(),
            hero_image: None,
            currency: "IDR".to_string(),
            locale: "id_ID".to_string(),
            top_n: 8,
            output: PathBuf::from("dashboard.html"),
            json_output: None,
        }
    }
}

impl DashboardConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> DashboardResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.top_n == 0 {
            return Err(DashboardError::Config {
                message: "top_n must be at least 1".to_string(),
            });
        }
        self.currency_format().map(|_| ())
    }

    pub fn currency_format(&self) -> DashboardResult<CurrencyFormat> {
        CurrencyFormat::new(&self.currency, &self.locale)
    }

    /// Absolute-or-relative paths of the five tables under `data_dir`.
    pub fn sources(&self) -> Sources {
        let dir = &self.data_dir;
        Sources {
            orders: dir.join(&self.files.orders),
            payments: dir.join(&self.files.payments),
            items: dir.join(&self.files.items),
            products: dir.join(&self.files.products),
            customers: dir.join(&self.files.customers),
        }
    }

    pub fn report_options(&self) -> DashboardResult<ReportOptions> {
        Ok(ReportOptions {
            title: self.title.clone(),
            hero_image: self.hero_image.clone(),
            currency: self.currency_format()?,
            top_n: self.top_n,
        })
    }
}
