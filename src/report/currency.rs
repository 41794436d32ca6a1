//! Locale-aware currency and integer formatting for report labels.

use crate::error::{DashboardError, DashboardResult};

/// Locales with a known currency layout.
pub const SUPPORTED_LOCALES: &[&str] = &["id_ID", "pt_BR", "en_US", "en_GB", "de_DE"];

/// Currency formatter for one (currency, locale) pair.
///
/// ```rust
/// use ecommerce_dashboard::report::CurrencyFormat;
///
/// let idr = CurrencyFormat::new("IDR", "id_ID").unwrap();
/// assert_eq!(idr.format(1234567.891), "Rp1.234.567,89");
///
/// let usd = CurrencyFormat::new("USD", "en_US").unwrap();
/// assert_eq!(usd.format(-1234.5), "-$1,234.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
    grouping: char,
    decimal: char,
    /// Symbol goes after the number (`1.234,50 €`).
    symbol_after: bool,
    /// Non-breaking space between symbol and number.
    spaced: bool,
}

impl CurrencyFormat {
    /// Build a formatter. Unknown currency codes are used verbatim as the symbol; unknown
    /// locales are a [`DashboardError::Config`].
    pub fn new(currency: &str, locale: &str) -> DashboardResult<Self> {
        let symbol = currency_symbol(currency);
        let (grouping, decimal, symbol_after, spaced) = match locale {
            "id_ID" => ('.', ',', false, false),
            "pt_BR" => ('.', ',', false, true),
            "en_US" | "en_GB" => (',', '.', false, false),
            "de_DE" => ('.', ',', true, true),
            other => {
                return Err(DashboardError::Config {
                    message: format!(
                        "unsupported locale '{other}' (supported: {})",
                        SUPPORTED_LOCALES.join(", ")
                    ),
                });
            }
        };
        Ok(Self {
            symbol,
            grouping,
            decimal,
            symbol_after,
            spaced,
        })
    }

    /// Format `value` rounded to two decimals.
    pub fn format(&self, value: f64) -> String {
        let cents = (value.abs() * 100.0).round() as u128;
        let whole = group_digits(cents / 100, self.grouping);
        let number = format!("{whole}{}{:02}", self.decimal, cents % 100);
        let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
        let space = if self.spaced { "\u{a0}" } else { "" };

        if self.symbol_after {
            format!("{sign}{number}{space}{}", self.symbol)
        } else {
            format!("{sign}{}{space}{number}", self.symbol)
        }
    }
}

fn currency_symbol(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "IDR" => "Rp".to_string(),
        "BRL" => "R$".to_string(),
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        _ => code.to_string(),
    }
}

/// Format an integer with `,` thousands separators (`1234567` -> `1,234,567`).
pub fn group_thousands(n: i64) -> String {
    let grouped = group_digits(u128::from(n.unsigned_abs()), ',');
    if n < 0 { format!("-{grouped}") } else { grouped }
}

fn group_digits(n: u128, sep: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}
