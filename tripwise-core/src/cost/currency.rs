use serde::{Deserialize, Serialize};

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    /// `₩1,250`
    Prefix,
    /// `1,250원`
    #[default]
    Suffix,
}

/// The single fixed currency all costs are expressed in.
///
/// # Examples
/// ```
/// use tripwise_core::{Currency, SymbolPosition};
///
/// let won = Currency::default();
/// assert_eq!(won.format(18_000), "18,000원");
///
/// let prefixed = Currency::new("KRW", "₩", SymbolPosition::Prefix);
/// assert_eq!(prefixed.format(-1_250), "-₩1,250");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code.
    pub code: String,
    /// Display symbol.
    pub symbol: String,
    /// Symbol placement.
    #[serde(default)]
    pub position: SymbolPosition,
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("KRW", "원", SymbolPosition::Suffix)
    }
}

impl Currency {
    /// Construct a currency description.
    pub fn new(code: impl Into<String>, symbol: impl Into<String>, position: SymbolPosition) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
            position,
        }
    }

    /// Format a whole amount with thousands separators and the symbol.
    #[must_use]
    pub fn format(&self, amount: i64) -> String {
        let sign = if amount < 0 { "-" } else { "" };
        let digits = group_thousands(amount.unsigned_abs());
        match self.position {
            SymbolPosition::Prefix => format!("{sign}{}{digits}", self.symbol),
            SymbolPosition::Suffix => format!("{sign}{digits}{}", self.symbol),
        }
    }
}

#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "digit grouping works on whole digit positions"
)]
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (len - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
