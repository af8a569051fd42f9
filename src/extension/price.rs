//! Price label shown next to a product.

use std::fmt;

use crate::catalog::{Money, PriceRange};

/// Formats a product's price range.
///
/// A single price renders as `"29.90 EUR"`; differing variant prices render
/// as `"19.90 EUR - 29.90 EUR"`.
///
/// ```rust
/// use shopify_product::extension::PriceLabel;
/// use shopify_product::{Money, PriceRange};
///
/// let money = |amount: &str| Money { amount: amount.into(), currency_code: "EUR".into() };
/// let range = PriceRange { min_variant_price: money("19.9"), max_variant_price: money("29.9") };
/// assert_eq!(PriceLabel::new(&range).to_string(), "19.90 EUR - 29.90 EUR");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceLabel {
    min: Money,
    max: Money,
}

impl PriceLabel {
    #[must_use]
    pub fn new(range: &PriceRange) -> Self {
        Self {
            min: range.min_variant_price.clone(),
            max: range.max_variant_price.clone(),
        }
    }

    /// Returns `true` when the label shows a range.
    #[must_use]
    pub fn is_range(&self) -> bool {
        self.min.amount != self.max.amount
    }
}

struct Amount<'a>(&'a Money);

/// Number of fraction digits in a plain decimal such as `-12.5`.
fn fraction_len(amount: &str) -> Option<usize> {
    let unsigned = amount.strip_prefix('-').unwrap_or(amount);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    (!whole.is_empty() && digits(whole) && digits(fraction)).then_some(fraction.len())
}

impl fmt::Display for Amount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Money {
            amount,
            currency_code,
        } = self.0;
        // Decimals are padded to two places and never rounded; anything else
        // is shown as sent.
        match fraction_len(amount) {
            Some(len) => {
                let point = if amount.contains('.') { "" } else { "." };
                let zeros = "00".get(len..).unwrap_or_default();
                write!(f, "{amount}{point}{zeros} {currency_code}")
            }
            None => write!(f, "{amount} {currency_code}"),
        }
    }
}

impl fmt::Display for PriceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_range() {
            write!(f, "{} - {}", Amount(&self.min), Amount(&self.max))
        } else {
            write!(f, "{}", Amount(&self.max))
        }
    }
}
