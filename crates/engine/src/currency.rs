use crate::{EngineError, Money};

/// A display currency the user can pick.
///
/// Amounts are always stored as [`Money`] cents; the currency only changes how
/// they are rendered. The preference is persisted by the store (see
/// [`Engine::currency_preference`](crate::Engine::currency_preference)) and is
/// passed explicitly to whoever formats money.
///
/// ## Fraction digits
///
/// `JPY` and `KRW` are rendered without fraction digits (amounts are rounded
/// half away from zero); every other currency uses two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Currency {
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    locale: &'static str,
}

const fn currency(
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    locale: &'static str,
) -> Currency {
    Currency {
        code,
        name,
        symbol,
        locale,
    }
}

const AVAILABLE: [Currency; 34] = [
    currency("USD", "US Dollar", "$", "en-US"),
    currency("EUR", "Euro", "€", "de-DE"),
    currency("GBP", "British Pound", "£", "en-GB"),
    currency("JPY", "Japanese Yen", "¥", "ja-JP"),
    currency("CNY", "Chinese Yuan", "¥", "zh-CN"),
    currency("KRW", "South Korean Won", "₩", "ko-KR"),
    currency("PHP", "Philippine Peso", "₱", "en-PH"),
    currency("INR", "Indian Rupee", "₹", "en-IN"),
    currency("CAD", "Canadian Dollar", "C$", "en-CA"),
    currency("AUD", "Australian Dollar", "A$", "en-AU"),
    currency("CHF", "Swiss Franc", "Fr", "de-CH"),
    currency("SGD", "Singapore Dollar", "S$", "en-SG"),
    currency("MYR", "Malaysian Ringgit", "RM", "en-MY"),
    currency("THB", "Thai Baht", "฿", "th-TH"),
    currency("IDR", "Indonesian Rupiah", "Rp", "en-ID"),
    currency("VND", "Vietnamese Dong", "₫", "vi-VN"),
    currency("BRL", "Brazilian Real", "R$", "pt-BR"),
    currency("MXN", "Mexican Peso", "$", "es-MX"),
    currency("ARS", "Argentine Peso", "$", "es-AR"),
    currency("RUB", "Russian Ruble", "₽", "ru-RU"),
    currency("ZAR", "South African Rand", "R", "en-ZA"),
    currency("TRY", "Turkish Lira", "₺", "tr-TR"),
    currency("SAR", "Saudi Riyal", "﷼", "en-SA"),
    currency("AED", "UAE Dirham", "د.إ", "en-AE"),
    currency("SEK", "Swedish Krona", "kr", "sv-SE"),
    currency("NOK", "Norwegian Krone", "kr", "nb-NO"),
    currency("DKK", "Danish Krone", "kr", "da-DK"),
    currency("PLN", "Polish Złoty", "zł", "pl-PL"),
    currency("CZK", "Czech Koruna", "Kč", "cs-CZ"),
    currency("HUF", "Hungarian Forint", "Ft", "hu-HU"),
    currency("RON", "Romanian Leu", "lei", "ro-RO"),
    currency("BGN", "Bulgarian Lev", "лв", "bg-BG"),
    currency("HRK", "Croatian Kuna", "kn", "hr-HR"),
    currency("ISK", "Icelandic Króna", "kr", "is-IS"),
];

impl Currency {
    pub const USD: Currency = AVAILABLE[0];
    pub const EUR: Currency = AVAILABLE[1];

    /// Every selectable currency, in picker order.
    #[must_use]
    pub fn all() -> &'static [Currency] {
        &AVAILABLE
    }

    /// Looks a currency up by ISO code (case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Currency> {
        let code = code.trim();
        AVAILABLE
            .iter()
            .copied()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        self.code
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        self.symbol
    }

    /// BCP 47 locale tag used to pick separators and symbol placement.
    #[must_use]
    pub const fn locale(self) -> &'static str {
        self.locale
    }

    /// Number of fraction digits shown when formatting.
    #[must_use]
    pub fn fraction_digits(self) -> u8 {
        match self.code {
            "JPY" | "KRW" => 0,
            _ => 2,
        }
    }

    /// Renders `amount` the way the currency's locale writes money.
    ///
    /// ```rust
    /// use engine::{Currency, Money};
    ///
    /// assert_eq!(Currency::USD.format(Money::new(123_450)), "$1,234.50");
    /// assert_eq!(Currency::EUR.format(Money::new(123_450)), "1.234,50 €");
    /// ```
    #[must_use]
    pub fn format(self, amount: Money) -> String {
        let style = NumberStyle::for_locale(self.locale);
        let cents = amount.cents().unsigned_abs();

        let (whole, fraction) = if self.fraction_digits() == 0 {
            ((cents + 50) / 100, None)
        } else {
            (cents / 100, Some(cents % 100))
        };

        let mut number = group_digits(whole, style.group, style.grouping);
        if let Some(fraction) = fraction {
            number.push(style.decimal);
            number.push_str(&format!("{fraction:02}"));
        }

        let is_zero = whole == 0 && fraction.unwrap_or(0) == 0;
        let sign = if amount.is_negative() && !is_zero {
            "-"
        } else {
            ""
        };

        match style.placement {
            Placement::Prefix => format!("{sign}{}{number}", self.symbol),
            Placement::PrefixSpaced => format!("{sign}{} {number}", self.symbol),
            Placement::SuffixSpaced => format!("{sign}{number} {}", self.symbol),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code)
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Currency::from_code(value)
            .ok_or_else(|| EngineError::Validation(format!("unsupported currency: {value}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    Prefix,
    PrefixSpaced,
    SuffixSpaced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Grouping {
    Thousands,
    /// Last three digits, then groups of two (`1,23,456`).
    Indian,
}

#[derive(Clone, Copy, Debug)]
struct NumberStyle {
    group: &'static str,
    decimal: char,
    placement: Placement,
    grouping: Grouping,
}

impl NumberStyle {
    const fn new(group: &'static str, decimal: char, placement: Placement) -> Self {
        Self {
            group,
            decimal,
            placement,
            grouping: Grouping::Thousands,
        }
    }

    fn for_locale(locale: &str) -> Self {
        match locale {
            "en-IN" => Self {
                grouping: Grouping::Indian,
                ..Self::new(",", '.', Placement::Prefix)
            },
            "de-DE" | "vi-VN" | "ro-RO" | "hr-HR" | "da-DK" | "is-IS" => {
                Self::new(".", ',', Placement::SuffixSpaced)
            }
            "es-AR" | "pt-BR" => Self::new(".", ',', Placement::PrefixSpaced),
            "tr-TR" => Self::new(".", ',', Placement::Prefix),
            "de-CH" => Self::new("’", '.', Placement::PrefixSpaced),
            "ru-RU" | "sv-SE" | "nb-NO" | "pl-PL" | "cs-CZ" | "hu-HU" | "bg-BG" => {
                Self::new(" ", ',', Placement::SuffixSpaced)
            }
            "en-ZA" => Self::new(" ", ',', Placement::PrefixSpaced),
            _ => Self::new(",", '.', Placement::Prefix),
        }
    }
}

fn group_digits(value: u64, separator: &str, grouping: Grouping) -> String {
    let digits = value.to_string();
    let mut end = digits.len();
    let mut groups = Vec::new();

    let first = end.min(3);
    groups.push(&digits[end - first..end]);
    end -= first;

    let size = match grouping {
        Grouping::Thousands => 3,
        Grouping::Indian => 2,
    };
    while end > 0 {
        let start = end.saturating_sub(size);
        groups.push(&digits[start..end]);
        end = start;
    }

    groups.reverse();
    groups.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_every_selectable_currency() {
        assert_eq!(Currency::all().len(), 34);
        assert_eq!(Currency::default(), Currency::USD);
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert!(Currency::from_code("XXX").is_none());
        assert!(Currency::try_from("XXX").is_err());
    }

    #[test]
    fn formats_thousands_with_locale_separators() {
        assert_eq!(Currency::USD.format(Money::new(123_450)), "$1,234.50");
        assert_eq!(Currency::EUR.format(Money::new(123_450)), "1.234,50 €");
        let gbp = Currency::from_code("GBP").unwrap();
        assert_eq!(gbp.format(Money::new(99)), "£0.99");
        let sek = Currency::from_code("SEK").unwrap();
        assert_eq!(sek.format(Money::new(100_000_000)), "1 000 000,00 kr");
    }

    #[test]
    fn formats_indian_grouping() {
        let inr = Currency::from_code("INR").unwrap();
        assert_eq!(inr.format(Money::new(12_345_600)), "₹1,23,456.00");
        assert_eq!(inr.format(Money::new(99_900)), "₹999.00");
    }

    #[test]
    fn zero_fraction_currencies_round() {
        let jpy = Currency::from_code("JPY").unwrap();
        assert_eq!(jpy.format(Money::new(123_450)), "¥1,235");
        assert_eq!(jpy.format(Money::new(123_449)), "¥1,234");
        let krw = Currency::from_code("KRW").unwrap();
        assert_eq!(krw.format(Money::new(1_000_000)), "₩10,000");
    }

    #[test]
    fn negative_amounts_are_prefixed() {
        assert_eq!(Currency::USD.format(Money::new(-500)), "-$5.00");
        assert_eq!(Currency::EUR.format(Money::new(-500)), "-5,00 €");
        assert_eq!(Currency::USD.format(Money::ZERO), "$0.00");
    }
}
