//! The currencies a user can choose in their profile and how amounts are displayed in them.

use numfmt::{Formatter, Precision};

/// The currency used when the profile does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// A supported display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    /// The ISO 4217 code, e.g. "NZD".
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    /// The number of digits after the decimal point.
    pub decimal_places: u8,
}

const fn currency(
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    decimal_places: u8,
) -> Currency {
    Currency {
        code,
        name,
        symbol,
        decimal_places,
    }
}

/// Every currency the settings page offers, in display order.
pub const CURRENCIES: [Currency; 22] = [
    currency("USD", "United States Dollar", "$", 2),
    currency("EUR", "Euro", "€", 2),
    currency("GBP", "British Pound Sterling", "£", 2),
    currency("JPY", "Japanese Yen", "¥", 0),
    currency("CNY", "Chinese Yuan Renminbi", "¥", 2),
    currency("INR", "Indian Rupee", "₹", 2),
    currency("CAD", "Canadian Dollar", "C$", 2),
    currency("AUD", "Australian Dollar", "A$", 2),
    currency("BRL", "Brazilian Real", "R$", 2),
    currency("ZAR", "South African Rand", "R", 2),
    currency("KRW", "South Korean Won", "₩", 0),
    currency("MXN", "Mexican Peso", "Mex$", 2),
    currency("RUB", "Russian Ruble", "₽", 2),
    currency("IDR", "Indonesian Rupiah", "Rp", 0),
    currency("TRY", "Turkish Lira", "₺", 2),
    currency("NGN", "Nigerian Naira", "₦", 2),
    currency("SEK", "Swedish Krona", "kr", 2),
    currency("SGD", "Singapore Dollar", "S$", 2),
    currency("HKD", "Hong Kong Dollar", "HK$", 2),
    currency("BDT", "Bangladeshi Taka", "৳", 2),
    currency("CHF", "Swiss Franc", "Fr", 2),
    currency("THB", "Thai Baht", "฿", 2),
];

/// Look up a supported currency by its code.
pub fn find_currency(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|currency| currency.code == code)
}

/// The symbol for `code`, or the code itself for currencies not in [CURRENCIES].
pub fn currency_symbol(code: &str) -> &str {
    find_currency(code).map_or(code, |currency| currency.symbol)
}

fn decimal_places(code: &str) -> u8 {
    find_currency(code).map_or(2, |currency| currency.decimal_places)
}

/// Format `amount` with the symbol, decimal places and thousands separators of `code`.
///
/// Negative amounts are written as "-$12.00".
pub fn format_amount(amount: f64, code: &str) -> String {
    let symbol = currency_symbol(code);
    let decimals = decimal_places(code);
    let scale = 10f64.powi(decimals as i32);
    let amount = (amount * scale).round() / scale;

    let prefix = if amount < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_owned()
    };

    if amount == 0.0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return pad_decimals(format!("{prefix}0"), decimals);
    }

    let formatted = match Formatter::currency(&prefix) {
        Ok(formatter) => formatter
            .precision(Precision::Decimals(decimals))
            .fmt_string(amount.abs()),
        Err(error) => {
            tracing::warn!("Could not create number formatter for {prefix:?}: {error:?}");
            format!("{prefix}{:.*}", decimals as usize, amount.abs())
        }
    };

    pad_decimals(formatted, decimals)
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3", so they are added back.
fn pad_decimals(mut formatted: String, decimals: u8) -> String {
    if decimals == 0 {
        return formatted;
    }

    let digits_after_point = match formatted.rfind('.') {
        Some(point) => formatted.len() - point - 1,
        None => {
            formatted.push('.');
            0
        }
    };

    for _ in digits_after_point..decimals as usize {
        formatted.push('0');
    }

    formatted
}
