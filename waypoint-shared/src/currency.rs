//! Currency symbols and money formatting for table cells.

/// Symbol for an ISO 4217 code. Unknown codes come back unchanged.
pub fn currency_symbol(code: &str) -> &str {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "¥",
        "INR" => "₹",
        "AUD" => "A$",
        "CAD" => "C$",
        "CHF" => "CHF",
        "SEK" => "kr",
        "NOK" => "kr",
        "DKK" => "kr",
        "NZD" => "NZ$",
        "SGD" => "S$",
        "HKD" => "HK$",
        "KRW" => "₩",
        "BRL" => "R$",
        "MXN" => "MX$",
        "ZAR" => "R",
        "RUB" => "₽",
        "TRY" => "₺",
        "AED" => "د.إ",
        "SAR" => "﷼",
        "THB" => "฿",
        "PLN" => "zł",
        "MYR" => "RM",
        "IDR" => "Rp",
        _ => code,
    }
}

/// Two decimals with `,` thousands separators: `1234567.891` -> `"1,234,567.89"`.
/// Non-finite input renders as zero.
pub fn format_amount(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let formatted = format!("{:.2}", value);

    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (integer_part, decimal_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(integer_part.len() + integer_part.len() / 3);
    for (i, c) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    // "-0.00" reads oddly in a table
    let sign = if grouped.chars().all(|c| c == '0') && decimal_part == "00" { "" } else { sign };

    format!("{}{}.{}", sign, grouped, decimal_part)
}

/// Symbol followed by the formatted amount. Alphabetic symbols (and
/// unknown codes) get a separating space: `"CHF 12.00"`, `"$12.00"`.
pub fn format_price(value: f64, code: &str) -> String {
    let symbol = currency_symbol(code);
    if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
        format!("{} {}", symbol, format_amount(value))
    } else {
        format!("{}{}", symbol, format_amount(value))
    }
}
