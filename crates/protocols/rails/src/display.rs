//! Formatting helpers for amounts and durations

/// Currencies shown with up to 6 decimals
const CRYPTO_PRECISION_CURRENCIES: [&str; 4] = ["USDT", "USDC", "ETH", "BTC"];

/// Human delivery estimate, e.g. "~20 minutes" or "~2h 30m"
pub fn format_estimated_time(minutes: u32) -> String {
    if minutes < 1 {
        return "Less than 1 minute".to_string();
    }
    if minutes < 60 {
        return format!("~{} minutes", minutes);
    }

    let hours = minutes / 60;
    let remaining = minutes % 60;
    if remaining == 0 {
        let plural = if hours > 1 { "s" } else { "" };
        format!("~{} hour{}", hours, plural)
    } else {
        format!("~{}h {}m", hours, remaining)
    }
}

/// Signed one-decimal percentage, e.g. "+17.1%"
pub fn format_savings_percentage(percentage: f64) -> String {
    let sign = if percentage > 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, percentage)
}

/// Amount with thousands separators and currency suffix
///
/// Shows at least 2 decimals; stablecoins and majors keep up to 6.
pub fn format_crypto_amount(amount: f64, currency: &str) -> String {
    let max_decimals = if CRYPTO_PRECISION_CURRENCIES.contains(&currency) {
        6
    } else {
        2
    };

    let fixed = format!("{:.*}", max_decimals, amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut fraction = fraction.trim_end_matches('0').to_string();
    while fraction.len() < 2 {
        fraction.push('0');
    }

    let sign = if amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    format!("{}{}.{} {}", sign, group_thousands(whole), fraction, currency)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
