//! Display formatting shared by the CLI tables and the console.

/// `$1,240.50`, negatives as `-$3.20`.
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    format!("{sign}${whole}.{:02}", cents % 100)
}

/// `1,248`
pub fn format_count(count: u64) -> String {
    group_thousands(count)
}

/// `+12%` / `-2%`
pub fn format_change(change: f64) -> String {
    if change >= 0.0 {
        format!("+{change:.0}%")
    } else {
        format!("{change:.0}%")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(84.2), "$84.20");
        assert_eq!(format_money(1240.0), "$1,240.00");
        assert_eq!(format_money(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_money(-3.2), "-$3.20");
    }

    #[test]
    fn test_format_change_and_count() {
        assert_eq!(format_change(12.0), "+12%");
        assert_eq!(format_change(-2.4), "-2%");
        assert_eq!(format_count(1248), "1,248");
        assert_eq!(format_count(42), "42");
    }
}
