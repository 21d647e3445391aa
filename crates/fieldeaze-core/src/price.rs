//! Arithmetic on display prices such as `"₹499"` or `"Rs 1,299"`.

/// Parse a display price into a number.
///
/// Every character other than an ASCII digit or `.` is discarded, then the
/// longest leading decimal number is read: `"₹499.00."` is 499 and
/// `"1.2.3"` is 1.2. No leading number counts as zero.
pub fn parse_price(display: &str) -> f64 {
    let kept: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    kept[..numeric_prefix_len(&kept)].parse::<f64>().unwrap_or(0.0)
}

/// Length of the leading `digits[.digits]` run of `s`.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut end = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        end += bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    }
    end
}

/// Sum a sequence of display prices.
pub fn subtotal<'a, I>(prices: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    prices.into_iter().map(parse_price).sum()
}

/// Format an amount with two decimals behind a currency symbol.
pub fn format_amount(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}
