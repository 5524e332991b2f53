/// Group digits in thousands: 1234567 → "1,234,567".
pub fn format_number(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (index, ch) in raw.chars().rev().enumerate() {
        if index > 0 && index % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

/// Exact byte count with its unit: "2,048 bytes".
pub fn format_bytes(value: u64) -> String {
    if value == 1 { "1 byte".to_string() } else { format!("{} bytes", format_number(value)) }
}

/// Approximate binary size for humans: "2.0 KiB", "13 MiB".
pub fn format_size_human(value: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut size = value as f64;
    let mut unit = 0usize;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{value} B")
    } else if size < 10.0 {
        format!("{size:.1} {}", UNITS[unit])
    } else {
        format!("{size:.0} {}", UNITS[unit])
    }
}

/// Byte average with two decimals: "312.50 bytes".
pub fn format_avg_bytes(value: f64) -> String {
    format!("{value:.2} bytes")
}

pub fn format_millis(value: u64) -> String {
    format!("{} ms", format_number(value))
}
