//! Display helpers shared by the terminal renderer.

use chrono::{DateTime, Local, NaiveDateTime};

pub const NOT_AVAILABLE: &str = crate::domain::sentiment::NOT_AVAILABLE;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

pub fn number(value: Option<f64>, decimals: usize) -> String {
    match usable(value) {
        Some(v) => format!("{v:.decimals$}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `$1,234.56` for USD, `1,234.56 EUR` for anything else.
pub fn currency(value: Option<f64>, currency: &str) -> String {
    let Some(v) = usable(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let body = group_thousands(v.abs(), 2);
    let sign = if v < 0.0 { "-" } else { "" };
    if currency.eq_ignore_ascii_case("USD") || currency.is_empty() {
        format!("{sign}${body}")
    } else {
        format!("{sign}{body} {}", currency.to_uppercase())
    }
}

/// Market-cap style: `$2.87T`, `$412.50B`, `$3.20M`, else grouped dollars.
pub fn large_money(value: Option<f64>) -> String {
    let Some(v) = usable(value).filter(|v| *v > 0.0) else {
        return NOT_AVAILABLE.to_string();
    };
    const TRILLION: f64 = 1e12;
    const BILLION: f64 = 1e9;
    const MILLION: f64 = 1e6;
    if v >= TRILLION {
        format!("${:.2}T", v / TRILLION)
    } else if v >= BILLION {
        format!("${:.2}B", v / BILLION)
    } else if v >= MILLION {
        format!("${:.2}M", v / MILLION)
    } else {
        format!("${}", group_thousands(v, 0))
    }
}

pub fn volume(value: Option<u64>) -> String {
    match value {
        Some(v) => group_thousands(v as f64, 0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Dividend yield arrives as a fraction; zero means the stock pays none.
pub fn dividend_yield(fraction: Option<f64>) -> String {
    match usable(fraction).filter(|v| *v != 0.0) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn signed_percent(value: Option<f64>) -> String {
    match usable(value) {
        Some(v) => format!("{v:+.2}%"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Backend timestamps are either RFC 3339 or naive ISO-8601 (server local
/// time). RFC 3339 values are shown in the viewer's zone.
pub fn timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format("%b %e, %Y %H:%M").to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.format("%b %e, %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// One block character per value, scaled between the min and max.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let sampled: Vec<f64> = if values.len() > width {
        (0..width)
            .map(|i| values[i * (values.len() - 1) / (width - 1).max(1)])
            .collect()
    } else {
        values.to_vec()
    };

    let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    sampled
        .iter()
        .map(|v| {
            if span <= 0.0 {
                return SPARK_LEVELS[SPARK_LEVELS.len() / 2];
            }
            let idx = (((v - min) / span) * top).round() as usize;
            SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

fn group_thousands(v: f64, decimals: usize) -> String {
    let fixed = format!("{v:.decimals$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i != 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
