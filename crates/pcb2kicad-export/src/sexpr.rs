use pcb2kicad_core::{coord_to_mm, Coord};

/// Decimal millimetre text: at most 6 fraction digits, no trailing zeros and
/// never `-0`.
#[must_use]
pub fn fmt_num(v: f64) -> String {
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[must_use]
pub fn mm(c: Coord) -> String {
    fmt_num(coord_to_mm(c))
}

/// Double-quoted string with `"` and `\` escaped.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
