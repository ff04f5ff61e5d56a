use serde::{Deserialize, Serialize};

/// A single raw cell as it came out of the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    /// Build a cell from a text field, mapping blank text to `Empty`.
    pub fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// The shared numeric parse rule used by every engine.
    ///
    /// Text is read the way a lenient float parser would: surrounding
    /// whitespace is ignored and the longest numeric prefix is taken, so
    /// `"12.5 mm"` yields `12.5` while `"mm 12.5"` yields nothing.
    /// Non-finite results are discarded.
    pub fn as_number(&self) -> Option<f64> {
        let v = match self {
            CellValue::Number(v) => *v,
            CellValue::Text(s) => parse_leading_f64(s)?,
            CellValue::Empty => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Whether the cell counts as "present" for categorical tallies.
    /// Zero and NaN numbers are treated as absent, as is blank text.
    pub fn is_present(&self) -> bool {
        match self {
            CellValue::Number(v) => *v != 0.0 && !v.is_nan(),
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Empty => false,
        }
    }

    /// The raw cell rendered as a category key.
    pub fn label(&self) -> String {
        match self {
            CellValue::Number(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from_text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::from_text(&s)
    }
}

/// Parse the longest decimal prefix of `s` (after trimming leading
/// whitespace). Accepts an optional sign, digits with an optional fraction,
/// and an exponent only when it is followed by at least one digit.
fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers_parse() {
        assert_eq!(CellValue::from("42").as_number(), Some(42.0));
        assert_eq!(CellValue::from("  -3.5 ").as_number(), Some(-3.5));
        assert_eq!(CellValue::from(".5").as_number(), Some(0.5));
        assert_eq!(CellValue::from("1e3").as_number(), Some(1000.0));
        assert_eq!(CellValue::Number(7.25).as_number(), Some(7.25));
    }

    #[test]
    fn default_cell_is_empty() {
        assert_eq!(CellValue::default(), CellValue::Empty);
        assert_eq!(CellValue::default().as_number(), None);
    }

    #[test]
    fn leading_prefix_is_taken() {
        assert_eq!(CellValue::from("12.5 mm").as_number(), Some(12.5));
        assert_eq!(CellValue::from("3e").as_number(), Some(3.0));
        assert_eq!(CellValue::from("10.").as_number(), Some(10.0));
    }

    #[test]
    fn non_numeric_is_rejected() {
        assert_eq!(CellValue::from("abc").as_number(), None);
        assert_eq!(CellValue::from("mm 12").as_number(), None);
        assert_eq!(CellValue::from("-").as_number(), None);
        assert_eq!(CellValue::from(".").as_number(), None);
        assert_eq!(CellValue::from("inf").as_number(), None);
        assert_eq!(CellValue::from("NaN").as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
        assert_eq!(CellValue::Number(f64::INFINITY).as_number(), None);
        assert_eq!(CellValue::from("1e400").as_number(), None);
    }

    #[test]
    fn blank_text_becomes_empty() {
        assert_eq!(CellValue::from("   "), CellValue::Empty);
        assert_eq!(CellValue::from(""), CellValue::Empty);
    }

    #[test]
    fn presence_follows_truthiness() {
        assert!(CellValue::from("0").is_present());
        assert!(CellValue::Number(2.0).is_present());
        assert!(!CellValue::Number(0.0).is_present());
        assert!(!CellValue::Number(f64::NAN).is_present());
        assert!(!CellValue::Empty.is_present());
    }

    #[test]
    fn labels_render_integers_without_fraction() {
        assert_eq!(CellValue::Number(3.0).label(), "3");
        assert_eq!(CellValue::Number(2.5).label(), "2.5");
        assert_eq!(CellValue::from("Line A").label(), "Line A");
        assert_eq!(CellValue::Empty.label(), "");
    }
}
