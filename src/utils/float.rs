/// Returns `true` if `s` is a plain decimal float:
/// `[+-]?(digits[.digits*] | .digits)([eE][+-]?digits)?`.
///
/// Unlike `fast_float`, this rejects `inf`, `nan` and other named values.
pub(crate) fn is_decimal(s: &[u8]) -> bool {
    fn digits(s: &mut &[u8]) -> usize {
        let n = s.iter().take_while(|b| b.is_ascii_digit()).count();
        *s = &s[n..];
        n
    }
    fn sign(s: &mut &[u8]) {
        if let [b'+' | b'-', rest @ ..] = *s {
            *s = rest;
        }
    }

    let mut s = s;
    sign(&mut s);
    let int = digits(&mut s);
    let mut frac = 0;
    if let [b'.', rest @ ..] = s {
        s = rest;
        frac = digits(&mut s);
    }
    if int == 0 && frac == 0 {
        return false;
    }
    if let [b'e' | b'E', rest @ ..] = s {
        s = rest;
        sign(&mut s);
        if digits(&mut s) == 0 {
            return false;
        }
    }
    s.is_empty()
}

/// Parses a whole token as a finite `f32`.
pub(crate) fn parse_finite(s: &[u8]) -> Option<f32> {
    match fast_float::parse::<f32, _>(s) {
        Ok(f) if f.is_finite() => Some(f),
        _ => None,
    }
}
