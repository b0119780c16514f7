/// Ordinal suffix of a placement, e.g. "st" for 151.
pub fn suffix(num: usize) -> &'static str {
    match (num % 10, num % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

pub fn ordinal(num: usize) -> String {
    format!("{}{}", num, suffix(num))
}
