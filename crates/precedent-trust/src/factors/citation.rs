/// Citation frequency term: `min(1, count / saturation)`.
///
/// A zero saturation means any citation saturates.
pub fn frequency(citation_count: u32, saturation: u32) -> f64 {
    if saturation == 0 {
        return if citation_count > 0 { 1.0 } else { 0.0 };
    }
    (f64::from(citation_count) / f64::from(saturation)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturates_at_twenty() {
        assert_eq!(frequency(0, 20), 0.0);
        assert_eq!(frequency(10, 20), 0.5);
        assert_eq!(frequency(20, 20), 1.0);
        assert_eq!(frequency(500, 20), 1.0);
    }
}
