use chrono::{DateTime, Utc};

/// Recency term: `clamp(1 - years_old / horizon, floor, 1)`.
pub fn score(years_old: f64, horizon_years: f64, floor: f64) -> f64 {
    if horizon_years <= 0.0 {
        return floor.clamp(0.0, 1.0);
    }
    let floor = floor.clamp(0.0, 1.0);
    (1.0 - years_old.max(0.0) / horizon_years).clamp(floor, 1.0)
}

/// Fractional years between `date` and `now`; future dates count as zero.
pub fn years_between(date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - date).num_days().max(0) as f64;
    days / 365.25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_old_authorities() {
        assert_eq!(score(0.0, 50.0, 0.5), 1.0);
        assert!((score(10.0, 50.0, 0.5) - 0.8).abs() < 1e-12);
        assert_eq!(score(40.0, 50.0, 0.5), 0.5);
        assert_eq!(score(120.0, 50.0, 0.5), 0.5);
    }
}
