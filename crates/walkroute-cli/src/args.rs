//! Parsers for command-line values.

use walkroute_lib::Coordinate;

/// Parse a `LAT,LNG` pair such as `41.0082,28.9784`.
///
/// Used as a clap `value_parser`, so errors are plain strings.
pub fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got '{}'", raw))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;

    let coordinate = Coordinate::new(lat, lng);
    coordinate.validate().map_err(|err| err.to_string())?;
    Ok(coordinate)
}

/// Parse a snap distance in metres; must be finite and non-negative.
pub fn parse_snap_distance(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|metres| metres.is_finite() && *metres >= 0.0)
        .ok_or_else(|| format!("expected a non-negative distance in metres but got '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pair_with_spaces() {
        let coordinate = parse_coordinate(" 41.5 , -3.25 ").unwrap();
        assert_eq!(coordinate, Coordinate::new(41.5, -3.25));
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(parse_coordinate("41.5").unwrap_err().contains("LAT,LNG"));
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert!(parse_coordinate("north,29").unwrap_err().contains("latitude"));
        assert!(parse_coordinate("41,east").unwrap_err().contains("longitude"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(parse_coordinate("100,29").is_err());
    }

    #[test]
    fn snap_distance_must_be_finite_and_non_negative() {
        assert_eq!(parse_snap_distance(" 75.5 ").unwrap(), 75.5);
        assert_eq!(parse_snap_distance("0").unwrap(), 0.0);
        assert!(parse_snap_distance("-1").is_err());
        assert!(parse_snap_distance("NaN").is_err());
        assert!(parse_snap_distance("inf").is_err());
        assert!(parse_snap_distance("far").is_err());
    }
}
