//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};
use walkroute_lib::{Coordinate, WalkRequest};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants;
/// `request_id` becomes the problem instance.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Request body for `POST /api/v1/route`.
///
/// ```json
/// {"start": {"lat": 41.0082, "lng": 28.9784},
///  "end": {"lat": 41.0256, "lng": 28.9744},
///  "waypoints": [{"lat": 41.0115, "lng": 28.9833}]}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,

    pub end: Coordinate,

    /// Stops to visit in any order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<Coordinate>,

    /// Spread the ordering search across worker threads.
    #[serde(default)]
    pub parallel: bool,
}

impl RouteRequest {
    /// Reject requests with more waypoints than the service allows.
    pub fn check_waypoint_limit(
        &self,
        max_waypoints: usize,
        request_id: &str,
    ) -> Result<(), Box<ProblemDetails>> {
        if self.waypoints.len() > max_waypoints {
            return Err(Box::new(ProblemDetails::bad_request(
                format!(
                    "The 'waypoints' field holds {} entries but at most {} are allowed",
                    self.waypoints.len(),
                    max_waypoints
                ),
                request_id,
            )));
        }
        Ok(())
    }

    pub fn to_walk_request(&self) -> WalkRequest {
        WalkRequest::new(self.start, self.end, self.waypoints.clone())
    }
}

impl Validate for RouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        let labelled = [("start", &self.start), ("end", &self.end)]
            .into_iter()
            .map(|(field, point)| (field.to_string(), point))
            .chain(
                self.waypoints
                    .iter()
                    .enumerate()
                    .map(|(index, point)| (format!("waypoints[{}]", index), point)),
            );

        for (field, point) in labelled {
            if let Err(err) = point.validate() {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("The '{}' field is invalid: {}", field, err),
                    request_id,
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(waypoints: Vec<Coordinate>) -> RouteRequest {
        RouteRequest {
            start: Coordinate::new(41.0, 29.0),
            end: Coordinate::new(41.003, 29.003),
            waypoints,
            parallel: false,
        }
    }

    #[test]
    fn valid_request_passes() {
        let req = request(vec![Coordinate::new(41.001, 29.002)]);
        assert!(req.validate("test").is_ok());
    }

    #[test]
    fn out_of_range_start_is_rejected() {
        let mut req = request(vec![]);
        req.start = Coordinate::new(95.0, 29.0);
        let err = req.validate("test").unwrap_err();
        assert_eq!(err.status, 400);
        assert!(err.detail.as_deref().unwrap().contains("'start'"));
    }

    #[test]
    fn bad_waypoint_is_named_by_index() {
        let req = request(vec![
            Coordinate::new(41.001, 29.002),
            Coordinate::new(41.0, f64::NAN),
        ]);
        let err = req.validate("req-7").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'waypoints[1]'"));
        assert_eq!(err.instance.as_deref(), Some("req-7"));
    }

    #[test]
    fn waypoint_limit_is_enforced() {
        let req = request(vec![Coordinate::new(41.001, 29.002); 3]);
        assert!(req.check_waypoint_limit(3, "test").is_ok());
        let err = req.check_waypoint_limit(2, "test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("at most 2"));
    }

    #[test]
    fn deserialization_defaults() {
        let json = r#"{"start":{"lat":41.0,"lng":29.0},"end":{"lat":41.1,"lng":29.1}}"#;
        let req: RouteRequest = serde_json::from_str(json).unwrap();
        assert!(req.waypoints.is_empty());
        assert!(!req.parallel);
        assert_eq!(req.to_walk_request().points().len(), 2);
    }
}
