//! Check command - point containment against destination boundaries.

use campusnav::coord::Coordinate;
use campusnav::geofence::GeofenceEvaluator;

use super::common::CliContext;
use crate::error::CliError;

/// Run the check command.
pub fn run(
    context: &CliContext,
    latitude: f64,
    longitude: f64,
    destination: Option<&str>,
) -> Result<(), CliError> {
    let point = Coordinate::validated(latitude, longitude)?;
    let evaluator = context.evaluator();

    match destination {
        Some(name) => {
            context.require_destination(name)?;
            println!("{}", describe_single(&evaluator, name, &point));
        }
        None => {
            for line in describe_all(&evaluator, &point) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn describe_single(evaluator: &GeofenceEvaluator, name: &str, point: &Coordinate) -> String {
    let verdict = if evaluator.contains(name, point) {
        "inside"
    } else {
        "outside"
    };
    format!("{} is {} {}", point, verdict, name)
}

fn describe_all(evaluator: &GeofenceEvaluator, point: &Coordinate) -> Vec<String> {
    let inside = evaluator.destinations_containing(point);
    if inside.is_empty() {
        return vec![format!("{} is outside every destination", point)];
    }

    let mut lines = vec![format!("{} is inside:", point)];
    lines.extend(inside.into_iter().map(|name| format!("  {}", name)));
    lines
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use campusnav::geofence::BoundaryRegistry;

    use super::*;

    fn evaluator() -> GeofenceEvaluator {
        GeofenceEvaluator::new(Arc::new(BoundaryRegistry::campus_default().unwrap()))
    }

    #[test]
    fn test_describe_single() {
        let point = Coordinate::new(12.2812, 76.6407);
        assert!(describe_single(&evaluator(), "GJB", &point).ends_with("is inside GJB"));
        assert!(describe_single(&evaluator(), "NIE Admin", &point).ends_with("is outside NIE Admin"));
    }

    #[test]
    fn test_describe_all() {
        let lines = describe_all(&evaluator(), &Coordinate::new(12.2759, 76.64327));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "  TruLit Herbals");

        let lines = describe_all(&evaluator(), &Coordinate::new(12.2790, 76.6420));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("outside every destination"));
    }
}
