//! Destinations command - list the boundary registry.

use campusnav::geofence::BoundaryRegistry;

use super::common::CliContext;
use crate::error::CliError;

/// Run the destinations command.
pub fn run(context: &CliContext) -> Result<(), CliError> {
    let registry = context.registry();

    if registry.is_empty() {
        println!("No destinations registered.");
        return Ok(());
    }

    println!("Destinations ({})", registry.len());
    println!("============");
    println!();

    for line in render_rows(registry) {
        println!("{}", line);
    }

    Ok(())
}

/// One line per destination: name, vertex count, centre and bounds.
fn render_rows(registry: &BoundaryRegistry) -> Vec<String> {
    let width = registry.names().map(str::len).max().unwrap_or(0);
    registry
        .iter()
        .map(|(name, polygon)| {
            let bounds = polygon.bounds();
            format!(
                "  {:<width$}  {} vertices  centre {}  {}",
                name,
                polygon.len(),
                bounds.center(),
                bounds,
                width = width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows() {
        let registry = BoundaryRegistry::campus_default().unwrap();
        let rows = render_rows(&registry);

        assert_eq!(rows.len(), registry.len());
        let gjb = rows.iter().find(|r| r.trim_start().starts_with("GJB")).unwrap();
        assert!(gjb.contains("vertices  centre (12.28"), "{}", gjb);
        assert!(gjb.contains("lat 12.28"), "{}", gjb);
    }
}
