//! Replay command - feed a recorded track through the location tracker.
//!
//! Track files are plain CSV, one sample per line:
//!
//! ```text
//! # latitude,longitude[,heading]
//! 12.2790,76.6420
//! 12.2812,76.6407,215
//! ```
//!
//! Every sample is forwarded (no rate limiting) so each line gets a verdict.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use campusnav::coord::{Coordinate, Heading};
use campusnav::geofence::GeofenceEvaluator;
use campusnav::proximity::ProximityNotifier;
use campusnav::tracking::{LocationProvider, LocationTracker, SimulatedProvider, TrackingOptions};
use tracing::info;

use super::common::CliContext;
use crate::error::CliError;

/// How long to wait for the tracker to publish one sample.
const SAMPLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub file: PathBuf,
    pub destination: String,
}

/// One parsed track line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    /// 1-based line number in the file.
    pub line: usize,
    pub coordinate: Coordinate,
    pub heading: Option<Heading>,
}

/// Outcome of a replay.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub samples: usize,
    pub arrivals: usize,
    pub first_arrival_line: Option<usize>,
}

/// Run the replay command.
pub fn run(context: &CliContext, args: ReplayArgs) -> Result<(), CliError> {
    context.require_destination(&args.destination)?;

    let track_error = |message: String| CliError::Track {
        path: args.file.clone(),
        message,
    };
    let text = std::fs::read_to_string(&args.file).map_err(|e| track_error(e.to_string()))?;
    let track = parse_track(&text).map_err(track_error)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let options = TrackingOptions::unthrottled().with_accuracy(context.tracking_options().accuracy);
    let summary = runtime.block_on(replay(
        context.evaluator(),
        options,
        &args.destination,
        &track,
        |point, events| {
            let verdict = match events.first() {
                Some(event) => format!("ARRIVED at {} (#{})", event.destination, event.sequence),
                None => "-".to_string(),
            };
            let heading = point
                .heading
                .map(|h| format!("{:>6.1}°", h.degrees()))
                .unwrap_or_else(|| "      -".to_string());
            println!("{:>5}  {}  {}  {}", point.line, point.coordinate, heading, verdict);
        },
    ))?;

    println!();
    println!(
        "{} samples, {} arrivals at {}",
        summary.samples, summary.arrivals, args.destination
    );
    if let Some(line) = summary.first_arrival_line {
        println!("First arrival on line {}", line);
    }

    Ok(())
}

/// Drive a tracker with `track` and report each sample's arrival events.
async fn replay<F>(
    evaluator: GeofenceEvaluator,
    options: TrackingOptions,
    destination: &str,
    track: &[TrackPoint],
    mut on_sample: F,
) -> Result<ReplaySummary, CliError>
where
    F: FnMut(&TrackPoint, &[campusnav::ProximityEvent]),
{
    let provider = Arc::new(SimulatedProvider::new());
    let dyn_provider: Arc<dyn LocationProvider> = provider.clone();
    let tracker = LocationTracker::new(dyn_provider, evaluator).with_options(options);

    let (notifier, mut arrivals) = ProximityNotifier::channel();
    tracker
        .start(Some(destination.to_string()), Some(notifier))
        .await?;
    info!(destination, samples = track.len(), "Replaying track");

    let mut location = tracker.location();
    let mut summary = ReplaySummary::default();

    for point in track {
        if let Some(heading) = point.heading {
            provider.push_heading(heading);
        }
        provider.push_position(point.coordinate);

        let published = tokio::time::timeout(SAMPLE_TIMEOUT, location.changed()).await;
        if !matches!(published, Ok(Ok(()))) {
            tracker.stop().await;
            return Err(CliError::Runtime(format!(
                "tracker did not process the sample on line {}",
                point.line
            )));
        }

        let events = arrivals.drain();
        summary.samples += 1;
        summary.arrivals += events.len();
        if !events.is_empty() && summary.first_arrival_line.is_none() {
            summary.first_arrival_line = Some(point.line);
        }
        on_sample(point, &events);
    }

    tracker.stop().await;
    Ok(summary)
}

/// Parse CSV track text. Blank lines and `#` comments are skipped.
pub fn parse_track(text: &str) -> Result<Vec<TrackPoint>, String> {
    let mut points = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split(',').map(str::trim).collect();
        if !(2..=3).contains(&fields.len()) {
            return Err(format!(
                "line {}: expected latitude,longitude[,heading], found {} fields",
                line,
                fields.len()
            ));
        }

        let number = |field: &str, what: &str| {
            field
                .parse::<f64>()
                .map_err(|_| format!("line {}: invalid {} '{}'", line, what, field))
        };
        let latitude = number(fields[0], "latitude")?;
        let longitude = number(fields[1], "longitude")?;
        let coordinate = Coordinate::validated(latitude, longitude)
            .map_err(|e| format!("line {}: {}", line, e))?;
        let heading = match fields.get(2) {
            Some(field) if !field.is_empty() => Some(
                Heading::validated(number(field, "heading")?)
                    .map_err(|e| format!("line {}: {}", line, e))?,
            ),
            _ => None,
        };

        points.push(TrackPoint {
            line,
            coordinate,
            heading,
        });
    }

    if points.is_empty() {
        return Err("track contains no samples".to_string());
    }
    Ok(points)
}
