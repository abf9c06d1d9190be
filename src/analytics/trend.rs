use serde::Serialize;

use crate::weights::repo::WeightEntry;

/// One normalized chart coordinate. The plotting space is [0,100]×[0,100]
/// with y inverted, so heavier weights sit higher on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
}

/// Map an oldest-to-newest weight sequence onto evenly spaced chart points.
/// The value range is padded by one unit on each side, which also keeps a
/// flat series away from a zero divisor. Fewer than two points draw nothing.
pub fn interpolate(weights: &[WeightEntry]) -> Vec<TrendPoint> {
    if weights.len() < 2 {
        return Vec::new();
    }

    let min = weights.iter().map(|w| w.weight_kg).fold(f64::INFINITY, f64::min) - 1.0;
    let max = weights
        .iter()
        .map(|w| w.weight_kg)
        .fold(f64::NEG_INFINITY, f64::max)
        + 1.0;
    let range = max - min;
    let step_x = 100.0 / (weights.len() - 1) as f64;

    weights
        .iter()
        .enumerate()
        .map(|(i, w)| TrendPoint {
            x: i as f64 * step_x,
            y: 100.0 - (w.weight_kg - min) / range * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod trend_tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;
    use uuid::Uuid;

    fn series(values: &[f64]) -> Vec<WeightEntry> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| WeightEntry {
                id: Uuid::new_v4(),
                user_key: "alice".into(),
                weight_kg: *v,
                created_at: datetime!(2026-08-01 08:00 UTC) + Duration::days(i as i64),
            })
            .collect()
    }

    #[test]
    fn fewer_than_two_points_draw_nothing() {
        assert!(interpolate(&[]).is_empty());
        assert!(interpolate(&series(&[82.5])).is_empty());
    }

    #[test]
    fn x_spans_the_full_axis() {
        let points = interpolate(&series(&[80.0, 81.0, 79.5, 80.5]));
        assert_eq!(points.len(), 4);
        assert_eq!(points.first().unwrap().x, 0.0);
        assert_eq!(points.last().unwrap().x, 100.0);
    }

    #[test]
    fn flat_series_sits_at_midline() {
        let points = interpolate(&series(&[75.0, 75.0, 75.0]));
        assert!(points.iter().all(|p| (p.y - 50.0).abs() < 1e-9));
    }

    #[test]
    fn heavier_weight_plots_higher() {
        let points = interpolate(&series(&[70.0, 90.0]));
        // inverted axis: larger weight means smaller y
        assert!(points[1].y < points[0].y);
    }

    #[test]
    fn padding_keeps_extremes_off_the_edges() {
        let points = interpolate(&series(&[70.0, 90.0]));
        for p in &points {
            assert!(p.y > 0.0 && p.y < 100.0);
        }
    }
}
