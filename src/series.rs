use serde::Serialize;

use crate::reading::{Payload, Reading};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temp,
    Light,
    RelativeHumidity,
    Moisture,
    Pump,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temp,
        Metric::Light,
        Metric::RelativeHumidity,
        Metric::Moisture,
        Metric::Pump,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Temp => "Temp",
            Metric::Light => "Light",
            Metric::RelativeHumidity => "Relative Humidity",
            Metric::Moisture => "Moisture",
            Metric::Pump => "Pump",
        }
    }

    fn value(self, payload: &Payload) -> Option<f64> {
        match self {
            Metric::Temp => payload.temp,
            Metric::Light => payload.light,
            Metric::RelativeHumidity => payload.rh,
            Metric::Moisture => payload.moisture,
            Metric::Pump => payload.pump,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// `[timestamp_millis, value]`; a missing value serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint(pub i64, pub Option<f64>);

/// Five index-aligned series, one per [`Metric`], in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartInput {
    series: [Vec<SeriesPoint>; 5],
}

pub fn display_timestamp(ts_seconds: f64, offset_millis: i64) -> i64 {
    ((ts_seconds * 1000.0).round() as i64).saturating_add(offset_millis)
}

impl ChartInput {
    pub fn from_readings(readings: &[Reading], offset_millis: i64) -> Self {
        let mut series: [Vec<SeriesPoint>; 5] =
            std::array::from_fn(|_| Vec::with_capacity(readings.len()));

        for reading in readings {
            let ts = display_timestamp(reading.ts, offset_millis);
            for metric in Metric::ALL {
                series[metric.index()].push(SeriesPoint(ts, metric.value(&reading.payload)));
            }
        }

        ChartInput { series }
    }

    pub fn series(&self, metric: Metric) -> &[SeriesPoint] {
        &self.series[metric.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &[SeriesPoint])> {
        Metric::ALL.into_iter().map(|m| (m, self.series(m)))
    }

    pub fn len(&self) -> usize {
        self.series[0].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSET: i64 = -4 * 60 * 60 * 1000;

    fn reading(ts: f64, temp: f64) -> Reading {
        Reading {
            client_id: "MC-1126-1-1".to_string(),
            ts,
            payload: Payload {
                temp: Some(temp),
                light: Some(50.0),
                rh: Some(40.0),
                moisture: Some(30.0),
                pump: Some(0.0),
            },
        }
    }

    #[test]
    fn test_display_timestamp() {
        assert_eq!(display_timestamp(0.0, OFFSET), -14_400_000);
        assert_eq!(display_timestamp(1_000_000_000.0, OFFSET), 999_985_600_000);
        assert_eq!(display_timestamp(1.2345, 0), 1235);
    }

    #[test]
    fn test_temp_series() {
        let input = ChartInput::from_readings(&[reading(100.0, 20.0), reading(200.0, 21.0)], OFFSET);
        assert_eq!(
            input.series(Metric::Temp),
            &[
                SeriesPoint(-14_300_000, Some(20.0)),
                SeriesPoint(-14_200_000, Some(21.0))
            ]
        );
        assert_eq!(
            serde_json::to_string(input.series(Metric::Temp)).unwrap(),
            "[[-14300000,20.0],[-14200000,21.0]]"
        );
    }

    #[test]
    fn test_series_aligned() {
        let mut readings: Vec<Reading> = (0..37).map(|i| reading(i as f64 * 600.0, i as f64)).collect();
        readings[5].payload.light = None;
        let input = ChartInput::from_readings(&readings, OFFSET);

        assert_eq!(input.len(), 37);
        for (_, points) in input.iter() {
            assert_eq!(points.len(), 37);
        }
        for i in 0..37 {
            let ts = input.series(Metric::Temp)[i].0;
            assert!(input.iter().all(|(_, points)| points[i].0 == ts));
        }
        assert_eq!(input.series(Metric::Light)[5], SeriesPoint(3000 * 1000 + OFFSET, None));
    }

    #[test]
    fn test_preserves_order() {
        let input = ChartInput::from_readings(&[reading(300.0, 1.0), reading(100.0, 2.0)], 0);
        let ts: Vec<i64> = input.series(Metric::Pump).iter().map(|p| p.0).collect();
        assert_eq!(ts, vec![300_000, 100_000]);
    }

    #[test]
    fn test_empty() {
        let input = ChartInput::from_readings(&[], OFFSET);
        assert_eq!(input.len(), 0);
        assert_eq!(input.iter().count(), 5);
    }

    #[test]
    fn test_metric_names() {
        let names: Vec<&str> = Metric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["Temp", "Light", "Relative Humidity", "Moisture", "Pump"]);
    }
}
