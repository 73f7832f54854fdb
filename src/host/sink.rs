use crate::host::error::HostError;
use crate::types::measurement::Measurement;
use serde::Serialize;
use std::io::Write;

/// Receives the measurements of a completed parser run.
///
/// Re-delivering the same timestamps on a later run is expected; deduplication is up
/// to the sink.
pub trait MeasurementSink {
    fn add_values(&mut self, parser: &str, measurements: &[Measurement]) -> Result<(), HostError>;
}

impl MeasurementSink for Vec<Measurement> {
    fn add_values(&mut self, _parser: &str, measurements: &[Measurement]) -> Result<(), HostError> {
        self.extend_from_slice(measurements);
        Ok(())
    }
}

#[derive(Serialize)]
struct Line<'a> {
    parser: &'a str,
    #[serde(flatten)]
    measurement: &'a Measurement,
}

/// Writes one JSON object per measurement, tagged with the parser name.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MeasurementSink for JsonLinesSink<W> {
    fn add_values(&mut self, parser: &str, measurements: &[Measurement]) -> Result<(), HostError> {
        for measurement in measurements {
            serde_json::to_writer(&mut self.writer, &Line { parser, measurement })
                .map_err(std::io::Error::from)?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lines_are_tagged_with_the_parser() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.add_values(
            "meteo.lt forecast",
            &[Measurement::temperature(100, 4.5), Measurement::qpf(100, 0.2)],
        )
        .unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["parser"], "meteo.lt forecast");
        assert_eq!(lines[0]["kind"], "TEMPERATURE");
        assert_eq!(lines[1]["kind"], "QPF");
        assert_eq!(lines[1]["timestamp"], 100);
    }
}
