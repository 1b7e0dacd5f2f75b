use std::io::{self, Write};

use uom::si::electric_potential::millivolt;

use crate::data_models::AnalogReading;

/// Write `reading` as a single JSON line and flush.
pub fn publish_reading<W: Write>(out: &mut W, reading: &AnalogReading) -> io::Result<()> {
    serde_json::to_writer(&mut *out, reading)?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Short human-readable form for log lines.
pub fn format_reading(reading: &AnalogReading) -> String {
    let mut text = format!(
        "channel {} = {} ({}-bit)",
        reading.channel, reading.value, reading.resolution_bits
    );
    if let Some(voltage) = reading.voltage {
        text.push_str(&format!(", {:.1} mV", voltage.get::<millivolt>()));
    }
    text
}

#[cfg(test)]
mod tests {
    use uom::si::f32::ElectricPotential;

    use super::*;

    fn reading(voltage: Option<f32>) -> AnalogReading {
        AnalogReading {
            channel: 2,
            value: 1023,
            resolution_bits: 10,
            voltage: voltage.map(ElectricPotential::new::<millivolt>),
            timestamp_ms: 42,
        }
    }

    #[test]
    fn readings_are_published_one_per_line() {
        let mut out = Vec::new();
        publish_reading(&mut out, &reading(None)).unwrap();
        publish_reading(&mut out, &reading(Some(3300.0))).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"channel":2,"value":1023,"resolution_bits":10,"timestamp_ms":42}"#
        );

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["voltage_mv"], 3300.0);
    }

    #[test]
    fn formatted_reading_mentions_voltage_when_known() {
        assert_eq!(format_reading(&reading(None)), "channel 2 = 1023 (10-bit)");
        assert_eq!(
            format_reading(&reading(Some(1650.0))),
            "channel 2 = 1023 (10-bit), 1650.0 mV"
        );
    }
}
