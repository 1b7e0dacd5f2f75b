use serde::{Deserialize, Serialize};
use uom::si::electric_potential::millivolt;
use uom::si::f32::ElectricPotential;

/// One sample taken from an analog input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalogReading {
    pub channel: u32,
    /// Reading rescaled to `resolution_bits`.
    pub value: u16,
    pub resolution_bits: u8,
    /// Input voltage, when the device publishes a scale attribute.
    #[serde(
        rename = "voltage_mv",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_millivolts",
        deserialize_with = "deserialize_millivolts"
    )]
    pub voltage: Option<ElectricPotential>,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

// ElectricPotential goes over the wire as a bare millivolt number
fn serialize_millivolts<S>(
    value: &Option<ElectricPotential>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(v) => serializer.serialize_some(&v.get::<millivolt>()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_millivolts<'de, D>(deserializer: D) -> Result<Option<ElectricPotential>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let mv: Option<f32> = Option::deserialize(deserializer)?;
    Ok(mv.map(ElectricPotential::new::<millivolt>))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_is_serialized_in_millivolts() {
        let reading = AnalogReading {
            channel: 1,
            value: 512,
            resolution_bits: 10,
            voltage: Some(ElectricPotential::new::<millivolt>(1650.0)),
            timestamp_ms: 1_700_000_000_000,
        };
        let json: serde_json::Value = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["channel"], 1);
        assert_eq!(json["value"], 512);
        assert_eq!(json["resolution_bits"], 10);
        assert_eq!(json["voltage_mv"], 1650.0);
        assert_eq!(json["timestamp_ms"], 1_700_000_000_000u64);

        let back: AnalogReading = serde_json::from_value(json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn missing_voltage_is_omitted() {
        let reading = AnalogReading {
            channel: 0,
            value: 7,
            resolution_bits: 12,
            voltage: None,
            timestamp_ms: 0,
        };
        let json = serde_json::to_string(&reading).unwrap();
        assert!(!json.contains("voltage_mv"));

        let back: AnalogReading = serde_json::from_str(&json).unwrap();
        assert_eq!(back.voltage, None);
    }
}
