//! Fritz!Box SmartHome device list model
//!
//! Mirrors the JSON the router returns for `data.lua?page=sh`. Identity
//! fields of devices and units are required; every skill field is optional and
//! decoded leniently, because the reporting shape changes between FRITZ!OS
//! releases.

pub mod normalize;

pub use normalize::{normalize, normalize_devices, sort_by_display_name, NormalizedDevice};

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Top-level response of the SmartHome page
#[derive(Debug, Clone, Deserialize)]
pub struct SmartHomeResponse {
    pub data: SmartHomeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmartHomeData {
    pub devices: Vec<RawDevice>,
}

/// Device as reported by the router
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDevice {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub display_name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub master_connection_state: String,
    pub model: String,
    pub actor_identification_number: String,
    pub units: Vec<Unit>,
}

/// Sub-component of a device grouping related skills
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub skills: Vec<Skill>,
}

/// Typed capability of a unit
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Skill {
    SmartHomeThermostat(ThermostatSkill),
    SmartHomeTemperatureSensor(TemperatureSensorSkill),
    SmartHomeHumiditySensor(HumiditySensorSkill),
    SmartHomeBattery(BatterySkill),
    SmartHomeMultimeter(MultimeterSkill),
    SmartHomeSocket(SocketSkill),
    SmartHomeSwitch(SwitchSkill),
    /// Skill types this plugin does not know about
    #[serde(other)]
    Unknown,
}

impl Skill {
    /// Type tag for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Skill::SmartHomeThermostat(_) => "SmartHomeThermostat",
            Skill::SmartHomeTemperatureSensor(_) => "SmartHomeTemperatureSensor",
            Skill::SmartHomeHumiditySensor(_) => "SmartHomeHumiditySensor",
            Skill::SmartHomeBattery(_) => "SmartHomeBattery",
            Skill::SmartHomeMultimeter(_) => "SmartHomeMultimeter",
            Skill::SmartHomeSocket(_) => "SmartHomeSocket",
            Skill::SmartHomeSwitch(_) => "SmartHomeSwitch",
            Skill::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatSkill {
    #[serde(default, deserialize_with = "lenient")]
    pub mode: Option<String>,
    /// FRITZ!OS 7.5x state reporting
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<ThermostatState>,
    /// FRITZ!OS 7.2x/7.3x state reporting
    #[serde(default, deserialize_with = "lenient_flag")]
    pub summer_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub holiday_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature_drop_detection: Option<TemperatureDropDetection>,
    #[serde(default, deserialize_with = "lenient")]
    pub target_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub used_temp_sensor: Option<UsedTempSensor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThermostatState {
    #[serde(default, deserialize_with = "lenient")]
    pub current: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureDropDetection {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_window_open: Option<bool>,
}

/// Temperature sensor a thermostat regulates against
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsedTempSensor {
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<ReferencedSkill>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencedSkill {
    #[serde(default, deserialize_with = "lenient")]
    pub current_in_celsius: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureSensorSkill {
    #[serde(default, deserialize_with = "lenient")]
    pub current_in_celsius: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumiditySensorSkill {
    #[serde(default, deserialize_with = "lenient")]
    pub current_in_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySkill {
    #[serde(default, deserialize_with = "lenient")]
    pub charge_level_in_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub battery_low: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultimeterSkill {
    #[serde(default, deserialize_with = "lenient")]
    pub electric_current_in_ampere: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub power_consumption_in_watt: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub voltage_in_volt: Option<f64>,
    /// Cumulative energy in Wh
    #[serde(default, deserialize_with = "lenient")]
    pub power_per_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocketSkill {}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwitchSkill {
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
}

/// Ids arrive as numbers on current firmware, as strings on some older ones.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected number or string id, got {other}"
        ))),
    }
}

/// Optional field: `null` or a value of the wrong shape counts as absent.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Optional on/off field, reported as a bool or as 0/1 depending on firmware.
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        _ => None,
    })
}

/// Optional list: entries that fail to decode are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
