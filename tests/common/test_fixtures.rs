//! Test fixtures for SmartHome device lists
//!
//! Device documents follow the shape FRITZ!OS returns for `data.lua`
//! (page `sh`), reduced to the fields the plugin reads.

use fritzbox_smarthome::devices::{normalize, sort_by_display_name};
use fritzbox_smarthome::NormalizedDevice;
use rstest::*;
use serde_json::{json, Value};

/// Device ids used across tests
pub struct TestDeviceIds;

impl TestDeviceIds {
    pub const THERMOSTAT: &'static str = "16";
    pub const PLUG: &'static str = "17";
    pub const HUMIDITY_SENSOR: &'static str = "20";
    pub const OFFLINE_THERMOSTAT: &'static str = "21";
}

/// Wrap devices into the `{data: {devices: [...]}}` document
pub fn device_list(devices: Vec<Value>) -> Value {
    json!({ "data": { "devices": devices } })
}

/// Device with a single unit carrying `skills`
pub fn device(id: &str, name: &str, connection: &str, model: &str, skills: Value) -> Value {
    json!({
        "id": id.parse::<u64>().map(Value::from).unwrap_or_else(|_| Value::from(id)),
        "displayName": name,
        "category": "THERMOSTAT",
        "type": "SmartHomeDevice",
        "masterConnectionState": connection,
        "model": model,
        "actorIdentificationNumber": format!("09995 00000{id}"),
        "units": [{
            "id": format!("{id}01"),
            "displayName": name,
            "type": "THERMOSTAT",
            "skills": skills
        }]
    })
}

/// FRITZ!DECT 301 thermostat
pub fn thermostat(id: &str, name: &str, connection: &str, current: f64, target: f64) -> Value {
    device(
        id,
        name,
        connection,
        "FRITZ!DECT 301",
        json!([
            {
                "type": "SmartHomeThermostat",
                "mode": "TEMPERATURE",
                "targetTemp": target,
                "state": { "current": "OFF" },
                "usedTempSensor": {
                    "skills": [{ "type": "SmartHomeTemperatureSensor", "currentInCelsius": current }]
                }
            },
            { "type": "SmartHomeTemperatureSensor", "currentInCelsius": current },
            { "type": "SmartHomeBattery", "chargeLevelInPercent": 80 }
        ]),
    )
}

/// FRITZ!DECT 200 switchable outlet with energy meter
pub fn plug(id: &str, name: &str, watt: f64, wh: f64) -> Value {
    device(
        id,
        name,
        "CONNECTED",
        "FRITZ!DECT 200",
        json!([
            { "type": "SmartHomeSocket" },
            { "type": "SmartHomeSwitch", "state": "ON" },
            {
                "type": "SmartHomeMultimeter",
                "electricCurrentInAmpere": 0.21,
                "powerConsumptionInWatt": watt,
                "voltageInVolt": 230.4,
                "powerPerHour": wh
            }
        ]),
    )
}

/// FRITZ!DECT 440 button with humidity sensor
pub fn humidity_sensor(id: &str, name: &str, humidity: Value) -> Value {
    device(
        id,
        name,
        "CONNECTED",
        "FRITZ!DECT 440",
        json!([
            { "type": "SmartHomeTemperatureSensor", "currentInCelsius": 19.5 },
            { "type": "SmartHomeHumiditySensor", "currentInPercent": humidity },
            { "type": "SmartHomeBattery", "chargeLevelInPercent": 100, "batteryLow": false }
        ]),
    )
}

/// Thermostat "Bad" at 20.8°C targeting 21.5°C, plug "Kaffee" drawing 45.2 W
#[fixture]
pub fn two_devices() -> Value {
    device_list(vec![
        thermostat(TestDeviceIds::THERMOSTAT, "Bad", "CONNECTED", 20.8, 21.5),
        plug(TestDeviceIds::PLUG, "Kaffee", 45.2, 1000.0),
    ])
}

/// A mixed household including a disconnected thermostat
#[fixture]
pub fn household() -> Value {
    device_list(vec![
        plug(TestDeviceIds::PLUG, "Kaffee", 45.2, 1000.0),
        thermostat(TestDeviceIds::THERMOSTAT, "Bad", "CONNECTED", 20.8, 21.5),
        humidity_sensor(TestDeviceIds::HUMIDITY_SENSOR, "Keller", json!(61)),
        thermostat(
            TestDeviceIds::OFFLINE_THERMOSTAT,
            "Arbeitszimmer",
            "DISCONNECTED",
            17.0,
            16.0,
        ),
    ])
}

/// Normalize and sort a device list document
pub fn sorted(raw: &Value) -> Vec<NormalizedDevice> {
    sort_by_display_name(normalize(raw).expect("fixture normalizes"))
}

/// Lines of the section headed `multigraph <name>`
pub fn section(lines: &[String], name: &str) -> Vec<String> {
    let header = format!("multigraph {name}");
    lines
        .iter()
        .skip_while(|l| **l != header)
        .skip(1)
        .take_while(|l| !l.is_empty())
        .cloned()
        .collect()
}

/// Names of all `multigraph` sections in output order
pub fn section_names(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| l.strip_prefix("multigraph "))
        .map(str::to_string)
        .collect()
}
