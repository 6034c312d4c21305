//! Flattening of the device/unit/skill tree into one record per device

use super::{RawDevice, SmartHomeResponse, Skill, ThermostatSkill};
use crate::error::{FritzboxError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Flat per-device view of the readings a device reported
///
/// `None` always means the device (or its firmware) did not report the
/// field. Readings that can be listed without a value, which happens for a
/// while after a router restart until the DECT link is back, use
/// `Option<Option<f64>>`: `Some(None)` is "reported, no value".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedDevice {
    pub id: String,
    pub display_name: String,
    pub present: bool,
    pub model: String,
    /// Actor identification number (AIN)
    pub identifier: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summer_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_open: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_temperature: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_humidity: Option<Option<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_charge_level: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_low: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_in_amp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_in_watt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_in_volt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_in_kwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_switch_on: Option<bool>,
}

impl NormalizedDevice {
    fn new(device: &RawDevice) -> Self {
        Self {
            id: device.id.clone(),
            display_name: device.display_name.clone(),
            present: device.master_connection_state == "CONNECTED",
            model: device.model.clone(),
            identifier: device.actor_identification_number.clone(),
            ..Self::default()
        }
    }

    fn apply_skill(&mut self, skill: &Skill) {
        match skill {
            Skill::SmartHomeThermostat(thermostat) => self.apply_thermostat(thermostat),
            Skill::SmartHomeTemperatureSensor(sensor) => {
                self.current_temperature = Some(sensor.current_in_celsius);
            }
            Skill::SmartHomeHumiditySensor(sensor) => {
                self.current_humidity = Some(sensor.current_in_percent);
            }
            Skill::SmartHomeBattery(battery) => {
                self.battery_charge_level = Some(battery.charge_level_in_percent);
                if battery.battery_low.is_some() {
                    self.battery_low = battery.battery_low;
                }
            }
            Skill::SmartHomeMultimeter(meter) => {
                if meter.electric_current_in_ampere.is_some() {
                    self.current_in_amp = meter.electric_current_in_ampere;
                }
                if meter.power_consumption_in_watt.is_some() {
                    self.power_in_watt = meter.power_consumption_in_watt;
                }
                if let Some(wh) = meter.power_per_hour {
                    self.energy_in_kwh = Some(wh / 1000.0);
                }
                if meter.voltage_in_volt.is_some() {
                    self.voltage_in_volt = meter.voltage_in_volt;
                }
            }
            Skill::SmartHomeSwitch(switch) => {
                if let Some(state) = &switch.state {
                    self.power_switch_on = Some(state == "ON");
                }
            }
            Skill::SmartHomeSocket(_) | Skill::Unknown => {}
        }
    }

    fn apply_thermostat(&mut self, skill: &ThermostatSkill) {
        if skill.mode.is_some() {
            self.mode.clone_from(&skill.mode);
        }

        // FRITZ!OS 7.5x
        if let Some(current) = skill.state.as_ref().and_then(|s| s.current.as_deref()) {
            self.summer_active = Some(current == "SUMMER");
            self.holiday_active = Some(current == "HOLIDAY");
            self.window_open = Some(current == "WINDOW_OPEN");
        }

        // FRITZ!OS 7.2x/7.3x, overrides the above when both are reported
        if skill.summer_active.is_some() {
            self.summer_active = skill.summer_active;
        }
        if skill.holiday_active.is_some() {
            self.holiday_active = skill.holiday_active;
        }
        if let Some(open) = skill
            .temperature_drop_detection
            .as_ref()
            .and_then(|d| d.is_window_open)
        {
            self.window_open = Some(open);
        }

        self.target_temperature = Some(skill.target_temp);

        if let Some(sensor) = &skill.used_temp_sensor {
            for reading in sensor.skills.iter().filter_map(|s| s.current_in_celsius) {
                self.reference_temperature = Some(reading);
            }
        }
    }
}

/// Normalize the raw `{data: {devices: [...]}}` document
pub fn normalize(raw: &Value) -> Result<HashMap<String, NormalizedDevice>> {
    let response = SmartHomeResponse::deserialize(raw)
        .map_err(|e| FritzboxError::malformed(e.to_string()))?;
    Ok(normalize_devices(&response.data.devices))
}

/// Normalize already decoded devices, keyed by device id
pub fn normalize_devices(devices: &[RawDevice]) -> HashMap<String, NormalizedDevice> {
    let mut normalized = HashMap::with_capacity(devices.len());

    for device in devices {
        debug!(
            "device {}: cat:{}, type:{}, con:{}",
            device.display_name,
            device.category,
            device.device_type,
            device.master_connection_state
        );

        let mut simple = NormalizedDevice::new(device);

        for unit in &device.units {
            debug!("    unit {}: type:{}", unit.display_name, unit.unit_type);

            for skill in &unit.skills {
                debug!("        skill, type:{}", skill.kind());
                simple.apply_skill(skill);
            }
        }

        debug!(?simple, "normalized device {}", simple.id);
        normalized.insert(simple.id.clone(), simple);
    }

    normalized
}

/// Order devices by display name for stable output
pub fn sort_by_display_name(devices: HashMap<String, NormalizedDevice>) -> Vec<NormalizedDevice> {
    let mut sorted: Vec<NormalizedDevice> = devices.into_values().collect();
    sorted.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}
