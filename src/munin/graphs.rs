//! Graph plan shared by the value and config emitters
//!
//! A [`GraphPlan`] decides which multigraph sections exist, in which order,
//! and which device fields appear in each of them.

use crate::devices::NormalizedDevice;
use std::fmt;

const TITLE_PREFIX: &str = "AVM Fritz!Box SmartHome";

/// Joules per kilowatt-hour
const JOULES_PER_KWH: f64 = 3_600_000.0;

/// A single value printed on a `.value` line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Instantaneous reading, `None` prints as Munin's unknown marker
    Gauge(Option<f64>),
    /// On/off state, printed as 0/1
    Flag(bool),
    /// Cumulative energy in whole joules
    Joules(i64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Gauge(Some(value)) => write!(f, "{value}"),
            MetricValue::Gauge(None) => f.write_str("U"),
            MetricValue::Flag(on) => write!(f, "{}", u8::from(*on)),
            MetricValue::Joules(joules) => write!(f, "{joules}"),
        }
    }
}

/// Kind of device field plotted by Munin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    ReferenceTemperature,
    TargetTemperature,
    Humidity,
    WindowOpen,
    SummerMode,
    HolidayMode,
    Battery,
    BatteryLow,
    Voltage,
    Power,
    PowerAverage,
    Energy,
    PowerSwitch,
}

/// Static field attributes of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAttributes {
    pub field_type: &'static str,
    pub min: Option<&'static str>,
    pub max: Option<&'static str>,
    pub warning: Option<&'static str>,
    pub critical: Option<&'static str>,
    /// Description, followed by model and AIN in the `.info` line
    pub info: &'static str,
    /// Label inside a per-device graph, where the device name is the title
    pub detail_label: &'static str,
}

const GAUGE: FieldAttributes = FieldAttributes {
    field_type: "GAUGE",
    min: None,
    max: None,
    warning: None,
    critical: None,
    info: "",
    detail_label: "",
};

impl Metric {
    /// Field name prefix; the device id is appended
    pub fn prefix(self) -> &'static str {
        match self {
            Metric::Temperature => "t",
            Metric::ReferenceTemperature => "tref",
            Metric::TargetTemperature => "tsoll",
            Metric::Humidity => "humidity",
            Metric::WindowOpen => "windowopenmode",
            Metric::SummerMode => "summermode",
            Metric::HolidayMode => "holidaymode",
            Metric::Battery => "battery",
            Metric::BatteryLow => "batterylow",
            Metric::Voltage => "voltage",
            Metric::Power => "smarthome_power",
            Metric::PowerAverage => "smarthome_powerAvg",
            Metric::Energy => "energy",
            Metric::PowerSwitch => "smarthome_powerswitch",
        }
    }

    /// Value of this metric for `device`, `None` when the device did not report it
    pub fn value(self, device: &NormalizedDevice) -> Option<MetricValue> {
        let gauge = |v: Option<f64>| v.map(|v| MetricValue::Gauge(Some(v)));
        let flag = |v: Option<bool>| v.map(MetricValue::Flag);

        match self {
            Metric::Temperature => device.current_temperature.map(MetricValue::Gauge),
            Metric::ReferenceTemperature => gauge(device.reference_temperature),
            Metric::TargetTemperature => gauge(device.target_temperature.flatten()),
            Metric::Humidity => device.current_humidity.map(MetricValue::Gauge),
            Metric::WindowOpen => flag(device.window_open),
            Metric::SummerMode => flag(device.summer_active),
            Metric::HolidayMode => flag(device.holiday_active),
            Metric::Battery => device.battery_charge_level.map(MetricValue::Gauge),
            Metric::BatteryLow => flag(device.battery_low),
            Metric::Voltage => gauge(device.voltage_in_volt),
            Metric::Power => gauge(device.power_in_watt),
            // Truncated, so float rounding can drop a joule (9 Wh gives 32399)
            Metric::PowerAverage => device
                .energy_in_kwh
                .map(|kwh| MetricValue::Joules((kwh * JOULES_PER_KWH) as i64)),
            Metric::Energy => gauge(device.energy_in_kwh),
            Metric::PowerSwitch => flag(device.power_switch_on),
        }
    }

    /// Field attributes; `detail` selects the per-device graph variant
    pub fn attributes(self, detail: bool) -> FieldAttributes {
        match self {
            Metric::Temperature if detail => FieldAttributes {
                warning: Some("15:30"),
                critical: Some("10:35"),
                info: "Locally measured temperature",
                detail_label: "measured locally",
                ..GAUGE
            },
            Metric::Temperature => FieldAttributes {
                info: "Locally measured temperature",
                detail_label: "measured locally",
                ..GAUGE
            },
            Metric::ReferenceTemperature => FieldAttributes {
                info: "Measured reference temperature",
                detail_label: "measured ref.",
                ..GAUGE
            },
            Metric::TargetTemperature => FieldAttributes {
                info: "Target temperature",
                detail_label: "target",
                ..GAUGE
            },
            Metric::Humidity => FieldAttributes {
                min: Some("0"),
                max: Some("100"),
                warning: Some("30:70"),
                critical: Some("20:75"),
                info: "Humidity",
                ..GAUGE
            },
            Metric::WindowOpen => FieldAttributes {
                min: Some("0"),
                max: Some("1"),
                info: "Window Open Mode",
                detail_label: "Window Open",
                ..GAUGE
            },
            Metric::SummerMode => FieldAttributes {
                min: Some("0"),
                max: Some("1"),
                info: "Summer Mode",
                detail_label: "Summer Mode",
                ..GAUGE
            },
            Metric::HolidayMode => FieldAttributes {
                min: Some("0"),
                max: Some("1"),
                info: "Holiday Mode",
                detail_label: "Holiday Mode",
                ..GAUGE
            },
            Metric::Battery => FieldAttributes {
                min: Some("0"),
                max: Some("100"),
                warning: Some("30:110"),
                critical: Some("10:120"),
                info: "Battery",
                ..GAUGE
            },
            Metric::BatteryLow => FieldAttributes {
                min: Some("0"),
                max: Some("1"),
                warning: Some("0.5"),
                critical: Some("1"),
                info: "Battery Low Warning",
                ..GAUGE
            },
            Metric::Voltage => FieldAttributes {
                min: Some("0"),
                warning: Some("220:240"),
                critical: Some("210:245"),
                info: "Voltage",
                ..GAUGE
            },
            Metric::Power => FieldAttributes {
                min: Some("0"),
                warning: Some("1500"),
                critical: Some("2000"),
                info: "Power",
                ..GAUGE
            },
            Metric::PowerAverage => FieldAttributes {
                field_type: "DERIVE",
                min: Some("0"),
                info: "Power Average",
                ..GAUGE
            },
            Metric::Energy => FieldAttributes {
                min: Some("0"),
                info: "Energy",
                ..GAUGE
            },
            Metric::PowerSwitch => FieldAttributes {
                min: Some("0"),
                max: Some("1"),
                info: "On/Off",
                ..GAUGE
            },
        }
    }
}

/// One device field inside a graph
#[derive(Debug, Clone, PartialEq)]
pub struct Series<'a> {
    pub device: &'a NormalizedDevice,
    pub metric: Metric,
    pub value: MetricValue,
}

impl Series<'_> {
    /// Munin field name, e.g. `windowopenmode16`
    pub fn field(&self) -> String {
        format!("{}{}", self.metric.prefix(), self.device.id)
    }
}

/// One `multigraph` section
#[derive(Debug, Clone, PartialEq)]
pub struct Graph<'a> {
    /// Section name, e.g. `temperatures` or `temperatures.t16`
    pub name: String,
    pub title: String,
    pub vlabel: &'static str,
    /// Device a per-device sub-graph belongs to
    pub device: Option<&'a NormalizedDevice>,
    /// Name of the summed pseudo-field, for graphs that aggregate across devices
    pub total: Option<String>,
    pub series: Vec<Series<'a>>,
}

impl Graph<'_> {
    /// Whether this is a per-device sub-graph
    pub fn is_detail(&self) -> bool {
        self.device.is_some()
    }
}

/// Ordered list of graphs for one snapshot of devices
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPlan<'a> {
    pub graphs: Vec<Graph<'a>>,
}

/// Which devices an aggregate graph considers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Any,
    Connected,
}

impl<'a> GraphPlan<'a> {
    /// Build the plan for devices already sorted by display name
    pub fn new(devices: &'a [NormalizedDevice]) -> Self {
        let mut graphs = vec![
            aggregate(
                devices,
                "temperatures",
                "Temperatures (locally measured)",
                "degrees Celsius",
                Metric::Temperature,
                Presence::Any,
            ),
            aggregate(
                devices,
                "humidity",
                "Humidity",
                "percent",
                Metric::Humidity,
                Presence::Connected,
            ),
            aggregate(
                devices,
                "temperatures_target",
                "Target Temperatures",
                "degrees Celsius",
                Metric::TargetTemperature,
                Presence::Connected,
            ),
        ];

        graphs.extend(devices.iter().filter_map(|device| {
            detail(
                device,
                format!("temperatures.t{}", device.id),
                format!("Temperatures for {}", device.display_name),
                "degrees Celsius",
                &[
                    Metric::Temperature,
                    Metric::ReferenceTemperature,
                    Metric::TargetTemperature,
                ],
            )
        }));

        graphs.push(aggregate(
            devices,
            "thermostat_modes",
            "Thermostat Modes",
            "on/off",
            Metric::WindowOpen,
            Presence::Connected,
        ));

        graphs.extend(devices.iter().filter(|d| d.present).filter_map(|device| {
            detail(
                device,
                format!("thermostat_modes.id{}", device.id),
                format!("{TITLE_PREFIX} Modes for {}", device.display_name),
                "on/off",
                &[Metric::WindowOpen, Metric::SummerMode, Metric::HolidayMode],
            )
        }));

        let connected = [
            ("battery", "Battery", "percent", Metric::Battery, false),
            ("batterylow", "Battery Low Warning", "ok/warning", Metric::BatteryLow, false),
            ("voltage", "Voltage", "Volt", Metric::Voltage, false),
            ("smarthome_power", "Power", "Watt", Metric::Power, true),
            (
                "smarthome_powerAvg",
                "Power Average (from Energy)",
                "W",
                Metric::PowerAverage,
                true,
            ),
            ("energy", "Energy", "kWh", Metric::Energy, true),
            ("smarthome_powerswitch", "Power Switch", "On/Off", Metric::PowerSwitch, false),
        ];

        for (name, title, vlabel, metric, summed) in connected {
            let mut graph = aggregate(devices, name, title, vlabel, metric, Presence::Connected);
            if summed && !graph.series.is_empty() {
                graph.total = Some(format!("total_{name}"));
            }
            graphs.push(graph);
        }

        Self { graphs }
    }
}

fn aggregate<'a>(
    devices: &'a [NormalizedDevice],
    name: &str,
    title: &str,
    vlabel: &'static str,
    metric: Metric,
    presence: Presence,
) -> Graph<'a> {
    let series = devices
        .iter()
        .filter(|device| presence == Presence::Any || device.present)
        .filter_map(|device| {
            metric.value(device).map(|value| Series {
                device,
                metric,
                value,
            })
        })
        .collect();

    Graph {
        name: name.to_string(),
        title: format!("{TITLE_PREFIX} {title}"),
        vlabel,
        device: None,
        total: None,
        series,
    }
}

fn detail<'a>(
    device: &'a NormalizedDevice,
    name: String,
    title: String,
    vlabel: &'static str,
    metrics: &[Metric],
) -> Option<Graph<'a>> {
    let series: Vec<Series<'a>> = metrics
        .iter()
        .filter_map(|&metric| {
            metric.value(device).map(|value| Series {
                device,
                metric,
                value,
            })
        })
        .collect();

    (!series.is_empty()).then(|| Graph {
        name,
        title,
        vlabel,
        device: Some(device),
        total: None,
        series,
    })
}
