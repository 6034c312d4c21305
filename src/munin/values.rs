//! Current values (`fetch` output)

use super::graphs::GraphPlan;
use super::PluginOutput;
use crate::error::Result;

/// Print one `multigraph` section per graph with a `.value` line per field
pub fn emit_values(plan: &GraphPlan<'_>, out: &mut dyn PluginOutput) -> Result<()> {
    for (index, graph) in plan.graphs.iter().enumerate() {
        if index > 0 {
            out.blank()?;
        }

        out.line(&format!("multigraph {}", graph.name))?;
        for series in &graph.series {
            out.line(&format!("{}.value {}", series.field(), series.value))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::NormalizedDevice;

    #[test]
    fn test_sections_are_separated_by_one_blank_line() {
        let mut sensor = NormalizedDevice {
            id: "20".to_string(),
            display_name: "Keller".to_string(),
            present: true,
            ..NormalizedDevice::default()
        };
        sensor.current_humidity = Some(Some(61.0));
        let devices = [sensor];

        let mut lines: Vec<String> = Vec::new();
        emit_values(&GraphPlan::new(&devices), &mut lines).unwrap();

        assert_eq!(
            &lines[..6],
            [
                "multigraph temperatures",
                "",
                "multigraph humidity",
                "humidity20.value 61",
                "",
                "multigraph temperatures_target",
            ]
        );
        assert_eq!(lines.last().map(String::as_str), Some("multigraph smarthome_powerswitch"));
    }
}
