//! Parameter listing command.

use clap::Args;
use serde::Serialize;
use surge_config::format_param_value;
use surge_core::{ParamScale, ParameterInfo, SurgeSettings};

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for one parameter (string id or name)
    #[arg(value_name = "PARAM")]
    param: Option<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

/// One parameter as listed.
#[derive(Debug, Serialize)]
pub struct ParamRow {
    index: usize,
    id: u32,
    string_id: &'static str,
    name: &'static str,
    min: f32,
    max: f32,
    default: String,
    /// Default on the `0..=1` automation scale.
    default_normalized: f32,
    unit: &'static str,
    logarithmic: bool,
    values: &'static [&'static str],
}

/// Every filter parameter in index order.
pub fn param_rows() -> Vec<ParamRow> {
    let settings = SurgeSettings::default();
    (0..settings.param_count())
        .filter_map(|i| settings.param_info(i).map(|d| (i, d)))
        .map(|(index, desc)| ParamRow {
            index,
            id: desc.id.0,
            string_id: desc.string_id,
            name: desc.name,
            min: desc.min,
            max: desc.max,
            default: format_param_value(&desc, desc.default),
            default_normalized: desc.normalize(desc.default),
            unit: desc.unit.suffix().trim(),
            logarithmic: desc.scale == ParamScale::Logarithmic,
            values: desc.value_names,
        })
        .collect()
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let rows = param_rows();

    if let Some(key) = &args.param {
        let index = surge_config::SettingsValidator::new()
            .find_param_index(key)
            .ok_or_else(|| anyhow::anyhow!("Unknown parameter: {}", key))?;
        let row = &rows[index];

        if args.json {
            println!("{}", serde_json::to_string_pretty(row)?);
            return Ok(());
        }

        println!("{} ({})", row.name, row.string_id);
        println!("{}", "=".repeat(row.name.len() + row.string_id.len() + 3));
        println!();
        println!("  Index:   {}", row.index);
        println!("  ID:      {}", row.id);
        println!("  Default: {} ({:.3} normalized)", row.default, row.default_normalized);
        if row.values.is_empty() {
            println!("  Range:   {} .. {} {}", row.min, row.max, row.unit);
            if row.logarithmic {
                println!("  Scale:   logarithmic");
            }
        } else {
            println!("  Values:  {}", row.values.join(", "));
        }
        println!();
        println!("Example:");
        println!("  surge simulate --set {}={}", row.string_id, row.default.replace(' ', ""));
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Filter Parameters");
    println!("=================");
    println!();
    println!("  {:>2}  {:8}  {:24}  {:>12}  {}", "#", "ID", "Name", "Default", "Range");
    println!("  {:>2}  {:8}  {:24}  {:>12}  {}", "-", "--", "----", "-------", "-----");
    for row in &rows {
        let range = if row.values.is_empty() {
            format!("{} .. {} {}", row.min, row.max, row.unit)
        } else {
            row.values.join(" / ")
        };
        println!(
            "  {:>2}  {:8}  {:24}  {:>12}  {}",
            row.index, row.string_id, row.name, row.default, range
        );
    }
    println!();
    println!("Use 'surge params <id>' for details and '--set <id>=<value>' to change one.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_cover_every_parameter() {
        let rows = param_rows();
        assert_eq!(rows.len(), 18);
        assert_eq!(rows[0].string_id, "modein");
        assert_eq!(rows[0].default, "Gaussian");
        assert_eq!(rows[3].default, "-72 dB");
        assert_eq!(rows[5].string_id, "rms");
        assert!(rows[5].logarithmic);
        assert!(rows[5].default_normalized > 0.0 && rows[5].default_normalized < 1.0);
        assert_eq!(rows[13].default_normalized, 0.0);
        assert_eq!(rows[13].values, ["Off", "On"]);
        assert!(rows.iter().enumerate().all(|(i, r)| r.index == i));
    }
}
