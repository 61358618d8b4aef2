use psync_core::entities::{BatchResult, ReportRecord};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::commands::shared::parse::parse_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum SchemaType {
    Report,
    BatchResult,
}

fn schema_json(kind: SchemaType) -> anyhow::Result<serde_json::Value> {
    let schema = match kind {
        SchemaType::Report => schema_for!(ReportRecord),
        SchemaType::BatchResult => schema_for!(BatchResult),
    };
    Ok(serde_json::to_value(schema)?)
}

/// Handle `psync schema`. Always JSON: a schema has no table form.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind: SchemaType = parse_enum(&args.type_name, "schema type")?;
    let schema = schema_json(kind)?;
    let rendered = match flags.format {
        crate::cli::OutputFormat::Raw => serde_json::to_string(&schema)?,
        _ => serde_json::to_string_pretty(&schema)?,
    };
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_schema_uses_wire_names() {
        let schema = schema_json(SchemaType::Report).expect("schema");
        let properties = &schema["properties"];
        assert!(properties.get("playerId").is_some());
        assert!(properties.get("reaisPorAtivo").is_some());
        assert!(properties.get("player_id").is_none());
    }

    #[test]
    fn batch_result_schema_is_available() {
        let kind: SchemaType = parse_enum("batch-result", "schema type").expect("kind");
        let schema = schema_json(kind).expect("schema");
        assert!(schema["properties"].get("results").is_some());
    }
}
