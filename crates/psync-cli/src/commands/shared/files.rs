use std::fs;
use std::path::Path;

use anyhow::Context;
use psync_core::entities::{BatchResult, ReportRecord};
use serde::Serialize;

/// Report records from a JSON array or a JSON Lines file.
pub fn read_reports(path: &Path) -> anyhow::Result<Vec<ReportRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;

    let records: Vec<ReportRecord> = if text.trim_start().starts_with('[') {
        serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON report {}", path.display()))?
    } else {
        serde_jsonlines::json_lines(path)
            .with_context(|| format!("failed to open report {}", path.display()))?
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("invalid JSON Lines report {}", path.display()))?
    };

    if records.is_empty() {
        anyhow::bail!("report {} has no records", path.display());
    }
    Ok(records)
}

pub fn read_batch_result(path: &Path) -> anyhow::Result<BatchResult> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read batch result {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid batch result {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use psync_core::entities::{ActionAudit, ActionLog, ItemResult};
    use psync_core::enums::{Metric, TeamVariant};

    use super::*;

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn reads_json_array_reports() {
        let file = temp_file(
            r#"[
                {"playerId": "P1", "team": "carteira_i", "atividade": 85.5,
                 "cycleDay": 6, "totalCycleDays": 21, "reportDate": "2025-03-15"},
                {"playerId": "P2", "team": "cs", "conversoes": 40,
                 "cycleDay": 6, "totalCycleDays": 21, "reportDate": "2025-03-15"}
            ]"#,
        );

        let records = read_reports(file.path()).expect("reports");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].team, TeamVariant::CarteiraI);
        assert_eq!(records[0].value(Metric::Atividade), Some(85.5));
        assert_eq!(records[1].value(Metric::Conversoes), Some(40.0));
    }

    #[test]
    fn reads_json_lines_reports() {
        let file = temp_file(concat!(
            r#"{"playerId": "P1", "team": "er", "upa": 3, "cycleDay": 2, "totalCycleDays": 21, "reportDate": "2025-03-11"}"#,
            "\n",
            r#"{"playerId": "P2", "team": "er", "cycleDay": 2, "totalCycleDays": 21, "reportDate": "2025-03-11"}"#,
            "\n",
        ));

        let records = read_reports(file.path()).expect("reports");

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].player_id, "P2");
        assert!(records[1].present_metrics().is_empty());
    }

    #[test]
    fn empty_report_is_rejected() {
        let file = temp_file("[]");
        let err = read_reports(file.path()).expect_err("should fail");
        assert!(err.to_string().contains("has no records"));
    }

    #[test]
    fn malformed_line_names_the_file() {
        let file = temp_file("{\"playerId\": \"P1\"}\n");
        let err = read_reports(file.path()).expect_err("should fail");
        assert!(err.to_string().contains("invalid JSON Lines report"));
    }

    #[test]
    fn batch_result_survives_a_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("result.json");
        let batch = BatchResult::from_items(vec![ItemResult {
            index: 0,
            action_log: ActionLog {
                player_id: "P1".into(),
                action_id: "upa".into(),
                delta: 2.0,
                timestamp: Utc::now(),
                audit: ActionAudit {
                    metric: Metric::Upa,
                    previous_value: 1.0,
                    new_value: 3.0,
                    percent_change: 200.0,
                },
            },
            success: false,
            error: Some("service unavailable".into()),
            attempts: 3,
        }]);

        write_json(&path, &batch).expect("write");
        let read = read_batch_result(&path).expect("read");

        assert_eq!(read.failed, 1);
        assert_eq!(read.results[0].action_log.audit.metric, Metric::Upa);
        assert_eq!(read.results[0].error.as_deref(), Some("service unavailable"));
    }
}
