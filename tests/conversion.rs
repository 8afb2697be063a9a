use pretty_assertions::assert_eq;
use sqlport::prelude::*;
use sqlport::transpiler::squash_whitespace;

fn converter() -> Converter {
    Converter::new(DialectDefinition::dameng(), GeneratorOptions::compact())
}

fn run(script: &str) -> ConversionReport {
    converter().convert_script(script, &mut Diagnostics::new())
}

const MIXED: &str = "
-- schema
CREATE TABLE `users` (
  `id` INT NOT NULL AUTO_INCREMENT,
  `name` VARCHAR(64) NOT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;

INSERT INTO `users` (`id`, `name`) VALUES (1, 'alice'), (2, 'bob');
CREATE TABLE t (id INT) ROW_FORMAT=DYNAMIC;
LOCK TABLES `users` WRITE;
SELECT name FROM users WHERE id > 1 ORDER BY name LIMIT 5;
THIS IS NOT SQL;
UPDATE users SET name = 'carol' WHERE id = 2;
";

#[test]
fn test_scenario_a_table_options_stripped() {
    let report = run("CREATE TABLE t (id INT) ENGINE=InnoDB ROW_FORMAT=COMPRESSED AUTO_INCREMENT=5;");

    assert_eq!(
        report.results[0].result,
        ConversionResult::PreprocessedSuccess("CREATE TABLE t (id INT)".to_string())
    );
    assert_eq!(report.output, "CREATE TABLE t (id INT);\n");
    assert_eq!(report.stats.preprocessed_success, 1);
}

#[test]
fn test_scenario_b_limit_offset() {
    let report = run("SELECT * FROM users LIMIT 10 OFFSET 5;");

    assert_eq!(
        report.results[0].result,
        ConversionResult::DirectSuccess("SELECT * FROM users LIMIT 10 OFFSET 5".to_string())
    );
    assert!(!report.results[0].preprocessor_invoked());
}

#[test]
fn test_scenario_c_index_method_stripped() {
    let report = run("ALTER TABLE t ADD INDEX idx (a) USING BTREE;");

    assert_eq!(
        report.results[0].result,
        ConversionResult::PreprocessedSuccess("CREATE INDEX idx ON t (a)".to_string())
    );
}

#[test]
fn test_scenario_d_charset_rewritten_before_parsing() {
    let report = run(
        "CREATE TABLE t (name VARCHAR(10) CHARACTER SET utf8mb4) DEFAULT CHARSET=utf8mb4;\n\
         SELECT 'utf8mb4';",
    );

    assert_eq!(report.replacements, 3);
    assert_eq!(report.stats.failed, 0);
    assert!(!report.output.to_lowercase().contains("utf8mb4"));
    assert!(report.output.contains("SELECT 'UTF8'"));
}

#[test]
fn test_scenario_e_unrecognized_statement() {
    let memory = MemorySink::new();
    let mut diagnostics = Diagnostics::new().with_sink(memory.clone());
    let report = converter().convert_script("SELECT 1;\nTHIS IS NOT SQL;\nSELECT 2;", &mut diagnostics);

    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.output, "SELECT 1;\nSELECT 2;\n");
    assert!(!report.results[1].preprocessor_invoked());

    let logged = memory.events().into_iter().any(|event| match event {
        DiagnosticEvent::Outcome {
            index: 2,
            outcome: OutcomeKind::Failed,
            statement,
            ..
        } => statement.as_deref() == Some("THIS IS NOT SQL"),
        _ => false,
    });
    assert!(logged, "full statement text missing from diagnostics");
}

#[test]
fn test_embedded_quotes_survive_passthrough() {
    let report = run(
        "CREATE VIEW v AS SELECT 'it''s' AS x;\n\
         CREATE TABLE t (a VARCHAR(10), CHECK (a <> 'it''s'));",
    );

    assert_eq!(
        report.results[0].result,
        ConversionResult::DirectSuccess("CREATE VIEW v AS SELECT 'it''s' AS x".to_string())
    );
    assert_eq!(
        report.results[1].result,
        ConversionResult::DirectSuccess("CREATE TABLE t (a VARCHAR(10), CHECK (a <> 'it''s'))".to_string())
    );
}

#[test]
fn test_stats_invariant() {
    let report = run(MIXED);
    let stats = report.stats;

    assert_eq!(stats.total, 7);
    assert_eq!(stats.total, stats.direct_success + stats.preprocessed_success + stats.failed);
    assert_eq!(stats.total, report.results.len());
    // LOCK TABLES and the garbage line.
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.preprocessed_success, 1);
}

#[test]
fn test_empty_script() {
    let report = run("  -- nothing here\n/* still nothing */ ;\n");

    assert_eq!(report.stats, ConversionStats::default());
    assert_eq!(report.stats.success_rate(), None);
    assert_eq!(report.output, "");
}

#[test]
fn test_order_preserved() {
    let report = run(MIXED);
    let rendered: Vec<&str> = report
        .results
        .iter()
        .filter_map(|r| r.result.rendered())
        .collect();

    assert_eq!(report.output, rendered.iter().map(|s| format!("{};\n", s)).collect::<String>());
    let indexes: Vec<usize> = report.results.iter().map(|r| r.statement.index).collect();
    assert_eq!(indexes, (1..=7).collect::<Vec<_>>());
    assert!(rendered[0].starts_with("CREATE TABLE \"users\""));
    assert!(rendered.last().unwrap().starts_with("UPDATE users"));
}

#[test]
fn test_fallback_only_after_direct_failure() {
    for report in run(MIXED).results {
        let direct_ok = report
            .attempts
            .iter()
            .any(|a| a.stage == sqlport::engine::Stage::Direct && a.error.is_none());
        if direct_ok {
            assert!(!report.preprocessor_invoked(), "#{}", report.statement.index);
            assert!(matches!(report.result, ConversionResult::DirectSuccess(_)));
        }
    }
}

#[test]
fn test_pretty_equals_compact() {
    let pretty = Converter::new(DialectDefinition::dameng(), GeneratorOptions::default())
        .convert_script(MIXED, &mut Diagnostics::new());
    let compact = run(MIXED);

    assert_eq!(pretty.stats, compact.stats);
    assert_eq!(squash_whitespace(&pretty.output), squash_whitespace(&compact.output));
}

#[test]
fn test_dameng_dialect_complete() {
    let audit = DialectDefinition::dameng().audit();
    assert!(audit.is_complete(), "{:?}", audit);
}

#[test]
fn test_preprocessor_idempotent() {
    let preprocessor = Preprocessor::default();
    for text in [
        "CREATE TABLE t (a INT, KEY k (a) USING BTREE) ROW_FORMAT=DYNAMIC AUTO_INCREMENT=9",
        "CREATE TABLE t (ts TIMESTAMP ON UPDATE CURRENT_TIMESTAMP)",
        "SELECT 1",
    ] {
        let once = preprocessor.normalize(text).text;
        assert_eq!(preprocessor.normalize(&once).text, once);
    }
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let sequential = run(MIXED);
    for jobs in [1, 2, 3, 16] {
        let concurrent = converter()
            .convert_script_concurrent(MIXED, jobs, &mut Diagnostics::new())
            .await
            .unwrap();
        assert_eq!(concurrent.output, sequential.output, "jobs = {}", jobs);
        assert_eq!(concurrent.stats, sequential.stats, "jobs = {}", jobs);
    }
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dump.sql");
    let output = dir.path().join("dump_dameng.sql");
    let log = dir.path().join("convert.log");
    std::fs::write(&input, MIXED).unwrap();

    let mut diagnostics = Diagnostics::new().with_sink(JsonLinesSink::create(&log).unwrap());
    let report = converter().convert_file(&input, &output, &mut diagnostics).unwrap();
    diagnostics.finish().unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), report.output);
    let log = std::fs::read_to_string(&log).unwrap();
    let last: serde_json::Value = serde_json::from_str(log.lines().last().unwrap()).unwrap();
    assert_eq!(last["event"], "summary");
    assert_eq!(last["total"], 7);
    assert!(log.contains("THIS IS NOT SQL"));
}

#[test]
fn test_script_fatal_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.sql");
    let err = converter()
        .convert_file(&missing, dir.path().join("out.sql"), &mut Diagnostics::new())
        .unwrap_err();
    assert!(err.is_fatal());

    let binary = dir.path().join("binary.sql");
    std::fs::write(&binary, [0x53, 0x45, 0xff, 0xfe]).unwrap();
    let err = converter()
        .convert_file(&binary, dir.path().join("out.sql"), &mut Diagnostics::new())
        .unwrap_err();
    assert!(matches!(err, ConvertError::Encoding(_)));
}
