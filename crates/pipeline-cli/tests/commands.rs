//! Commands run against tables in a temporary directory.

use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use pipeline_cli::cli::{Cli, Command, JoinArgs, RemapArgs, ReportArgs, ReverseArgs, UniqueArgs};
use pipeline_cli::commands::{
    JoinArg, RunContext, run_join, run_remap, run_reverse, run_stats, run_tubes, run_unique,
    tube_rows,
};
use pipeline_cli::config::Settings;
use pipeline_csv::{CsvFile, CsvOptions};
use pipeline_model::{NewDefect, Numeric, Record, Schema};

fn context() -> RunContext {
    RunContext::from_settings(&Settings::default()).expect("context")
}

fn write_table(dir: &Path, name: &str, records: Vec<Record>) -> PathBuf {
    let path = dir.join(name);
    CsvFile::from_records(records, CsvOptions::default())
        .to_path(&path)
        .expect("write table");
    path
}

fn read_distances(path: &Path) -> Vec<i64> {
    let file = CsvFile::from_path(path, CsvOptions::default()).expect("read table");
    file.records.iter().map(|record| record.dist).collect()
}

fn surveyed(schema: &Schema) -> Vec<Record> {
    let corrosion = NewDefect {
        code: 0,
        length: Numeric::Int(10),
        depth: Numeric::Int(20),
        ..NewDefect::default()
    };
    vec![
        Record::weld(0, "A-1", schema),
        Record::thickness(5, 105, schema),
        Record::defect(200, &corrosion, schema).expect("defect"),
        Record::weld(1000, "", schema),
        Record::marker(1500, 0, "Кран 7", true, "", schema).expect("marker"),
    ]
}

#[test]
fn reverse_writes_mirrored_table() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let input = write_table(
        dir.path(),
        "in.csv",
        vec![
            Record::weld(0, "", &context.schema),
            Record::marker(300, 0, "", false, "", &context.schema).expect("marker"),
            Record::weld(1000, "", &context.schema),
        ],
    );
    let output = dir.path().join("out.csv");

    run_reverse(
        &ReverseArgs {
            input,
            output: output.clone(),
        },
        &context,
    )
    .expect("reverse");
    assert_eq!(read_distances(&output), vec![0, 700, 1000]);
}

#[test]
fn join_places_tables_after_gaps() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let schema = &context.schema;
    let first = write_table(
        dir.path(),
        "a.csv",
        vec![Record::weld(0, "", schema), Record::weld(1000, "", schema)],
    );
    let second = write_table(
        dir.path(),
        "b.csv",
        vec![Record::weld(0, "", schema), Record::weld(500, "", schema)],
    );
    let output = dir.path().join("joined.csv");

    run_join(
        &JoinArgs {
            output: output.clone(),
            items: vec![
                first.display().to_string(),
                "100".to_string(),
                second.display().to_string(),
            ],
        },
        &context,
    )
    .expect("join");
    assert_eq!(read_distances(&output), vec![0, 1000, 1100, 1600]);
}

#[test]
fn join_items_parse_as_gaps_or_paths() {
    assert_eq!(JoinArg::parse("250").expect("gap"), JoinArg::Gap(250));
    assert_eq!(
        JoinArg::parse("part2.csv").expect("path"),
        JoinArg::Table(PathBuf::from("part2.csv"))
    );
    assert!(JoinArg::parse("-5").is_err());
}

#[test]
fn remap_applies_distance_table() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let schema = &context.schema;
    let input = write_table(
        dir.path(),
        "in.csv",
        vec![
            Record::weld(0, "", schema),
            Record::weld(40, "", schema),
            Record::weld(100, "", schema),
        ],
    );
    let table = dir.path().join("nodes.csv");
    std::fs::write(&table, "old;new\n0;0\n100;50\n").expect("write nodes");
    let output = dir.path().join("out.csv");

    run_remap(
        &RemapArgs {
            input,
            table,
            output: output.clone(),
        },
        &context,
    )
    .expect("remap");
    assert_eq!(read_distances(&output), vec![0, 20, 50]);
}

#[test]
fn remap_failure_leaves_no_output() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let input = write_table(dir.path(), "in.csv", vec![Record::weld(5, "", &context.schema)]);
    let table = dir.path().join("nodes.csv");
    std::fs::write(&table, "old;new\n10;0\n100;50\n").expect("write nodes");
    let output = dir.path().join("out.csv");

    let error = run_remap(
        &RemapArgs {
            input,
            table,
            output: output.clone(),
        },
        &context,
    )
    .expect_err("record before first node");
    assert!(error.to_string().contains("dist 5 < node 10"), "{error}");
    assert!(!output.exists());
}

#[test]
fn unique_moves_shared_distances() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let schema = &context.schema;
    let input = write_table(
        dir.path(),
        "in.csv",
        vec![
            Record::weld(0, "", schema),
            Record::weld(1000, "", schema),
            Record::marker(1000, 0, "", false, "", schema).expect("marker"),
        ],
    );
    let output = dir.path().join("out.csv");

    let shifted = run_unique(
        &UniqueArgs {
            input,
            output: output.clone(),
            shift: 1,
        },
        &context,
    )
    .expect("unique");
    assert_eq!(shifted, 1);
    assert_eq!(read_distances(&output), vec![0, 1000, 1001]);
}

#[test]
fn tubes_json_lists_every_tube() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let input = write_table(dir.path(), "in.csv", surveyed(&context.schema));

    let text = run_tubes(&ReportArgs { input, json: true }, &context).expect("tubes");
    let rows: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["number"], "A-1");
    assert_eq!(rows[0]["length"], 1000);
    assert_eq!(rows[0]["thickness"], 105);
    assert_eq!(rows[0]["features"], "Коррозия: 1");
    assert_eq!(rows[1]["number"], "2");
    assert_eq!(rows[1]["length"], 500);
    assert_eq!(rows[1]["features"], "Кран: 1");
}

#[test]
fn tube_rows_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let input = write_table(dir.path(), "in.csv", surveyed(&context.schema));
    let file = context.load(&input).expect("load");

    let rows = tube_rows(&file, &context.schema, None).expect("rows");
    insta::assert_json_snapshot!(rows, @r#"
    [
      {
        "number": "A-1",
        "auto_number": 1,
        "start": 0,
        "length": 1000,
        "thickness": 105,
        "thickness_change": true,
        "category": null,
        "category_change": false,
        "diameter": null,
        "diameter_change": false,
        "seam": "",
        "defects": 1,
        "features": "Коррозия: 1"
      },
      {
        "number": "2",
        "auto_number": 2,
        "start": 1000,
        "length": 500,
        "thickness": 105,
        "thickness_change": false,
        "category": null,
        "category_change": false,
        "diameter": null,
        "diameter_change": false,
        "seam": "",
        "defects": 0,
        "features": "Кран: 1"
      }
    ]
    "#);
}

#[test]
fn tubes_table_has_totals_row() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let input = write_table(dir.path(), "in.csv", surveyed(&context.schema));

    let text = run_tubes(&ReportArgs { input, json: false }, &context).expect("tubes");
    assert!(text.contains("A-1"), "{text}");
    assert!(text.contains("TOTAL"), "{text}");
    assert!(text.contains("1500"), "{text}");
    assert!(text.contains("2 tubes"), "{text}");
}

#[test]
fn stats_report_names_defects_and_markers() {
    let dir = TempDir::new().expect("tempdir");
    let context = context();
    let input = write_table(dir.path(), "in.csv", surveyed(&context.schema));

    let text = run_stats(
        &ReportArgs {
            input: input.clone(),
            json: false,
        },
        &context,
    )
    .expect("stats");
    assert!(text.contains("Коррозия"), "{text}");
    assert!(text.contains("Кран 7"), "{text}");

    let json = run_stats(&ReportArgs { input, json: true }, &context).expect("stats");
    let totals: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(totals["pipes"]["number"], 2);
    assert_eq!(totals["length"], 1500);
    assert_eq!(totals["defects"]["number"], 1);
    assert_eq!(totals["markers"][0]["dist"], 1500);
}

#[test]
fn missing_input_reports_path() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("absent.csv");
    let error = run_tubes(&ReportArgs { input, json: false }, &context())
        .expect_err("missing file");
    assert!(format!("{error:#}").contains("absent.csv"), "{error:#}");
}

#[test]
fn global_table_flags_parse_after_subcommand() {
    let cli = Cli::try_parse_from([
        "pipecsv",
        "stats",
        "table.csv",
        "--json",
        "--encoding",
        "utf-8",
        "--delimiter",
        ",",
        "--profile",
        "empty",
    ])
    .expect("parse");
    assert_eq!(cli.table.encoding.as_deref(), Some("utf-8"));
    assert_eq!(cli.table.delimiter, Some(','));
    match cli.command {
        Command::Stats(args) => {
            assert!(args.json);
            assert_eq!(args.input, PathBuf::from("table.csv"));
        }
        _ => panic!("expected stats"),
    }

    let settings = Settings::resolve(&cli.table).expect("settings");
    assert_eq!(settings.csv_options().expect("options").delimiter, b',');
}

#[test]
fn settings_file_feeds_commands() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("settings.toml");
    std::fs::write(
        &config,
        "[csv]\nencoding = \"utf-8\"\ndefault_diameter = 1420\n[schema]\nprofile = \"oegiv\"\n",
    )
    .expect("write settings");
    let cli = Cli::try_parse_from([
        "pipecsv",
        "--config",
        config.to_str().expect("utf-8 path"),
        "tubes",
        "in.csv",
    ])
    .expect("parse");

    let settings = Settings::resolve(&cli.table).expect("settings");
    let context = RunContext::from_settings(&settings).expect("context");
    assert_eq!(context.options.encoding, encoding_rs::UTF_8);
    assert_eq!(context.default_diameter, Some(1420));
}
