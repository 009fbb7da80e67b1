//! Statistics over a three tube table.

use pipeline_csv::{CsvError, CsvFile, CsvOptions, Warning};
use pipeline_model::{DefectSide, NewDefect, Numeric, ObjectClass, Orientation, Profile, Record, Schema};
use pipeline_stats::{Grade, Totals};

fn oegiv() -> Schema {
    Schema::builtin(Profile::Oegiv).expect("builtin profile")
}

fn at(text: &str) -> Option<Orientation> {
    Some(text.parse().expect("orientation"))
}

fn defect(dist: i64, code: i64, depth: i64, side: DefectSide, schema: &Schema) -> Record {
    let params = NewDefect {
        code,
        side,
        depth: Numeric::Int(depth),
        ..NewDefect::default()
    };
    Record::defect(dist, &params, schema).expect("defect")
}

fn sample(schema: &Schema) -> CsvFile {
    let corrosion = NewDefect {
        code: 0,
        side: DefectSide::Outside,
        length: Numeric::Int(20),
        depth: Numeric::Int(30),
        orient1: at("2,00"),
        orient2: at("3,00"),
        mp_orient: at("2,30"),
        mp_dist: Some(105),
        ..NewDefect::default()
    };
    let records = vec![
        Record::weld(0, "", schema),
        Record::seam(10, 0, at("3,00"), None, schema).expect("seam"),
        Record::thickness(11, 105, schema),
        Record::category(12, "2", schema),
        Record::defect(100, &corrosion, schema).expect("defect"),
        Record::marker(500, 0, "Кран 1", true, "", schema).expect("marker"),
        Record::weld(1000, "", schema),
        defect(1500, 2, 0, DefectSide::Unknown, schema).with_object_id("D-9"),
        defect(1600, 0, 85, DefectSide::Inside, schema),
        Record::weld(2000, "", schema),
        Record::marker(2500, 3, "", false, "", schema).expect("marker"),
        Record::weld(3000, "", schema),
    ];
    CsvFile::from_records(records, CsvOptions::default()).with_default_diameter(Some(1000))
}

#[test]
fn totals_text() {
    let schema = oegiv();
    let file = sample(&schema);
    let totals = Totals::fill(&file, &schema, None).expect("totals");

    insta::assert_snapshot!(totals.to_string(), @r"
    Tubes: total_num: 3 total_len: 3000

    thick total_num: 3 total_len: 3000
    105 num: 3 len: 3000

    category total_num: 3 total_len: 3000
    2 num: 3 len: 3000

    types total_num: 3 total_len: 3000
    horizontal num: 1 len: 1000
    unknown num: 2 len: 2000

    Liners: total_num: 2
    0 num: 1
    3 num: 1

    Defects: total_num: 3

    depth total_num: 2
    80 num: 1 tubes: 1
    OVER_MAX num: 1 tubes: 1
    max_percent: 85

    dents total_num: 1
    5 num: 1 tubes: 1
    10 num: 0 tubes: 0
    OVER_MAX num: 0 tubes: 0

    types total_num: 3
    0 num: 2
    2 num: 1

    wallside total_num: 3
    0 num: 1
    1 num: 1
    2 num: 1

    angles 12h: 0, 1h: 0, 2h: 1, 3h: 1, 4h: 0, 5h: 0, 6h: 0, 7h: 0, 8h: 0, 9h: 0, 10h: 0, 11h: 0
    ");
}

#[test]
fn totals_extent_markers_and_segments() {
    let schema = oegiv();
    let file = sample(&schema);
    let mut warnings = Vec::new();
    let totals = Totals::fill(&file, &schema, Some(&mut warnings)).expect("totals");

    assert_eq!(totals.start, Some(0));
    assert_eq!(totals.length, 3000);
    assert_eq!(totals.markers.len(), 1);
    assert_eq!(totals.markers[0].name, "Кран 1");
    assert_eq!(totals.liners.tubes_all(), 2);

    assert_eq!(
        warnings,
        vec![Warning::ZeroDepthDent {
            object_id: "D-9".to_string(),
            dist: 1500
        }]
    );

    let defects = &totals.defects;
    assert_eq!(defects.valves.grades.count(Grade::Below(500)), 1);
    assert_eq!(defects.valves.grades.count(Grade::OverMax), 2);
    assert_eq!(defects.valves.name(Grade::Below(500)), Some("Кран 1"));
    assert_eq!(defects.distance.grades.count(Grade::Below(150)), 1);
    let starts: Vec<i64> = defects.bars.bars.iter().map(|bar| bar.start).collect();
    assert_eq!(starts, vec![0, 500]);
    assert_eq!(defects.bars.bars[1].number, 2);
    assert_eq!(defects.types.tubes_with(&0), 2);
}

#[test]
fn totals_serialize_to_json() {
    let schema = oegiv();
    let file = sample(&schema);
    let totals = Totals::fill(&file, &schema, None).expect("totals");
    let json = serde_json::to_value(&totals).expect("json");

    assert_eq!(json["pipes"]["number"], 3);
    assert_eq!(json["pipes"]["seam_types"]["values"][0]["value"], "Horizontal");
    assert_eq!(json["pipes"]["thickness"]["values"][0]["value"], 105);
    assert_eq!(json["defects"]["depth"]["grades"]["grades"][1]["grade"], "OVER_MAX");
    assert_eq!(json["defects"]["dents"]["grades"][0]["grade"], "5");
    assert_eq!(json["defects"]["bars"]["stack_by"], "wall_side");
    assert_eq!(json["defects"]["angles"]["hours"][2], 1);
}

#[test]
fn empty_table_has_empty_totals() {
    let schema = oegiv();
    let totals = Totals::fill(&CsvFile::default(), &schema, None).expect("totals");
    assert_eq!(totals.start, None);
    assert_eq!(totals.length, 0);
    assert_eq!(totals.pipes.number, 0);
    assert_eq!(totals.defects.number, 0);
    assert_eq!(totals.defects.bars.bars.len(), 1);
}

#[test]
fn assembly_errors_propagate() {
    let schema = oegiv();
    let file = CsvFile::from_records(
        vec![
            Record::weld(0, "", &schema),
            Record::with_dist(5, ObjectClass::Other(11)),
            Record::weld(100, "", &schema),
        ],
        CsvOptions::default(),
    );
    assert!(matches!(
        Totals::fill(&file, &schema, None),
        Err(CsvError::UnknownObject { code: 11, .. })
    ));
}
