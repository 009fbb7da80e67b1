use std::io::Write;

use pipeline_model::{ModelError, NewDefect, ObjectClass, Record, Schema};

#[test]
fn profile_loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
name = "acme"

[objects]
weld = "Girth weld"

[[defects]]
code = 40
name = "Pitting"

[classes]
metal_loss = [40]
"#
    )
    .expect("write profile");

    let schema = Schema::load(file.path()).expect("load profile");
    assert_eq!(schema.name, "acme");
    assert_eq!(schema.name_object(ObjectClass::Weld), "Girth weld");

    let defect = NewDefect {
        code: 40,
        ..NewDefect::default()
    };
    let record = Record::defect(10, &defect, &schema).expect("defect");
    assert_eq!(record.code_text, "Pitting");
    assert!(schema.is_metal_loss(&record));
    assert!(!schema.is_dent(&record));
}

#[test]
fn missing_profile_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");
    match Schema::load(&path) {
        Err(ModelError::ProfileRead { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
}
