//! Property tests over generated tables.

use proptest::prelude::*;

use pipeline_csv::{CsvFile, CsvOptions, DistanceTable, remap_distance};
use pipeline_model::{NewDefect, Numeric, Orientation, Profile, Record, Schema};

fn oegiv() -> Schema {
    Schema::builtin(Profile::Oegiv).expect("builtin profile")
}

fn orientation() -> impl Strategy<Value = Option<Orientation>> {
    prop::option::of((0i64..720).prop_map(Orientation::from_minutes))
}

/// Records without thickness, category or diameter changes.
fn feature(schema: Schema) -> impl Strategy<Value = Record> {
    (
        0i64..200_000,
        0u8..4,
        0i64..19,
        0i64..500,
        orientation(),
        orientation(),
        orientation(),
    )
        .prop_map(move |(dist, kind, code, length, orient1, orient2, mp_orient)| match kind {
            0 => Record::weld(dist, "", &schema),
            1 => Record::seam(dist, code % 5, orient1, orient2, &schema).expect("seam"),
            2 => Record::marker(dist, code % 10, "", false, "", &schema).expect("marker"),
            _ => {
                let params = NewDefect {
                    code,
                    length: Numeric::Int(length),
                    depth: Numeric::Int(code),
                    orient1,
                    orient2,
                    mp_orient,
                    mp_dist: Some(dist + length / 2),
                    ..NewDefect::default()
                };
                Record::defect(dist, &params, &schema).expect("defect")
            }
        })
}

fn features() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(feature(oegiv()), 0..40)
}

proptest! {
    #[test]
    fn tables_survive_write_and_read(mut records in features()) {
        records.sort_by_key(|record| record.dist);
        for options in [CsvOptions::default(), CsvOptions::utf8()] {
            let file = CsvFile::from_records(records.clone(), options);
            let bytes = file.serialize().expect("serialize");
            let parsed = CsvFile::parse(&bytes, options).expect("parse");
            prop_assert_eq!(&parsed.records, &records);
        }
    }

    #[test]
    fn reversing_twice_is_identity(records in features()) {
        let schema = oegiv();
        let mut all = vec![Record::weld(0, "", &schema)];
        all.extend(records);
        let original = CsvFile::from_records(all, CsvOptions::utf8());

        let mut file = original.clone();
        file.reverse(&schema);
        prop_assert_eq!(file.total_length(), original.total_length());
        file.reverse(&schema);
        prop_assert_eq!(file, original);
    }

    #[test]
    fn remapping_preserves_order(
        steps in prop::collection::vec((1i64..5_000, 0i64..5_000), 2..8),
        mut positions in prop::collection::vec(0i64..40_000, 1..50),
    ) {
        let mut original = 0;
        let mut corrected = 0;
        let mut nodes = Vec::new();
        for (odometer, marker) in steps {
            original += odometer;
            corrected += marker;
            nodes.push((original, corrected));
        }
        let table = DistanceTable::new(nodes).expect("table");
        let first = table.first_node();
        positions.iter_mut().for_each(|pos| *pos += first);
        positions.sort_unstable();

        let mut cursor = 0;
        let mut previous = i64::MIN;
        for pos in positions {
            let (next, dist) = remap_distance(pos, &table, cursor);
            prop_assert!(next >= cursor);
            prop_assert!(dist >= previous);
            cursor = next;
            previous = dist;
        }
    }

    #[test]
    fn tube_lengths_cover_weld_span(
        welds in prop::collection::btree_set(0i64..100_000, 2..20),
        offsets in prop::collection::vec(0i64..1_000_000, 0..30),
    ) {
        let schema = oegiv();
        let welds: Vec<i64> = welds.into_iter().collect();
        let (first, last) = (welds[0], welds[welds.len() - 1]);
        let mut records: Vec<Record> = welds
            .iter()
            .map(|dist| Record::weld(*dist, "", &schema))
            .collect();
        for offset in offsets {
            let dist = first + offset % (last - first);
            records.push(Record::marker(dist, 3, "", true, "", &schema).expect("marker"));
        }
        let file = CsvFile::from_records(records, CsvOptions::utf8());

        let tubes: Vec<_> = file.tubes(None).collect::<Result<_, _>>().expect("tubes");
        prop_assert_eq!(tubes.len(), welds.len() - 1);
        let total: i64 = tubes.iter().filter_map(|tube| tube.length).sum();
        prop_assert_eq!(total, last - first);
    }
}
