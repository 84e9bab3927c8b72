use wiki_comments_engine::{EditOp, Offset, Opcode, edits_from_opcodes, remap_offsets};

/// Anchors on four paragraphs of a page, and the diff of a rebuild that
/// removed an introduction and touched up every paragraph.
fn paragraph_anchors() -> Vec<Offset> {
    vec![
        Offset::new(372, 439),
        Offset::new(441, 586),
        Offset::new(588, 744),
        Offset::new(746, 810),
    ]
}

fn rebuild_diff() -> Vec<EditOp> {
    let opcodes: Vec<Opcode> = serde_json::from_str(
        r#"[
            {"tag": "equal", "i1": 0, "i2": 20, "j1": 0, "j2": 20},
            {"tag": "delete", "i1": 20, "i2": 298, "j1": 20, "j2": 20},
            {"tag": "equal", "i1": 298, "i2": 420, "j1": 20, "j2": 142},
            {"tag": "replace", "i1": 420, "i2": 423, "j1": 142, "j2": 145},
            {"tag": "equal", "i1": 423, "i2": 538, "j1": 145, "j2": 260},
            {"tag": "insert", "i1": 538, "i2": 538, "j1": 260, "j2": 265},
            {"tag": "equal", "i1": 538, "i2": 586, "j1": 265, "j2": 313},
            {"tag": "insert", "i1": 586, "i2": 586, "j1": 313, "j2": 321},
            {"tag": "equal", "i1": 586, "i2": 696, "j1": 321, "j2": 431},
            {"tag": "delete", "i1": 696, "i2": 712, "j1": 431, "j2": 431},
            {"tag": "equal", "i1": 712, "i2": 752, "j1": 431, "j2": 471},
            {"tag": "replace", "i1": 752, "i2": 755, "j1": 471, "j2": 473},
            {"tag": "equal", "i1": 755, "i2": 770, "j1": 473, "j2": 488},
            {"tag": "replace", "i1": 770, "i2": 773, "j1": 488, "j2": 490},
            {"tag": "equal", "i1": 773, "i2": 900, "j1": 490, "j2": 617}
        ]"#,
    )
    .unwrap();
    edits_from_opcodes(opcodes).unwrap()
}

#[test]
fn rebuild_with_many_small_edits() {
    let replacements = remap_offsets(&paragraph_anchors(), &rebuild_diff());
    insta::assert_yaml_snapshot!("rebuild_with_many_small_edits", replacements);
}

#[test]
fn rewrite_swallowing_a_paragraph() {
    let anchors = [Offset::new(0, 10), Offset::new(20, 30)];
    let ops = [EditOp::replace(5, 35, 5, 10).unwrap()];

    let replacements = remap_offsets(&anchors, &ops);
    insta::assert_yaml_snapshot!("rewrite_swallowing_a_paragraph", replacements);
}

/// Remapped anchors serialize back into the JSON shape the site reads.
#[test]
fn replacements_json_shape() {
    let replacements = remap_offsets(
        &[Offset::new(0, 10), Offset::new(20, 30)],
        &[EditOp::delete(15, 20, 15).unwrap()],
    );

    let json = serde_json::to_value(&replacements).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            {"from": {"start": 0, "end": 10}, "to": {"start": 0, "end": 10}},
            {"from": {"start": 20, "end": 30}, "to": {"start": 15, "end": 25}}
        ])
    );
}
