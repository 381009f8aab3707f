use std::collections::BTreeSet;
use std::path::Path;

use table_sketch::{
    Document, GraphPatch, LayoutConfig, Position, Session, SessionError, build_graph,
    collapse_graph, decode, encode, load, validate,
};

fn read_fixture(rel: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    assert!(path.exists(), "fixture missing: {}", rel);
    std::fs::read_to_string(path).expect("fixture read failed")
}

fn table_names(doc: &Document) -> BTreeSet<String> {
    doc.tables.iter().map(|t| t.name.clone()).collect()
}

fn ref_pairs(doc: &Document) -> BTreeSet<(String, String)> {
    doc.refs
        .iter()
        .map(|r| (r.source.table.clone(), r.target.table.clone()))
        .collect()
}

// Keep this list explicit so new fixtures must be added intentionally.
const VALID: [&str; 4] = [
    "valid/shop.json5",
    "valid/styled.json5",
    "valid/dangling_ref.json5",
    "valid/empty.json",
];

#[test]
fn valid_fixtures_round_trip() {
    for rel in VALID {
        let text = read_fixture(rel);
        let (doc, graph) = load(&text, &LayoutConfig::default())
            .unwrap_or_else(|err| panic!("{rel}: {err}"));
        assert_eq!(graph.nodes.len(), doc.tables.len(), "{rel}");

        let back = collapse_graph(&graph);
        assert_eq!(table_names(&doc), table_names(&back), "{rel}");
        assert_eq!(ref_pairs(&doc), ref_pairs(&back), "{rel}");
        assert!(back.tables.iter().all(|t| t.position.is_some()), "{rel}");
    }
}

#[test]
fn valid_fixtures_have_stable_canonical_text() {
    for rel in VALID {
        let doc = validate(&decode(&read_fixture(rel)).unwrap()).unwrap();
        let canonical = encode(&doc);
        let reparsed = validate(&decode(&canonical).unwrap()).unwrap();
        assert_eq!(reparsed, doc, "{rel}");
        assert_eq!(encode(&reparsed), canonical, "{rel}");
    }
}

#[test]
fn styled_fixture_keeps_explicit_positions() {
    let doc = validate(&decode(&read_fixture("valid/styled.json5")).unwrap()).unwrap();
    let graph = build_graph(&doc);
    assert_eq!(graph.nodes[0].position, Position::new(0.0, 0.0));
    assert_eq!(graph.nodes[1].position, Position::new(310.0, 10.0));
    assert_eq!(graph.nodes[2].position, Position::new(120.5, -40.0));
    assert_eq!(graph.nodes[0].data.background_color.as_deref(), Some("#fed7aa"));
    let ids: Vec<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["workorder/crew", "workorder/site", "crew/workorder"]);
}

#[test]
fn invalid_fixtures_report_located_errors() {
    let cases: [(&str, &[&str]); 4] = [
        ("invalid/unknown_key.json5", &["/tables/0/extra"]),
        ("invalid/missing_name.json5", &["/tables/0"]),
        ("invalid/duplicate_name.json5", &["/tables/1/name"]),
        (
            "invalid/bad_ref.json5",
            &["/refs/0/label", "/refs/0/target/table"],
        ),
    ];
    for (rel, expected) in cases {
        match load(&read_fixture(rel), &LayoutConfig::default()) {
            Err(SessionError::Validation(errors)) => {
                let paths: Vec<&str> = errors.paths().collect();
                assert_eq!(paths, expected, "{rel}");
            }
            other => panic!("{rel}: expected validation error, got {other:?}"),
        }
    }
    assert!(matches!(
        load(&read_fixture("invalid/unclosed.json5"), &LayoutConfig::default()),
        Err(SessionError::Parse(_))
    ));
}

#[test]
fn invalid_fixtures_do_not_disturb_session() {
    let session = Session::open(read_fixture("valid/shop.json5"));
    let good = session.graph().clone();
    let mut session = session;
    for rel in [
        "invalid/unclosed.json5",
        "invalid/unknown_key.json5",
        "invalid/missing_name.json5",
        "invalid/duplicate_name.json5",
        "invalid/bad_ref.json5",
    ] {
        session = session.apply_text_change(read_fixture(rel));
        assert!(session.last_error().is_some(), "{rel}");
        assert_eq!(session.graph(), &good, "{rel}");
    }
}

#[test]
fn shop_scenario_end_to_end() {
    let session = Session::open(read_fixture("valid/shop.json5"));
    let graph = session.graph();
    assert_eq!(graph.nodes[0].position, Position::new(10.0, 10.0));
    assert_eq!(graph.nodes[1].position, Position::new(310.0, 10.0));
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].id, "order/address");

    let session = session
        .apply_graph_patch(GraphPatch::NodeMoved {
            id: "order".into(),
            position: Position::new(50.0, 60.0),
        })
        .publish();
    let doc = session.document().unwrap();
    assert_eq!(doc.tables[0].name, "order");
    assert_eq!(doc.tables[0].position, Some(Position::new(50.0, 60.0)));

    let reread = validate(&decode(session.text()).unwrap()).unwrap();
    assert_eq!(&reread, doc);
}

#[test]
fn interactive_edits_publish_as_refs() {
    let session = Session::open(read_fixture("valid/shop.json5"))
        .apply_graph_patch(GraphPatch::NodeAdded {
            id: "customer".into(),
            position: Position::new(10.0, 300.0),
            data: Default::default(),
        })
        .apply_graph_patch(GraphPatch::EdgeAdded {
            source: "customer".into(),
            target: "order".into(),
        })
        .apply_graph_patch(GraphPatch::EdgeRemoved {
            id: "order/address".into(),
        })
        .publish();
    assert!(session.last_error().is_none());
    let doc = session.document().unwrap();
    assert_eq!(doc.tables.last().unwrap().name, "customer");
    assert_eq!(
        ref_pairs(doc),
        BTreeSet::from([("customer".to_string(), "order".to_string())])
    );
}
