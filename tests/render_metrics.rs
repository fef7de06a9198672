use std::collections::HashSet;

use metrics_util::debugging::DebuggingRecorder;
use richdoc::application::render::{DocumentRenderService, RenderRequest, RenderService};
use serde_json::json;

#[test]
fn render_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let service = DocumentRenderService::default();

    // Document with an unknown node type.
    service.render(&RenderRequest::new(json!({
        "type": "doc",
        "content": [{ "type": "callout", "content": [{ "type": "text", "text": "Note" }] }]
    })));

    // Many distinct unknown node types.
    let junk: Vec<_> = (0..50)
        .map(|index| json!({ "type": format!("junk{index}") }))
        .collect();
    service.render(&RenderRequest::new(json!({ "type": "doc", "content": junk })));

    // Structured input that fails to decode.
    service.render(&RenderRequest::new(json!({ "type": "doc", "content": "oops" })));

    // Legacy markup.
    service.render(&RenderRequest::new("<p>legacy</p>"));

    let snapshot = snapshotter.snapshot().into_vec();

    let names: HashSet<String> = snapshot
        .iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "richdoc_render_total",
        "richdoc_render_fallback_total",
        "richdoc_unknown_node_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }

    let outcomes: HashSet<String> = snapshot
        .iter()
        .filter(|(composite_key, _, _, _)| composite_key.key().name() == "richdoc_render_total")
        .flat_map(|(composite_key, _, _, _)| {
            composite_key
                .key()
                .labels()
                .filter(|label| label.key() == "outcome")
                .map(|label| label.value().to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    for outcome in ["document", "fallback", "markup"] {
        assert!(outcomes.contains(outcome), "missing outcome label: {outcome}");
    }

    let unknown_series: Vec<_> = snapshot
        .iter()
        .filter(|(composite_key, _, _, _)| {
            composite_key.key().name() == "richdoc_unknown_node_total"
        })
        .collect();
    assert_eq!(unknown_series.len(), 1, "unknown node types must share one series");
    assert_eq!(unknown_series[0].0.key().labels().count(), 0);
}
