//! Tests for fviz-model types.

use fviz_model::{
    ConditionRegressor, Dimensions, HemisphereInfo, Modality, TaskSummary, TimeSeriesSummary,
    ValueRange, ViewerMetadata,
};

fn surface_metadata() -> ViewerMetadata {
    ViewerMetadata {
        modality: Modality::Surface,
        timepoints: 3,
        dimensions: Dimensions::Surface {
            left: Some(HemisphereInfo {
                vertices: 4,
                faces: 2,
            }),
            right: None,
        },
        global_range: Some(ValueRange::new(-1.5, 2.25)),
        frame_ranges: vec![
            Some(ValueRange::new(-1.5, 0.0)),
            Some(ValueRange::new(0.0, 2.25)),
            None,
        ],
        anat_input: false,
        mask_input: false,
        left_input: true,
        right_input: false,
        time_series: vec![TimeSeriesSummary {
            label: "motion".to_string(),
            length: 3,
            range: Some(ValueRange::new(0.1, 0.3)),
        }],
        task: Some(TaskSummary {
            tr: 2.0,
            slicetime_ref: 0.5,
            frame_times: vec![1.0, 3.0, 5.0],
            conditions: vec![ConditionRegressor {
                label: "task".to_string(),
                block: vec![0.0, 1.0, 0.0],
                hrf: vec![0.0, 0.2, 0.4],
            }],
        }),
    }
}

#[test]
fn metadata_serializes_with_tagged_dimensions() {
    let metadata = surface_metadata();
    let value = serde_json::to_value(&metadata).expect("serialize metadata");

    assert_eq!(value["modality"], "surface");
    assert_eq!(value["dimensions"]["kind"], "surface");
    assert_eq!(value["dimensions"]["left"]["vertices"], 4);
    assert!(value["dimensions"]["right"].is_null());
}

#[test]
fn metadata_json_round_trip() {
    let metadata = surface_metadata();
    let json = serde_json::to_string(&metadata).expect("serialize metadata");
    let round: ViewerMetadata = serde_json::from_str(&json).expect("deserialize metadata");
    assert_eq!(round, metadata);
}

#[test]
fn metadata_label_accessors() {
    let metadata = surface_metadata();
    assert_eq!(metadata.time_series_labels(), vec!["motion"]);
    assert_eq!(metadata.condition_labels(), vec!["task"]);
    assert_eq!(metadata.spatial_dims(), None);
}
