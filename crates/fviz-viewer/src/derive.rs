//! Metadata derivation from a validated file set.
//!
//! Everything here is a pure function of its inputs, so rebuilding metadata
//! from the same file set always yields the same result.

use fviz_model::{
    Dimensions, FileSet, HemisphereData, HemisphereInfo, Modality, SurfaceFiles, TaskRegressors,
    TaskSummary, TimeSeries, TimeSeriesSummary, ValueRange, ViewerMetadata, VolumetricFiles,
};

/// Build the full projection for a file set and its auxiliary data.
pub(crate) fn derive_metadata(
    file_set: &FileSet,
    time_series: Option<&TimeSeries>,
    task: Option<&TaskRegressors>,
) -> ViewerMetadata {
    let mut metadata = match file_set {
        FileSet::Volumetric(files) => volumetric_metadata(files),
        FileSet::Surface(files) => surface_metadata(files),
    };
    metadata.time_series = time_series.map(summarize_series).unwrap_or_default();
    metadata.task = task.map(summarize_task);
    metadata
}

fn volumetric_metadata(files: &VolumetricFiles) -> ViewerMetadata {
    let func = &files.func;
    let [x, y, z] = func.spatial_shape().unwrap_or_default();
    let mask = files.mask.as_ref().map(|mask| mask.data());

    let frame_ranges: Vec<Option<ValueRange>> = (0..func.timepoints())
        .map(|t| {
            let volume = func.volume(t)?;
            match mask {
                Some(mask) => ValueRange::from_values(
                    volume
                        .iter()
                        .zip(mask.iter())
                        .filter(|(_, inside)| **inside != 0.0)
                        .map(|(value, _)| *value),
                ),
                None => ValueRange::from_values(volume.iter().copied()),
            }
        })
        .collect();

    ViewerMetadata {
        modality: Modality::Volumetric,
        timepoints: func.timepoints(),
        dimensions: Dimensions::Volumetric { x, y, z },
        global_range: ValueRange::union_all(frame_ranges.iter().flatten().copied()),
        frame_ranges,
        anat_input: files.anat.is_some(),
        mask_input: files.mask.is_some(),
        left_input: false,
        right_input: false,
        time_series: Vec::new(),
        task: None,
    }
}

fn hemisphere_info(data: Option<&HemisphereData>) -> Option<HemisphereInfo> {
    data.map(|data| HemisphereInfo {
        vertices: data.mesh.vertex_count(),
        faces: data.mesh.face_count(),
    })
}

fn surface_metadata(files: &SurfaceFiles) -> ViewerMetadata {
    let timepoints = files
        .present()
        .map(|(_, data)| data.func.timepoints())
        .next()
        .unwrap_or(0);

    // Both hemispheres share one color scale, so frame ranges span both.
    let frame_ranges: Vec<Option<ValueRange>> = (0..timepoints)
        .map(|t| {
            ValueRange::union_all(files.present().filter_map(|(_, data)| {
                data.func
                    .frames()
                    .get(t)
                    .and_then(|frame| ValueRange::from_values(frame.iter().copied()))
            }))
        })
        .collect();

    ViewerMetadata {
        modality: Modality::Surface,
        timepoints,
        dimensions: Dimensions::Surface {
            left: hemisphere_info(files.left.as_ref()),
            right: hemisphere_info(files.right.as_ref()),
        },
        global_range: ValueRange::union_all(frame_ranges.iter().flatten().copied()),
        frame_ranges,
        anat_input: false,
        mask_input: false,
        left_input: files.left.is_some(),
        right_input: files.right.is_some(),
        time_series: Vec::new(),
        task: None,
    }
}

pub(crate) fn summarize_series(series: &TimeSeries) -> Vec<TimeSeriesSummary> {
    series
        .iter()
        .map(|entry| TimeSeriesSummary {
            label: entry.label.clone(),
            length: entry.values.len(),
            range: ValueRange::from_values(entry.values.iter().copied()),
        })
        .collect()
}

pub(crate) fn summarize_task(task: &TaskRegressors) -> TaskSummary {
    TaskSummary {
        tr: task.tr,
        slicetime_ref: task.slicetime_ref,
        frame_times: task.frame_times.clone(),
        conditions: task.conditions.clone(),
    }
}
