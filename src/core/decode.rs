//! Strict decoding of model output into scenes and shots.
//!
//! The model's answer must match the breakdown schema exactly in the
//! fields we rely on. Any mismatch is reported as a malformed upstream
//! response; nothing is guessed from loosely shaped JSON.

use serde::Deserialize;

use crate::domain::{Scene, Shot, ShotType};
use crate::error::{ConvertError, Result};

#[derive(Debug, Deserialize)]
struct BreakdownPayload {
    scenes: Vec<ScenePayload>,
}

#[derive(Debug, Deserialize)]
struct ScenePayload {
    heading: String,
    #[serde(default)]
    summary: Option<String>,
    shots: Vec<ShotPayload>,
}

#[derive(Debug, Deserialize)]
struct ShotPayload {
    shot_type: ShotType,
    #[serde(default)]
    camera_angle: Option<String>,
    #[serde(default)]
    camera_movement: Option<String>,
    description: String,
    #[serde(default)]
    dialogue: Option<String>,
    #[serde(default)]
    duration_seconds: Option<f32>,
}

/// Decode a completion into ordered scenes.
///
/// Scene and shot numbers come from array position, so the result is
/// always numbered 1..n in narrative order.
pub fn decode_breakdown(content: &str) -> Result<Vec<Scene>> {
    let payload: BreakdownPayload = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| ConvertError::malformed(format!("breakdown does not match schema: {}", e)))?;

    if payload.scenes.is_empty() {
        return Err(ConvertError::malformed("breakdown has no scenes"));
    }

    payload
        .scenes
        .into_iter()
        .zip(1u32..)
        .map(|(scene, number)| decode_scene(scene, number))
        .collect()
}

fn decode_scene(scene: ScenePayload, number: u32) -> Result<Scene> {
    let heading = scene.heading.trim();
    if heading.is_empty() {
        return Err(ConvertError::malformed(format!(
            "scene {} has an empty heading",
            number
        )));
    }
    if scene.shots.is_empty() {
        return Err(ConvertError::malformed(format!("scene {} has no shots", number)));
    }

    let shots = scene
        .shots
        .into_iter()
        .zip(1u32..)
        .map(|(shot, shot_number)| decode_shot(shot, number, shot_number))
        .collect::<Result<Vec<_>>>()?;

    Ok(Scene {
        number,
        heading: heading.to_string(),
        summary: non_empty(scene.summary),
        shots,
    })
}

fn decode_shot(shot: ShotPayload, scene_number: u32, shot_number: u32) -> Result<Shot> {
    let description = shot.description.trim();
    if description.is_empty() {
        return Err(ConvertError::malformed(format!(
            "shot {}.{} has an empty description",
            scene_number, shot_number
        )));
    }

    Ok(Shot {
        scene_number,
        shot_number,
        shot_type: shot.shot_type,
        camera_angle: non_empty(shot.camera_angle),
        camera_movement: non_empty(shot.camera_movement),
        description: description.to_string(),
        dialogue: non_empty(shot.dialogue),
        // Drop nonsense estimates rather than fail the whole breakdown
        duration_seconds: shot
            .duration_seconds
            .filter(|d| d.is_finite() && *d > 0.0),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Some compatible servers wrap JSON in a Markdown fence even in JSON mode
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
