//! Output formats for shot lists.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::shot::{Scene, ShotList};

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
}

impl ShotList {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(self)
    }

    /// Render as a Markdown document with one table per scene
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# Shot List");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} scene(s), {} shot(s) · model `{}`",
            self.scene_count(),
            self.shot_count(),
            self.model
        );

        for scene in &self.scenes {
            let _ = writeln!(out);
            write_scene(&mut out, scene);
        }

        out
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        Ok(match format {
            OutputFormat::Json => self.to_json_pretty()?,
            OutputFormat::Yaml => self.to_yaml()?,
            OutputFormat::Markdown => self.to_markdown(),
        })
    }
}

fn write_scene(out: &mut String, scene: &Scene) {
    let _ = writeln!(out, "## Scene {}: {}", scene.number, scene.heading);
    if let Some(summary) = &scene.summary {
        let _ = writeln!(out);
        let _ = writeln!(out, "_{}_", summary.trim());
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "| Shot | Type | Angle | Movement | Description | Dialogue | Duration |"
    );
    let _ = writeln!(out, "|---|---|---|---|---|---|---|");

    for shot in &scene.shots {
        let duration = shot
            .duration_seconds
            .map(|d| format!("{}s", d))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            shot.label(),
            shot.shot_type.abbreviation(),
            cell(shot.camera_angle.as_deref().unwrap_or("")),
            cell(shot.camera_movement.as_deref().unwrap_or("")),
            cell(&shot.description),
            cell(shot.dialogue.as_deref().unwrap_or("")),
            duration,
        );
    }
}

/// Escape a value for use inside a table cell
fn cell(value: &str) -> String {
    value.trim().replace('|', "\\|").replace('\n', "<br>")
}
