//! Scenes, shots and the shot list returned by a conversion.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Camera framing of a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ShotType {
    ExtremeWide,
    Wide,
    Full,
    Medium,
    MediumCloseUp,
    CloseUp,
    ExtremeCloseUp,
    Insert,
    OverTheShoulder,
    PointOfView,
    TwoShot,
    Establishing,
}

impl ShotType {
    /// All framings, in the order they are offered to the model
    pub const ALL: [ShotType; 12] = [
        ShotType::Establishing,
        ShotType::ExtremeWide,
        ShotType::Wide,
        ShotType::Full,
        ShotType::Medium,
        ShotType::MediumCloseUp,
        ShotType::CloseUp,
        ShotType::ExtremeCloseUp,
        ShotType::Insert,
        ShotType::OverTheShoulder,
        ShotType::PointOfView,
        ShotType::TwoShot,
    ];

    /// Canonical snake_case label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtremeWide => "extreme_wide",
            Self::Wide => "wide",
            Self::Full => "full",
            Self::Medium => "medium",
            Self::MediumCloseUp => "medium_close_up",
            Self::CloseUp => "close_up",
            Self::ExtremeCloseUp => "extreme_close_up",
            Self::Insert => "insert",
            Self::OverTheShoulder => "over_the_shoulder",
            Self::PointOfView => "point_of_view",
            Self::TwoShot => "two_shot",
            Self::Establishing => "establishing",
        }
    }

    /// Industry abbreviation used in shot-list tables
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::ExtremeWide => "EWS",
            Self::Wide => "WS",
            Self::Full => "FS",
            Self::Medium => "MS",
            Self::MediumCloseUp => "MCU",
            Self::CloseUp => "CU",
            Self::ExtremeCloseUp => "ECU",
            Self::Insert => "INS",
            Self::OverTheShoulder => "OTS",
            Self::PointOfView => "POV",
            Self::TwoShot => "2S",
            Self::Establishing => "EST",
        }
    }
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShotType {
    type Err = String;

    /// Accepts snake_case labels, spaced or hyphenated spellings, and the
    /// common abbreviations (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        let normalized = normalized.trim_end_matches("_shot");

        let shot_type = match normalized {
            "extreme_wide" | "extreme_long" | "ews" | "els" => Self::ExtremeWide,
            "wide" | "long" | "ws" | "ls" => Self::Wide,
            "full" | "fs" => Self::Full,
            "medium" | "mid" | "ms" => Self::Medium,
            "medium_close_up" | "medium_closeup" | "mcu" => Self::MediumCloseUp,
            "close_up" | "closeup" | "cu" => Self::CloseUp,
            "extreme_close_up" | "extreme_closeup" | "ecu" | "xcu" => Self::ExtremeCloseUp,
            "insert" | "ins" => Self::Insert,
            "over_the_shoulder" | "ots" => Self::OverTheShoulder,
            "point_of_view" | "pov" => Self::PointOfView,
            "two" | "two_shot" | "2s" => Self::TwoShot,
            "establishing" | "est" => Self::Establishing,
            _ => return Err(format!("unknown shot type '{}'", s)),
        };
        Ok(shot_type)
    }
}

impl TryFrom<String> for ShotType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single camera framing within a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Scene this shot belongs to (1-based, narrative order)
    pub scene_number: u32,

    /// Position within the scene (1-based)
    pub shot_number: u32,

    pub shot_type: ShotType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_angle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_movement: Option<String>,

    /// What the audience sees
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f32>,
}

impl Shot {
    /// Human-readable identifier, e.g. `2.3` for scene 2 shot 3
    pub fn label(&self) -> String {
        format!("{}.{}", self.scene_number, self.shot_number)
    }
}

/// A narrative unit composed of one or more shots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub number: u32,

    /// Slugline, e.g. "INT. BAR - NIGHT"
    pub heading: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    pub shots: Vec<Shot>,
}

impl Scene {
    /// Sum of the estimated shot durations, if every shot has one
    pub fn estimated_duration(&self) -> Option<f32> {
        self.shots.iter().map(|s| s.duration_seconds).sum()
    }
}

/// Token accounting reported by the completion service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Ordered breakdown of a story into scenes and shots.
///
/// Scene order and shot order follow the narrative. Built fresh for each
/// conversion; nothing in it is shared with other conversions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotList {
    pub id: Uuid,

    /// Model that produced the breakdown
    pub model: String,

    pub created_at: DateTime<Utc>,

    pub scenes: Vec<Scene>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl ShotList {
    pub fn new(model: impl Into<String>, scenes: Vec<Scene>) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            created_at: Utc::now(),
            scenes,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }

    /// All shots in narrative order
    pub fn shots(&self) -> impl Iterator<Item = &Shot> {
        self.scenes.iter().flat_map(|scene| scene.shots.iter())
    }

    pub fn shot_count(&self) -> usize {
        self.scenes.iter().map(|s| s.shots.len()).sum()
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn scene(&self, number: u32) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.number == number)
    }
}
