//! Prompt construction for scene and shot breakdowns.

use crate::adapters::ChatMessage;
use crate::domain::{ShotType, StoryText};

const SYSTEM_PROMPT: &str = "\
You are an experienced film director and first assistant director. \
Break the story you are given into scenes and shots for a shooting script.

Rules:
- Cover the whole story in narrative order. Do not skip, merge or reorder events.
- Start a new scene whenever the location or time changes.
- Give every distinct action or story beat at least one shot.
- Keep descriptions concrete and visual: what the camera sees.
- Put spoken lines in \"dialogue\" verbatim; use null when nobody speaks.

Answer with a single JSON object and nothing else, using this schema:
{
  \"scenes\": [
    {
      \"heading\": \"INT./EXT. LOCATION - TIME OF DAY\",
      \"summary\": \"one sentence\",
      \"shots\": [
        {
          \"shot_type\": \"<one of the allowed shot types>\",
          \"camera_angle\": \"eye level | high angle | low angle | dutch angle | overhead | ...\",
          \"camera_movement\": \"static | pan | tilt | dolly in | dolly out | tracking | handheld | crane | zoom | ...\",
          \"description\": \"what the shot shows\",
          \"dialogue\": \"spoken lines or null\",
          \"duration_seconds\": 4
        }
      ]
    }
  ]
}";

/// Build the chat messages for one conversion
pub fn build_messages(story: &StoryText, language: Option<&str>) -> Vec<ChatMessage> {
    let allowed: Vec<&str> = ShotType::ALL.iter().map(ShotType::as_str).collect();

    let mut system = format!(
        "{}\n\nAllowed shot types: {}.",
        SYSTEM_PROMPT,
        allowed.join(", ")
    );

    if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
        system.push_str(&format!(
            "\nWrite headings, summaries and descriptions in {}. Keep JSON keys and shot types in English.",
            language
        ));
    }

    vec![
        ChatMessage::system(system),
        ChatMessage::user(story.as_str()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Role;

    #[test]
    fn test_messages_carry_story_verbatim() {
        let story = StoryText::new("A man walks into a bar. He orders a drink.").unwrap();
        let messages = build_messages(&story, None);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, story.as_str());
    }

    #[test]
    fn test_system_prompt_lists_shot_types() {
        let story = StoryText::new("story").unwrap();
        let system = &build_messages(&story, None)[0].content;

        for shot_type in ShotType::ALL {
            assert!(system.contains(shot_type.as_str()));
        }
        assert!(system.contains("\"scenes\""));
        assert!(!system.contains("Write headings"));
    }

    #[test]
    fn test_language_directive() {
        let story = StoryText::new("story").unwrap();

        let system = &build_messages(&story, Some("Turkish"))[0].content;
        assert!(system.contains("descriptions in Turkish"));

        let blank = &build_messages(&story, Some("  "))[0].content;
        assert!(!blank.contains("Write headings"));
    }
}
