//! Prompt templates for Recap.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub planner: PlannerPrompts,
    pub keypoints: KeypointPrompts,
    pub summary: SummaryPrompts,
    pub chat: ChatPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompt asking the planner model for chunk and segment sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerPrompts {
    pub user: String,
}

impl Default for PlannerPrompts {
    fn default() -> Self {
        Self {
            user: r#"You are an expert technician whose job is to find the best suited chunk_size and segment_size for splitting a YouTube transcript into text chunks and batching those chunks into segments.
You will be given the length of the YouTube transcript (in characters) and you have to find the best suited chunk_size for it.
After that, based on the chunk_size, find the best suited segment_size, where a segment is the concatenation of segment_size chunks sent in one asynchronous LLM call.
Keep in mind the model processing the segments has limited requests per minute and a large input window, so fewer, larger segments are preferred.
As a reference point: for a transcript of length 134190, chunk_size=1000 and segment_size=30.
Strictly return only the values, without any special character or highlight, in the format:
chunk_size: <value>
segment_size: <value>

Here is the length of the YouTube transcript: {{transcript_len}}"#
                .to_string(),
        }
    }
}

/// Prompts for per-segment extraction and consolidation of keypoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeypointPrompts {
    pub segment: String,
    pub consolidate: String,
}

impl Default for KeypointPrompts {
    fn default() -> Self {
        Self {
            segment: r#"From the following text, extract concise, distinct topics/key-points relevant to technology, study, or important concepts.
Provide them as a numbered list. Focus on core factual information and avoid repetition within this segment's points.
MUST return only the list of topic names (maximum 5), each with at most 2 subtopics, without any additional commentary or explanations.
The topics should follow a clear logical order (a sort of roadmap) and be highly concise.
CRUCIALLY, do not repeat any points already extracted from previous segments. DO NOT include any introductory or concluding sentences outside the list.

TEXT:
{{segment}}"#
                .to_string(),

            consolidate: r#"You are provided keypoints/topics extracted from a YouTube video transcript.
Your task is to de-duplicate and consolidate these keypoints into a concise numbered list.
Remove any duplicates and keep the keypoints concise.
Strictly make sure all topics/keypoints are covered and provide the final list (maximum 12 topics, each with at most 3 subtopics).
Number each topic as "1. Topic" and indent subtopics with "-".

Here are the keypoints:
{{keypoints}}"#
                .to_string(),
        }
    }
}

/// Prompts for the knowledge summary and the final writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub knowledge: String,
    pub writer: String,
    /// Inserted into the writer prompt when filler content is allowed.
    pub filler: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            knowledge: r#"You are an expert librarian who knows everything.
Your task is to explain each of the following topics so that they are easier to understand.
Strictly do not include any introductory or concluding sentences outside the list.
Strictly cover all the keypoints/topics and do not add information outside of the topics/keypoints.

Here are the topics/keypoints:
{{topics}}"#
                .to_string(),

            writer: r#"You are provided with two summaries of a YouTube video. Your task is to stitch the summaries and keypoints/topics together and explain those topics/keypoints with the help of the summaries.
Keep the length of the summary {{length}}. Cover all the keypoints/topics in the summary.
Importantly, do not repeat any information from the summaries or keypoints/topics and STRICTLY cover all the topics and subtopics.
{{filler}}
Follow this format while prioritizing readability:
- Keypoint/Topic (use numbering for each keypoint)
- Information/Summary (break it into multiple lines for better readability)
- URL (strictly provide only the URL of the source of information)
Strictly break only the Information/Summary part into multiple lines.
At the end, provide a concise summary of the whole video in 2-3 lines.

Here are the summaries:
Summary 1: {{knowledge}}
Summary 2:
{{findings}}
Keypoints/Topics:
{{topics}}"#
                .to_string(),

            filler: "If you do not have enough information to cover all the topics & subtopics, you may include information from your own knowledge."
                .to_string(),
        }
    }
}

/// Prompts for the study chatbot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatPrompts {
    pub system: String,
    pub user: String,
}

impl Default for ChatPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful Teacher.
Your task is to answer the user's question.
Provide a concise and accurate response related to studies and knowledge.
Strictly stick to studies and knowledge that are helpful to any student."#
                .to_string(),
            user: "Here is the input: {{input}}".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let planner_path = custom_path.join("planner.toml");
            if planner_path.exists() {
                let content = std::fs::read_to_string(&planner_path)?;
                prompts.planner = toml::from_str(&content)?;
            }

            let keypoints_path = custom_path.join("keypoints.toml");
            if keypoints_path.exists() {
                let content = std::fs::read_to_string(&keypoints_path)?;
                prompts.keypoints = toml::from_str(&content)?;
            }

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let chat_path = custom_path.join("chat.toml");
            if chat_path.exists() {
                let content = std::fs::read_to_string(&chat_path)?;
                prompts.chat = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass: placeholders inside substituted values
    /// are left as they are. Unknown placeholders are kept verbatim.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        placeholder_pattern()
            .replace_all(template, |caps: &regex::Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Render a template from `(name, value)` pairs.
    pub fn fill(&self, template: &str, pairs: &[(&str, &str)]) -> String {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.render_with_custom(template, &vars)
    }
}

fn placeholder_pattern() -> &'static regex::Regex {
    static PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.planner.user.contains("{{transcript_len}}"));
        assert!(prompts.keypoints.segment.contains("{{segment}}"));
        assert!(prompts.summary.writer.contains("{{findings}}"));
        assert!(!prompts.chat.system.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_inserted_values() {
        let template = "Keypoints: {{keypoints}}\nTopics: {{topics}}";
        let mut vars = HashMap::new();
        vars.insert("keypoints".to_string(), "model wrote {{topics}}".to_string());
        vars.insert("topics".to_string(), "1. Graphs".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Keypoints: model wrote {{topics}}\nTopics: 1. Graphs");
        assert_eq!(Prompts::render("{{missing}} stays", &vars), "{{missing}} stays");
    }

    #[test]
    fn test_fill_prefers_provided_values() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("audience".to_string(), "students".to_string());
        prompts
            .variables
            .insert("length".to_string(), "long".to_string());

        let out = prompts.fill("{{length}} summary for {{audience}}", &[("length", "short")]);
        assert_eq!(out, "short summary for students");
    }

    #[test]
    fn test_load_custom_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("chat.toml"),
            "system = \"You are a physics tutor.\"\nuser = \"Q: {{input}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.chat.system, "You are a physics tutor.");
        assert_eq!(prompts.chat.user, "Q: {{input}}");
        assert!(prompts.planner.user.contains("134190"));
    }
}
