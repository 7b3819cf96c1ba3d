//! Live adapter for the `DraftSource` port using the Gemini API.

use std::env;
use std::error::Error;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::draft::{DraftFuture, DraftRequest, DraftSource};
use crate::quest::{Difficulty, EnergyLevel, OutputType, QuestDraft, TaskDraft, UserInputs};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Per-domain prompt guidance that steers the model toward measurable,
/// domain-pure quests.
struct DomainGuidance {
    focus: &'static str,
    example: &'static str,
    avoid: &'static str,
}

fn domain_guidance(domain: &str) -> DomainGuidance {
    match domain {
        "Fitness" => DomainGuidance {
            focus: "specific exercises, reps, sets, duration, measurable physical metrics",
            example: "Complete 3 sets of 15 push-ups, 20 squats, and a 10-minute plank hold",
            avoid: "generic \"workout\" or \"exercise\" - be specific about movements and targets",
        },
        "Career" => DomainGuidance {
            focus: "deliverables, skills to learn, projects to complete, networking goals",
            example: "Build and deploy a REST API with authentication and document the endpoints",
            avoid: "vague \"improve skills\" - specify exact skills and how to demonstrate them",
        },
        "Learning" => DomainGuidance {
            focus: "chapters read, concepts mastered, practice problems solved, projects built",
            example: "Complete Python chapters 5-7 and solve 10 practice problems",
            avoid: "generic \"study\" - specify what to learn and how to verify understanding",
        },
        "Finance" => DomainGuidance {
            focus: "amounts saved, budget categories reviewed, transactions tracked",
            example: "Review last month's expenses and create a budget for 3 categories",
            avoid: "vague \"manage money\" - specify exact financial actions and numbers",
        },
        "Health" => DomainGuidance {
            focus: "meals logged, water intake, sleep hours, meditation minutes",
            example: "Log 3 meals, drink 8 glasses of water, sleep 7-8 hours",
            avoid: "vague \"be healthy\" - specify trackable health behaviors",
        },
        "Creativity" => DomainGuidance {
            focus: "pieces created, techniques practiced, projects completed",
            example: "Sketch 5 character designs and complete 1 full illustration",
            avoid: "generic \"be creative\" - specify what to create and how much",
        },
        "Productivity" => DomainGuidance {
            focus: "tasks completed, time blocks scheduled, systems implemented",
            example: "Complete 3 priority tasks using 4 focused work sessions",
            avoid: "vague \"be productive\" - specify tasks and time management techniques",
        },
        "Relationships" => DomainGuidance {
            focus: "quality time scheduled, conversations had, gestures made",
            example: "Call 2 friends for 15 minutes each and plan one shared activity",
            avoid: "generic \"connect\" - specify who, how, and for how long",
        },
        "Mindfulness" => DomainGuidance {
            focus: "meditation minutes, breathing exercises, awareness practices",
            example: "10-minute guided meditation and 5 mindful breaths every 2 hours",
            avoid: "vague \"be mindful\" - specify practices, duration, and frequency",
        },
        _ => DomainGuidance {
            focus: "journaling entries, self-reflection prompts, habits tracked",
            example: "Journal 3 gratitude items and read 30 pages of a growth book",
            avoid: "generic \"self-improvement\" - specify activities and measurements",
        },
    }
}

/// Live draft source that calls the Gemini `generateContent` API.
pub struct GeminiDraftSource {
    client: Client,
    model: String,
}

impl GeminiDraftSource {
    /// Creates a new live draft source for the given model.
    #[must_use]
    pub fn new(model: String) -> Self {
        Self { client: Client::new(), model }
    }
}

/// Request body sent to the Gemini API.
#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

/// A content block in the Gemini request.
#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

/// A text part in the Gemini request.
#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Top-level response from the Gemini API.
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// One candidate completion.
#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

/// Content of a candidate.
#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

/// A text part of a candidate.
#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

/// The JSON shape the model is asked to return.
#[derive(Deserialize)]
struct DraftWire {
    title: String,
    description: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    tasks: Vec<TaskWire>,
    #[serde(default, rename = "successCriteria")]
    success_criteria: Vec<String>,
    #[serde(default, rename = "outputType")]
    output_type: Option<OutputType>,
    #[serde(default)]
    deliverable: Option<String>,
    #[serde(default, rename = "energyRequired")]
    energy_required: Option<EnergyLevel>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// One task in the model's JSON.
#[derive(Deserialize)]
struct TaskWire {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "estimatedTime")]
    estimated_time: String,
}

fn build_prompt(request: &DraftRequest) -> String {
    let guidance = domain_guidance(&request.domain);
    format!(
        r#"You are AuraQuest, an assistant that generates hyper-specific, actionable, and measurable productivity quests.

USER INPUT:
- Domain: {domain}
- Specific Goal: "{goal}"
- Difficulty: {difficulty:?}
- Time Available: {minutes} minutes
- Constraints: {constraints}
- Preferences: {preferences}
- Quest Type: {quest_type:?}
- User Level: {level}

DOMAIN GUIDANCE FOR {domain}:
- Focus on: {focus}
- Example: {example}
- AVOID: {avoid}

CRITICAL REQUIREMENTS:
1. Title must be SPECIFIC to the goal
2. Each task must have MEASURABLE outcomes
3. Tasks must be ACTIONABLE (verbs: complete, build, write, track, measure)
4. Include SUCCESS CRITERIA that can be objectively verified
5. Total task time should sum to approximately {minutes} minutes
6. Respect user constraints and preferences
7. NO vague phrases like "work on your goal" or "practice"

Return ONLY valid JSON (no markdown, no code blocks):
{{
  "title": "Specific quest title",
  "description": "Why this quest helps achieve the goal",
  "category": "{domain}",
  "difficulty": "{difficulty:?}",
  "tasks": [
    {{
      "title": "Specific task 1",
      "description": "Measurable action with clear outcome",
      "estimatedTime": "10 minutes"
    }}
  ],
  "successCriteria": ["Criterion 1 - measurable", "Criterion 2 - measurable"],
  "outputType": "CHECKLIST",
  "deliverable": "What the user will have produced",
  "energyRequired": "Medium",
  "reasoning": "Why this quest was generated"
}}"#,
        domain = request.domain,
        goal = request.specific_goal,
        difficulty = request.difficulty,
        minutes = request.time_available,
        constraints = if request.constraints.is_empty() { "None" } else { &request.constraints },
        preferences = if request.preferences.is_empty() { "None" } else { &request.preferences },
        quest_type = request.quest_type,
        level = request.user_level,
        focus = guidance.focus,
        example = guidance.example,
        avoid = guidance.avoid,
    )
}

/// Strips markdown code fences the model sometimes wraps JSON in.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

/// Parses a leading number out of a human time estimate ("10 minutes").
fn parse_minutes(text: &str) -> f64 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

fn parse_draft_response(
    text: &str,
    request: &DraftRequest,
) -> Result<QuestDraft, Box<dyn Error + Send + Sync>> {
    let wire: DraftWire = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| format!("draft response is not valid JSON: {e}"))?;

    Ok(QuestDraft {
        title: wire.title,
        description: wire.description,
        category: wire.category.unwrap_or_else(|| request.domain.clone()),
        domain: Some(request.domain.clone()),
        difficulty: wire.difficulty.unwrap_or(request.difficulty),
        tasks: wire
            .tasks
            .into_iter()
            .map(|t| TaskDraft {
                title: t.title,
                description: t.description,
                estimated_minutes: parse_minutes(&t.estimated_time),
            })
            .collect(),
        success_criteria: wire.success_criteria,
        output_type: wire.output_type,
        deliverable: wire.deliverable,
        energy_required: wire.energy_required.unwrap_or(EnergyLevel::Medium),
        estimated_minutes: None,
        reasoning: wire.reasoning,
        user_inputs: Some(UserInputs {
            specific_goal: request.specific_goal.clone(),
            time_available: Some(request.time_available),
            constraints: request.constraints.clone(),
            preferences: request.preferences.clone(),
        }),
    })
}

impl DraftSource for GeminiDraftSource {
    fn draft(&self, request: &DraftRequest) -> DraftFuture<'_> {
        let request = request.clone();
        let model = self.model.clone();

        Box::pin(async move {
            let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
                Box::<dyn Error + Send + Sync>::from(
                    "GEMINI_API_KEY environment variable not set",
                )
            })?;

            let prompt = build_prompt(&request);
            let body = GeminiRequest {
                contents: vec![GeminiContent { parts: vec![GeminiPart { text: &prompt }] }],
            };
            let url = format!("{GEMINI_API_BASE}/{model}:generateContent?key={api_key}");

            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> Box<dyn Error + Send + Sync> {
                    format!("Gemini API request failed: {e}").into()
                })?;

            let status = response.status();
            let response_text =
                response.text().await.map_err(|e| -> Box<dyn Error + Send + Sync> {
                    format!("Failed to read Gemini API response: {e}").into()
                })?;

            if !status.is_success() {
                return Err(
                    format!("Gemini API error ({}): {response_text}", status.as_u16()).into()
                );
            }

            let api_response: GeminiResponse = serde_json::from_str(&response_text)
                .map_err(|e| -> Box<dyn Error + Send + Sync> {
                    format!("Failed to parse Gemini API response: {e}").into()
                })?;

            let text: String = api_response
                .candidates
                .into_iter()
                .next()
                .map(|c| {
                    c.content
                        .parts
                        .into_iter()
                        .map(|p| p.text)
                        .collect::<String>()
                })
                .ok_or("Gemini API returned no candidates")?;

            parse_draft_response(&text, &request)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::QuestType;

    fn request() -> DraftRequest {
        DraftRequest {
            domain: "Fitness".into(),
            specific_goal: "run a 5k".into(),
            difficulty: Difficulty::Medium,
            time_available: 30.0,
            constraints: "no gym".into(),
            preferences: String::new(),
            quest_type: QuestType::Daily,
            user_level: 2,
        }
    }

    const RESPONSE: &str = r#"{
        "title": "5k Prep: Interval Session",
        "description": "Build the aerobic base for your 5k",
        "category": "Fitness",
        "difficulty": "Medium",
        "tasks": [
            {"title": "Warm up", "description": "Dynamic stretches", "estimatedTime": "5 minutes"},
            {"title": "Run intervals", "description": "6x 400m", "estimatedTime": "20 minutes"}
        ],
        "successCriteria": ["All intervals completed"],
        "outputType": "EXERCISE_SET",
        "deliverable": "Logged interval times",
        "energyRequired": "High",
        "reasoning": "Intervals build speed toward the 5k goal"
    }"#;

    #[test]
    fn parses_a_well_formed_response() {
        let draft = parse_draft_response(RESPONSE, &request()).unwrap();
        assert_eq!(draft.title, "5k Prep: Interval Session");
        assert_eq!(draft.domain.as_deref(), Some("Fitness"));
        assert_eq!(draft.tasks.len(), 2);
        assert!((draft.tasks[1].estimated_minutes - 20.0).abs() < f64::EPSILON);
        assert_eq!(draft.output_type, Some(OutputType::ExerciseSet));
        assert_eq!(draft.energy_required, EnergyLevel::High);
        let inputs = draft.user_inputs.expect("inputs recorded");
        assert_eq!(inputs.specific_goal, "run a 5k");
        assert_eq!(inputs.time_available, Some(30.0));
    }

    #[test]
    fn strips_markdown_code_fences() {
        let fenced = format!("```json\n{RESPONSE}\n```");
        let draft = parse_draft_response(&fenced, &request()).unwrap();
        assert_eq!(draft.tasks.len(), 2);

        let bare_fence = format!("```\n{RESPONSE}\n```");
        assert!(parse_draft_response(&bare_fence, &request()).is_ok());
    }

    #[test]
    fn rejects_non_json_content() {
        let err = parse_draft_response("Sure! Here is your quest:", &request()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn missing_optional_fields_fall_back_to_the_request() {
        let minimal = r#"{
            "title": "T",
            "description": "D",
            "tasks": [{"title": "A", "estimatedTime": "15 min"}]
        }"#;
        let draft = parse_draft_response(minimal, &request()).unwrap();
        assert_eq!(draft.category, "Fitness");
        assert_eq!(draft.difficulty, Difficulty::Medium);
        assert_eq!(draft.energy_required, EnergyLevel::Medium);
        assert!(draft.output_type.is_none());
    }

    #[test]
    fn minute_parsing_handles_odd_estimates() {
        assert!((parse_minutes("10 minutes") - 10.0).abs() < f64::EPSILON);
        assert!((parse_minutes("7.5 min") - 7.5).abs() < f64::EPSILON);
        assert!((parse_minutes("about five") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn prompt_carries_domain_guidance_and_inputs() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("run a 5k"));
        assert!(prompt.contains("30 minutes"));
        assert!(prompt.contains("no gym"));
        assert!(prompt.contains("push-ups"));
        assert!(prompt.contains("Preferences: None"));
    }
}
