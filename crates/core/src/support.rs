//! Coping-strategy lookup
//!
//! Maps a free-text concern onto a fixed catalog of concern categories and
//! returns the matching pre-written suggestions. Matching is plain substring
//! containment against the lower-cased concern, so "stressed" matches the
//! `stress` category while "anxious" does not match `anxiety`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label reported in every [`SupportResponse`].
pub const SUPPORT_TYPE: &str = "mental_health_guidance";

/// Appended to every response, whatever the concern.
pub const REMINDER: &str = "These are general wellness suggestions. For persistent concerns, please consider speaking with a mental health professional.";

/// Crisis pointer appended to every response.
pub const CRISIS_NOTE: &str =
    "If you're having thoughts of self-harm, please reach out to a crisis helpline immediately.";

/// Emotional state assumed when the caller does not provide one.
pub const DEFAULT_EMOTIONAL_STATE: &str = "neutral";

/// How many suggestions each matching category contributes.
const SUGGESTIONS_PER_CATEGORY: usize = 2;

/// Suggestions used when no category keyword appears in the concern.
pub const GENERAL_STRATEGIES: [&str; 3] = [
    "Take a moment to breathe deeply and ground yourself",
    "Remember that it's okay to feel what you're feeling",
    "Consider talking to someone you trust about what you're experiencing",
];

/// The fixed set of concern categories, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConcernCategory {
    Anxiety,
    Stress,
    Depression,
    Overwhelm,
}

impl ConcernCategory {
    /// All categories in the order they are tested.
    pub const ALL: [ConcernCategory; 4] = [
        ConcernCategory::Anxiety,
        ConcernCategory::Stress,
        ConcernCategory::Depression,
        ConcernCategory::Overwhelm,
    ];

    /// The keyword searched for in the lower-cased concern.
    pub fn label(&self) -> &'static str {
        match self {
            ConcernCategory::Anxiety => "anxiety",
            ConcernCategory::Stress => "stress",
            ConcernCategory::Depression => "depression",
            ConcernCategory::Overwhelm => "overwhelm",
        }
    }

    /// The ordered catalog suggestions for this category.
    pub fn strategies(&self) -> &'static [&'static str] {
        match self {
            ConcernCategory::Anxiety => &[
                "Try the 4-7-8 breathing technique: breathe in for 4, hold for 7, exhale for 8",
                "Practice grounding with the 5-4-3-2-1 technique: 5 things you see, 4 you touch, 3 you hear, 2 you smell, 1 you taste",
                "Consider progressive muscle relaxation starting from your toes and working up",
                "Remember that anxiety is temporary and this feeling will pass",
            ],
            ConcernCategory::Stress => &[
                "Take a 5-minute break to do some deep breathing exercises",
                "Try breaking down overwhelming tasks into smaller, manageable steps",
                "Consider going for a short walk or doing light stretching",
                "Practice mindfulness by focusing on the present moment",
            ],
            ConcernCategory::Depression => &[
                "Remember that you're not alone and these feelings are valid",
                "Try to engage in one small activity you usually enjoy",
                "Consider reaching out to a trusted friend or family member",
                "Gentle movement like a short walk can sometimes help improve mood",
            ],
            ConcernCategory::Overwhelm => &[
                "List your priorities and focus on just one thing at a time",
                "Practice saying 'no' to additional commitments when possible",
                "Try the 'two-minute rule': if something takes less than 2 minutes, do it now",
                "Remember that it's okay to ask for help when you need it",
            ],
        }
    }
}

impl fmt::Display for ConcernCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The record handed back to the model after a support lookup.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SupportResponse {
    pub support_type: String,
    pub coping_strategies: Vec<String>,
    pub reminder: String,
    pub crisis_note: String,
}

/// Returns the categories whose keyword occurs in `user_concern`, in catalog order.
pub fn matching_categories(user_concern: &str) -> Vec<ConcernCategory> {
    let concern_lower = user_concern.to_lowercase();
    ConcernCategory::ALL
        .into_iter()
        .filter(|category| concern_lower.contains(category.label()))
        .collect()
}

/// Builds the support response for a stated concern.
///
/// Every matching category contributes its first two suggestions; when nothing
/// matches, the general suggestions are used instead. `emotional_state` is
/// accepted for the tool contract but does not influence the result.
pub fn provide_support(user_concern: &str, emotional_state: Option<&str>) -> SupportResponse {
    let emotional_state = emotional_state.unwrap_or(DEFAULT_EMOTIONAL_STATE);

    let categories = matching_categories(user_concern);
    let mut coping_strategies: Vec<String> = categories
        .iter()
        .flat_map(|category| {
            category
                .strategies()
                .iter()
                .take(SUGGESTIONS_PER_CATEGORY)
                .map(|s| s.to_string())
        })
        .collect();

    if coping_strategies.is_empty() {
        coping_strategies = GENERAL_STRATEGIES.iter().map(|s| s.to_string()).collect();
    }

    tracing::debug!(
        ?categories,
        emotional_state,
        suggestions = coping_strategies.len(),
        "Resolved coping strategies"
    );

    SupportResponse {
        support_type: SUPPORT_TYPE.to_string(),
        coping_strategies,
        reminder: REMINDER.to_string(),
        crisis_note: CRISIS_NOTE.to_string(),
    }
}
