//! Coaching and chat responder. Builds a context block from the caller's
//! habits and statistics, classifies the message into an intent bucket,
//! and forwards a role-structured prompt to an OpenAI-compatible
//! chat-completions endpoint. Every failure path degrades to a fixed
//! fallback string; a chat request never fails because the model did.

use crate::config::openai::OpenAiConfig;
use crate::services::stats::HabitStats;
use serde::Deserialize;

const CHAT_FALLBACK: &str =
    "I'm having trouble reaching the AI service right now. Try again in a moment.";
const FEEDBACK_DONE_FALLBACK: &str = "Great job completing your habit today! Keep up the excellent work and stay consistent. You're building momentum!";
const FEEDBACK_MISSED_FALLBACK: &str = "Don't worry about missing today - it happens to everyone. The important thing is to get back on track tomorrow. You've got this!";

/// Coarse intent of an incoming chat message. Matching is plain substring
/// search over the lowercased message, first bucket wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    DashboardAnalysis,
    Vague,
    Specific,
}

const GREETING_KEYWORDS: &[&str] = &[
    "salut",
    "bonjour",
    "bonsoir",
    "hello",
    "coucou",
    "ça va",
    "comment allez-vous",
    "good morning",
    "good evening",
];

const DASHBOARD_KEYWORDS: &[&str] = &[
    "dashboard",
    "mes données",
    "mes stats",
    "mes performances",
    "mes habitudes",
    "mes résultats",
    "analyse",
    "statistiques",
    "my stats",
    "my data",
    "my results",
    "my performance",
];

const VAGUE_KEYWORDS: &[&str] = &[
    "conseil",
    "aide",
    "comment faire",
    "que faire",
    "motivation",
    "objectif",
    "améliorer",
    "mieux",
    "advice",
    "help me",
    "improve",
    "how do i",
];

pub fn classify_intent(message: &str) -> Intent {
    let lower = message.trim().to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if contains_any(GREETING_KEYWORDS) {
        Intent::Greeting
    } else if contains_any(DASHBOARD_KEYWORDS) {
        Intent::DashboardAnalysis
    } else if contains_any(VAGUE_KEYWORDS) {
        Intent::Vague
    } else {
        Intent::Specific
    }
}

/// Per-habit summary line fed into the prompt context.
pub struct HabitSummary {
    pub title: String,
    pub habit_type: String,
    pub frequency: String,
    pub stats: HabitStats,
}

/// Extra context when the chat is focused on one habit.
pub struct FocusedHabit {
    pub title: String,
    pub habit_type: String,
    pub frequency: String,
    /// Stats over the most recent tracking entries (up to 60).
    pub stats: HabitStats,
}

pub struct ChatContext {
    pub user_name: String,
    pub habits: Vec<HabitSummary>,
    pub focused: Option<FocusedHabit>,
    pub message: String,
    /// Local hour of day, for a morning/afternoon/evening hint.
    pub local_hour: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

struct Sampling {
    max_tokens: u32,
    temperature: f64,
    presence_penalty: f64,
    frequency_penalty: f64,
}

#[derive(Clone)]
pub struct ChatService {
    client: reqwest::Client,
    config: Option<OpenAiConfig>,
}

impl ChatService {
    /// Build from environment variables. Without an API key every call
    /// short-circuits to its fallback string.
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            config: OpenAiConfig::from_env(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Answer a free-text chat message. Never fails: model errors yield
    /// the fixed fallback reply.
    pub async fn chat_reply(&self, ctx: &ChatContext) -> String {
        let intent = classify_intent(&ctx.message);
        let system = build_system_prompt(intent);
        let user = build_user_prompt(ctx, intent);

        let sampling = Sampling {
            max_tokens: 200,
            temperature: 0.3,
            presence_penalty: 0.2,
            frequency_penalty: 0.1,
        };

        match self.complete(Some(&system), &user, &sampling).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Chat completion failed: {e}");
                CHAT_FALLBACK.to_string()
            }
        }
    }

    /// Coaching feedback right after a tracking event. Never fails: model
    /// errors yield a per-status fallback.
    pub async fn tracking_feedback(
        &self,
        habit_title: &str,
        habit_type: &str,
        stats: &HabitStats,
        recent_done: u64,
        recent_total: u64,
        status: &str,
    ) -> String {
        let prompt = build_feedback_prompt(
            habit_title,
            habit_type,
            stats,
            recent_done,
            recent_total,
            status,
        );

        let sampling = Sampling {
            max_tokens: 150,
            temperature: 0.7,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        };

        match self.complete(None, &prompt, &sampling).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Feedback completion failed: {e}");
                feedback_fallback(status).to_string()
            }
        }
    }

    async fn complete(
        &self,
        system: Option<&str>,
        user_prompt: &str,
        sampling: &Sampling,
    ) -> anyhow::Result<String> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Language model API key not configured"))?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": user_prompt }));

        let body = serde_json::json!({
            "model": config.model,
            "messages": messages,
            "max_tokens": sampling.max_tokens,
            "temperature": sampling.temperature,
            "presence_penalty": sampling.presence_penalty,
            "frequency_penalty": sampling.frequency_penalty,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", config.base_url))
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Completion API error ({status}): {body}");
        }

        let parsed: CompletionResponse = response.json().await?;
        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Completion API returned no choices"))?;

        Ok(content)
    }
}

pub fn feedback_fallback(status: &str) -> &'static str {
    if status == crate::services::stats::STATUS_DONE {
        FEEDBACK_DONE_FALLBACK
    } else {
        FEEDBACK_MISSED_FALLBACK
    }
}

fn time_of_day(hour: u32) -> &'static str {
    if hour < 12 {
        "morning"
    } else if hour < 18 {
        "afternoon"
    } else {
        "evening"
    }
}

fn build_system_prompt(intent: Intent) -> String {
    let mode = match intent {
        Intent::Greeting => {
            "GREETING MODE:\n\
             - Respond naturally and welcomingly\n\
             - Ask how you can help them with their habits\n\
             - Keep it brief and warm"
        }
        Intent::DashboardAnalysis => {
            "DASHBOARD ANALYSIS MODE:\n\
             - Give direct feedback based on their actual dashboard data\n\
             - Highlight specific numbers, trends and patterns\n\
             - Suggest concrete improvements grounded in their statistics"
        }
        Intent::Vague => {
            "VAGUE QUESTION MODE:\n\
             - Ask politely for more specific details\n\
             - Do NOT provide generic advice\n\
             - Only advise once they give specifics"
        }
        Intent::Specific => {
            "SPECIFIC QUESTION MODE:\n\
             - Answer ONLY the specific question asked\n\
             - Give concrete, actionable steps with numbers or times\n\
             - Reference their actual habit data, no motivational fluff"
        }
    };

    format!(
        "You are a conversational AI assistant specialized in habit coaching.\n\n{mode}\n\n\
         - CONCISE - maximum 120 words\n\
         - NATURAL and CONVERSATIONAL tone\n\
         - PERSONALIZED using their actual habit data"
    )
}

fn build_user_prompt(ctx: &ChatContext, intent: Intent) -> String {
    let mut lines = Vec::new();

    lines.push(format!("USER MESSAGE: \"{}\"", ctx.message.trim()));
    lines.push(format!("User: {}", ctx.user_name));
    lines.push(format!("Time of day: {}", time_of_day(ctx.local_hour)));
    lines.push(format!("Total habits: {}", ctx.habits.len()));

    if ctx.habits.is_empty() {
        lines.push("Habits: (no habits yet)".to_string());
    } else {
        lines.push("Habits:".to_string());
        for h in ctx.habits.iter().take(6) {
            lines.push(format!(
                "- {} [{}/{}] success {}% ({}/{})",
                h.title,
                h.habit_type,
                h.frequency,
                h.stats.success_rate,
                h.stats.done_count,
                h.stats.total_attempts
            ));
        }

        let best = ctx
            .habits
            .iter()
            .max_by(|a, b| a.stats.success_rate.total_cmp(&b.stats.success_rate));
        let worst = ctx
            .habits
            .iter()
            .min_by(|a, b| a.stats.success_rate.total_cmp(&b.stats.success_rate));
        if let Some(best) = best {
            lines.push(format!(
                "Best performer: {} ({}%)",
                best.title, best.stats.success_rate
            ));
        }
        if ctx.habits.len() > 1 {
            if let Some(worst) = worst {
                lines.push(format!(
                    "Needs improvement: {} ({}%)",
                    worst.title, worst.stats.success_rate
                ));
            }
        }
    }

    if let Some(focused) = &ctx.focused {
        lines.push(format!(
            "Focused habit: {} ({}, {})",
            focused.title, focused.habit_type, focused.frequency
        ));
        lines.push(format!(
            "Recent stats: attempts {}, done {}, missed {}, success {}%",
            focused.stats.total_attempts,
            focused.stats.done_count,
            focused.stats.missed_count,
            focused.stats.success_rate
        ));
    }

    let tag = match intent {
        Intent::Greeting => "GREETING DETECTED",
        Intent::DashboardAnalysis => "DASHBOARD ANALYSIS REQUESTED",
        Intent::Vague => "VAGUE QUESTION DETECTED",
        Intent::Specific => "SPECIFIC QUESTION",
    };
    lines.push(tag.to_string());

    lines.join("\n")
}

fn build_feedback_prompt(
    habit_title: &str,
    habit_type: &str,
    stats: &HabitStats,
    recent_done: u64,
    recent_total: u64,
    status: &str,
) -> String {
    let recent_rate = crate::services::stats::rate_percent(recent_done, recent_total);
    let session = if status == crate::services::stats::STATUS_DONE {
        "Completed"
    } else {
        "Missed"
    };

    let instructions = if status == crate::services::stats::STATUS_DONE {
        "1. Celebrate their success\n\
         2. Acknowledge their progress\n\
         3. Give one specific tip to maintain momentum\n\
         4. Keep it encouraging and under 3 sentences"
    } else {
        "1. Be supportive and non-judgmental\n\
         2. Help them understand this is normal\n\
         3. Give one practical tip to get back on track\n\
         4. Keep it encouraging and under 3 sentences"
    };

    format!(
        "You are a supportive AI coach helping someone with their habit: \"{habit_title}\" ({habit_type} habit).\n\n\
         Current Session: {session}\n\
         Overall Stats:\n\
         - Total attempts: {}\n\
         - Completed: {}\n\
         - Missed: {}\n\
         - Success rate: {}%\n\
         - Recent performance (7 days): {recent_rate}% ({recent_done}/{recent_total})\n\n\
         Please provide:\n{instructions}",
        stats.total_attempts, stats.done_count, stats.missed_count, stats.success_rate
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_keywords_french_and_english() {
        assert_eq!(classify_intent("Salut !"), Intent::Greeting);
        assert_eq!(classify_intent("bonjour, ça va ?"), Intent::Greeting);
        assert_eq!(classify_intent("Hello there"), Intent::Greeting);
    }

    #[test]
    fn dashboard_keywords() {
        assert_eq!(
            classify_intent("Peux-tu analyser mes stats ?"),
            Intent::DashboardAnalysis
        );
        assert_eq!(
            classify_intent("what do my results look like"),
            Intent::DashboardAnalysis
        );
    }

    #[test]
    fn vague_keywords() {
        assert_eq!(classify_intent("J'ai besoin d'un conseil"), Intent::Vague);
        assert_eq!(
            classify_intent("how do i stay consistent?"),
            Intent::Vague
        );
    }

    #[test]
    fn specific_is_the_default() {
        assert_eq!(
            classify_intent("Should I run before or after breakfast?"),
            Intent::Specific
        );
    }

    #[test]
    fn greeting_wins_over_later_buckets() {
        // Contains both a greeting and a dashboard keyword.
        assert_eq!(
            classify_intent("Bonjour, analyse mes stats"),
            Intent::Greeting
        );
    }

    #[test]
    fn time_of_day_buckets() {
        assert_eq!(time_of_day(0), "morning");
        assert_eq!(time_of_day(11), "morning");
        assert_eq!(time_of_day(12), "afternoon");
        assert_eq!(time_of_day(17), "afternoon");
        assert_eq!(time_of_day(18), "evening");
        assert_eq!(time_of_day(23), "evening");
    }

    #[test]
    fn user_prompt_includes_summary_and_tag() {
        let ctx = ChatContext {
            user_name: "Ada Lovelace".to_string(),
            habits: vec![HabitSummary {
                title: "Morning run".to_string(),
                habit_type: "build".to_string(),
                frequency: "daily".to_string(),
                stats: HabitStats {
                    total_attempts: 4,
                    done_count: 3,
                    missed_count: 1,
                    success_rate: 75.0,
                    current_streak: 2,
                    longest_streak: 2,
                },
            }],
            focused: None,
            message: "what should I change?".to_string(),
            local_hour: 9,
        };
        let prompt = build_user_prompt(&ctx, Intent::Specific);
        assert!(prompt.contains("Morning run [build/daily] success 75% (3/4)"));
        assert!(prompt.contains("Time of day: morning"));
        assert!(prompt.contains("SPECIFIC QUESTION"));
        // Single habit: no "needs improvement" line.
        assert!(!prompt.contains("Needs improvement"));
    }

    #[test]
    fn feedback_prompt_follows_status() {
        let stats = HabitStats {
            total_attempts: 10,
            done_count: 7,
            missed_count: 3,
            success_rate: 70.0,
            current_streak: 1,
            longest_streak: 4,
        };
        let done = build_feedback_prompt("Read", "build", &stats, 3, 5, "done");
        assert!(done.contains("Current Session: Completed"));
        assert!(done.contains("Celebrate"));
        let missed = build_feedback_prompt("Read", "build", &stats, 3, 5, "missed");
        assert!(missed.contains("Current Session: Missed"));
        assert!(missed.contains("non-judgmental"));
    }

    #[test]
    fn fallbacks_differ_by_status() {
        assert!(feedback_fallback("done").contains("Great job"));
        assert!(feedback_fallback("missed").contains("Don't worry"));
    }
}
