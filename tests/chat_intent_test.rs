use aihabits::services::chat::{classify_intent, feedback_fallback, Intent};

#[test]
fn greetings_in_both_languages() {
    for msg in ["Salut", "bonjour !", "Bonsoir", "Hello coach", "coucou"] {
        assert_eq!(classify_intent(msg), Intent::Greeting, "message: {msg}");
    }
}

#[test]
fn dashboard_requests() {
    for msg in [
        "Analyse mes performances s'il te plaît",
        "peux-tu regarder mes stats",
        "show me my results",
        "dashboard please",
    ] {
        assert_eq!(
            classify_intent(msg),
            Intent::DashboardAnalysis,
            "message: {msg}"
        );
    }
}

#[test]
fn vague_requests() {
    for msg in [
        "J'ai besoin d'aide",
        "un conseil ?",
        "I want to improve",
        "how do i start",
    ] {
        assert_eq!(classify_intent(msg), Intent::Vague, "message: {msg}");
    }
}

#[test]
fn everything_else_is_specific() {
    for msg in [
        "Should I meditate for 10 or 20 minutes?",
        "Is running at night bad for sleep?",
        "Why is my streak stuck at 3?",
    ] {
        assert_eq!(classify_intent(msg), Intent::Specific, "message: {msg}");
    }
}

#[test]
fn classification_is_case_insensitive() {
    assert_eq!(classify_intent("BONJOUR"), Intent::Greeting);
    assert_eq!(classify_intent("My Stats"), Intent::DashboardAnalysis);
}

#[test]
fn earlier_buckets_take_priority() {
    // greeting + vague keyword: greeting wins
    assert_eq!(classify_intent("Salut, un conseil ?"), Intent::Greeting);
    // dashboard + vague keyword: dashboard wins
    assert_eq!(
        classify_intent("analyse mes stats et donne un conseil"),
        Intent::DashboardAnalysis
    );
}

#[test]
fn feedback_fallbacks_are_status_specific() {
    let done = feedback_fallback("done");
    let missed = feedback_fallback("missed");
    assert_ne!(done, missed);
    assert!(done.contains("Great job"));
    assert!(missed.contains("back on track"));
}
