// Prompt text for the counsellor endpoints.

use unicompass_core::Profile;

use super::ChatContext;

/// System prompt shared by chat and analysis.
pub const COUNSELLOR_SYSTEM: &str = "You are an expert study-abroad counsellor. \
    You guide students from profile building to university applications. \
    Be specific, actionable and supportive. \
    Never invent admission statistics you were not given.";

/// Chat prompt template.
/// Replace: {stage}, {profile}, {shortlisted}, {locked}, {message}
pub const CHAT_PROMPT_TEMPLATE: &str = r#"You are helping a student with their study-abroad journey.

Current Stage: {stage}
{profile}
Shortlisted Universities: {shortlisted}
Locked Universities: {locked}

Your role:
- Guide the student through their study-abroad journey
- Explain why universities fit or are risky
- Help with shortlisting decisions
- Provide actionable advice

Student's message: {message}"#;

/// Profile analysis prompt template. Replace `{profile}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following student profile and provide:
1. Profile strengths
2. Profile gaps or weaknesses
3. Recommendations for improvement
4. Overall assessment

{profile}
Provide a clear, structured analysis that helps the student understand their position."#;

fn or_missing<T: ToString>(value: &Option<T>, missing: &str) -> String {
    match value {
        Some(v) => {
            let text = v.to_string();
            if text.trim().is_empty() {
                missing.to_string()
            } else {
                text
            }
        }
        None => missing.to_string(),
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

/// Renders the profile as the bullet list both prompts embed.
pub fn format_profile(profile: &Profile) -> String {
    let unset = "Not specified";
    let untaken = "Not taken";
    let currency = profile.currency.as_deref().unwrap_or("USD");

    format!(
        "User Profile:\n\
         - Current Degree: {}\n\
         - Current GPA: {}\n\
         - Field of Study: {}\n\
         - Desired Degree: {}\n\
         - Desired Field: {}\n\
         - Preferred Countries: {}\n\
         - Budget Range: {} - {} {currency}\n\
         - TOEFL Score: {}\n\
         - IELTS Score: {}\n\
         - GRE Score: {}\n\
         - GMAT Score: {}\n\
         - Work Experience: {} years\n\
         - Research Experience: {}\n\
         - Publications: {}\n",
        or_missing(&profile.current_degree, unset),
        or_missing(&profile.current_gpa, unset),
        or_missing(&profile.field_of_study, unset),
        or_missing(&profile.desired_degree, unset),
        or_missing(&profile.desired_field, unset),
        or_missing(&profile.preferred_countries, unset),
        profile.budget_min.unwrap_or(0.0),
        profile.budget_max.unwrap_or(0.0),
        or_missing(&profile.toefl_score, untaken),
        or_missing(&profile.ielts_score, untaken),
        or_missing(&profile.gre_score, untaken),
        or_missing(&profile.gmat_score, untaken),
        profile.work_experience_years.unwrap_or(0),
        if profile.research_experience.unwrap_or(false) {
            "Yes"
        } else {
            "No"
        },
        profile.publications.unwrap_or(0),
    )
}

pub fn chat_prompt(profile: &Profile, context: &ChatContext, message: &str) -> String {
    CHAT_PROMPT_TEMPLATE
        .replace("{stage}", context.stage.as_str())
        .replace("{profile}", &format_profile(profile))
        .replace("{shortlisted}", &join_or_none(&context.shortlisted))
        .replace("{locked}", &join_or_none(&context.locked))
        .replace("{message}", message)
}

pub fn analysis_prompt(profile: &Profile) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{profile}", &format_profile(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicompass_core::Stage;

    #[test]
    fn test_format_profile_fills_gaps() {
        let profile = Profile {
            current_gpa: Some(3.4),
            field_of_study: Some("  ".into()),
            research_experience: Some(true),
            ..Default::default()
        };
        let text = format_profile(&profile);
        assert!(text.contains("- Current GPA: 3.4\n"));
        assert!(text.contains("- Field of Study: Not specified\n"));
        assert!(text.contains("- TOEFL Score: Not taken\n"));
        assert!(text.contains("- Budget Range: 0 - 0 USD\n"));
        assert!(text.contains("- Research Experience: Yes\n"));
    }

    #[test]
    fn test_chat_prompt_carries_context() {
        let context = ChatContext {
            stage: Stage::Shortlisting,
            shortlisted: vec!["MIT (dream)".into(), "TU Munich (safe)".into()],
            locked: vec![],
        };
        let prompt = chat_prompt(&Profile::default(), &context, "Which one should I lock?");
        assert!(prompt.contains("Current Stage: shortlisting"));
        assert!(prompt.contains("Shortlisted Universities: MIT (dream), TU Munich (safe)"));
        assert!(prompt.contains("Locked Universities: None"));
        assert!(prompt.ends_with("Student's message: Which one should I lock?"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_analysis_prompt_embeds_profile() {
        let prompt = analysis_prompt(&Profile::default());
        assert!(prompt.contains("User Profile:"));
        assert!(!prompt.contains("{profile}"));
    }
}
