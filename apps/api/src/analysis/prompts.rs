/// Role statement for job-description analysis; combined with `JSON_ONLY_SYSTEM`.
pub const ANALYZE_SYSTEM: &str = "You are a helpful assistant that analyzes job descriptions \
    for candidates preparing an application.";

/// Analysis prompt template. Replace `{job_description}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and provide:
1. A brief summary of the role, its responsibilities and requirements (2-3 sentences)
2. The top 3 skills a candidate should highlight on their resume

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "Two or three sentences.",
  "suggestedSkills": ["first skill", "second skill", "third skill"]
}

Job Description:
{job_description}"#;

pub fn build_analyze_prompt(job_description: &str) -> String {
    ANALYZE_PROMPT_TEMPLATE.replace("{job_description}", job_description)
}
