//! The two fixed prompt templates. Free text is interpolated verbatim; no
//! escaping or length limiting is applied.

use crate::models::UserProfile;

/// Cover-letter template. The "Additional requirements" clause is appended
/// only when the caller supplied extra free text.
pub fn cover_letter_prompt(free_text: &str, profile: &UserProfile) -> String {
    let mut prompt = format!(
        "Generate a template for the Upwork job application cover letter, \
         considering my personal data,\n\
         Name: {}; Job Title: {}; Years of experience: {}; Technologies or skills: {};",
        profile.name, profile.job_title, profile.years_of_experience, profile.skills
    );

    if !free_text.is_empty() {
        prompt.push_str("\nAdditional requirements: ");
        prompt.push_str(free_text);
    }

    prompt
}

/// Question template: the question goes in verbatim, framed by job title and
/// skills so the answer is written in the applicant's voice.
pub fn question_prompt(question: &str, profile: &UserProfile) -> String {
    format!(
        "Answer next question - {}, imagine that this was asked of a person \
         with the following characteristics,\n\
         Job Title: {}; Technologies or skills: {};",
        question, profile.job_title, profile.skills
    )
}
