// All LLM prompt constants for quiz and career generation.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const QUIZ_TEMPERATURE: f32 = 0.7;
pub const QUIZ_MAX_TOKENS: u32 = 2000;
pub const CAREER_TEMPERATURE: f32 = 0.7;
pub const CAREER_MAX_TOKENS: u32 = 2500;

pub const QUIZ_SYSTEM: &str = "You are an educational assessment expert. \
    Generate quiz questions that help determine career aptitude for high school students.";

/// Quiz prompt template.
/// Replace: {question_count}, {interests}, {top_subjects}, {audience_instruction}, {json_instruction}
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"Generate a {question_count}-question multiple-choice quiz to assess a high school student's aptitude in {interests}.
The student's strongest subjects are: {top_subjects}.

Include questions that test:
- Logical reasoning and problem-solving
- Subject-specific knowledge related to their interests
- Critical thinking skills
- Basic concepts that relate to potential careers in their interest areas

Format the response as a JSON array with this structure:
[
  {
    "question": "Question text here",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correct_answer": "Option A"
  }
]

RULES:
1. `correct_answer` MUST be copied exactly from one of the `options`
2. Every question has exactly 4 options

{audience_instruction}
{json_instruction}"#;

pub const CAREER_SYSTEM: &str = "You are a career counselor expert. \
    Provide realistic, actionable career recommendations based on student data.";

/// Career prompt template.
/// Replace: {interests}, {average}, {top_subjects}, {score}, {total}, {percentage},
///          {audience_instruction}, {json_instruction}
pub const CAREER_PROMPT_TEMPLATE: &str = r#"Based on the following student profile, recommend 3-4 specific career paths:

Interests: {interests}
Academic Performance: Average {average}% across subjects
Top Subjects: {top_subjects}
Quiz Performance: {score}/{total} ({percentage}%)

For each career recommendation, provide:
1. Career title
2. Brief description (2-3 sentences)
3. Match percentage (realistic based on their profile)
4. 4-5 specific learning path steps
5. 3-4 key skills needed

Format as JSON array:
[
  {
    "title": "Career Title",
    "description": "Brief description of the career",
    "match_percentage": 85,
    "learning_path": [
      "Step 1: Specific action",
      "Step 2: Next action",
      "Step 3: Further development",
      "Step 4: Advanced preparation"
    ],
    "skills_needed": ["Skill 1", "Skill 2", "Skill 3", "Skill 4"]
  }
]

Base recommendations on actual performance and interests. Be realistic with match percentages.

{audience_instruction}
{json_instruction}"#;
