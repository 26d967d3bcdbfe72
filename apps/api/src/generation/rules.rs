//! Rule table: deterministic quiz and career content for when no live model
//! call is wanted.
//!
//! Each rule is a (trigger, fixed payload) pair evaluated in order. Triggers
//! are case-insensitive substring tests against the student's interests, and
//! for some rules also against their top subjects. Rules share no state, so
//! each can be tested in isolation.

use tracing::debug;

use crate::generation::{MAX_RECOMMENDATIONS, QUESTION_COUNT, TOP_SUBJECT_COUNT};
use crate::models::career::CareerRecommendation;
use crate::models::profile::{average_mark, top_subjects, Marks};
use crate::models::question::Question;
use crate::quiz::quiz_percentage;

/// Ceiling for any rule-derived match percentage.
pub const MAX_RULE_MATCH: f64 = 95.0;

// ────────────────────────────────────────────────────────────────────────────
// Triggers
// ────────────────────────────────────────────────────────────────────────────

/// What a trigger's keywords are tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Interests,
    InterestsOrTopSubjects,
}

#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    Always,
    Keywords {
        keywords: &'static [&'static str],
        scope: Scope,
    },
}

/// Lower-cased inputs a trigger is evaluated against.
struct Signals {
    interests: Vec<String>,
    top_subjects: Vec<String>,
}

impl Signals {
    fn new(interests: &[String], marks: &Marks) -> Self {
        Self {
            interests: interests.iter().map(|i| i.to_lowercase()).collect(),
            top_subjects: top_subjects(marks, TOP_SUBJECT_COUNT)
                .into_iter()
                .map(|(s, _)| s.to_lowercase())
                .collect(),
        }
    }

    fn matches(&self, trigger: &Trigger) -> bool {
        match trigger {
            Trigger::Always => true,
            Trigger::Keywords { keywords, scope } => {
                let hit = |tags: &[String]| {
                    tags.iter()
                        .any(|tag| keywords.iter().any(|kw| tag.contains(*kw)))
                };
                match scope {
                    Scope::Interests => hit(&self.interests),
                    Scope::InterestsOrTopSubjects => {
                        hit(&self.interests) || hit(&self.top_subjects)
                    }
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Question rules
// ────────────────────────────────────────────────────────────────────────────

pub struct CannedQuestion {
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_answer: &'static str,
}

impl CannedQuestion {
    fn to_question(&self) -> Question {
        Question {
            question: self.question.to_string(),
            options: self.options.iter().map(|o| o.to_string()).collect(),
            correct_answer: self.correct_answer.to_string(),
        }
    }
}

pub struct QuestionRule {
    pub topic: &'static str,
    pub trigger: Trigger,
    pub payload: CannedQuestion,
}

pub const QUESTION_RULES: &[QuestionRule] = &[
    QuestionRule {
        topic: "science_tech",
        trigger: Trigger::Keywords {
            keywords: &[
                "computer",
                "science",
                "engineering",
                "physics",
                "technology",
                "chemistry",
                "biology",
            ],
            scope: Scope::Interests,
        },
        payload: CannedQuestion {
            question: "A program starts a counter at 0 and runs a loop 5 times, adding 3 to the counter each time. What is the final value of the counter?",
            options: &["8", "15", "12", "5"],
            correct_answer: "15",
        },
    },
    QuestionRule {
        topic: "math_logic",
        trigger: Trigger::Keywords {
            keywords: &["math", "logic", "economics", "statistics"],
            scope: Scope::InterestsOrTopSubjects,
        },
        payload: CannedQuestion {
            question: "What number comes next in the sequence 2, 6, 12, 20, 30, ...?",
            options: &["40", "42", "36", "44"],
            correct_answer: "42",
        },
    },
    QuestionRule {
        topic: "communication",
        trigger: Trigger::Keywords {
            keywords: &[
                "english",
                "literature",
                "history",
                "psychology",
                "art",
                "music",
                "writing",
                "business",
            ],
            scope: Scope::Interests,
        },
        payload: CannedQuestion {
            question: "What is the most effective first step when explaining a complex idea to a new audience?",
            options: &[
                "Use as much technical vocabulary as possible",
                "Find out what the audience already knows",
                "Skip the background and start with the details",
                "Read your notes word for word",
            ],
            correct_answer: "Find out what the audience already knows",
        },
    },
    QuestionRule {
        topic: "problem_solving",
        trigger: Trigger::Always,
        payload: CannedQuestion {
            question: "A team has 3 days to finish 12 equal tasks. After the first day they have finished 3. How many tasks per day must they complete to finish on time?",
            options: &["3", "4", "4.5", "6"],
            correct_answer: "4.5",
        },
    },
    QuestionRule {
        topic: "critical_thinking",
        trigger: Trigger::Always,
        payload: CannedQuestion {
            question: "All roses are flowers. Some flowers fade quickly. Which statement must be true?",
            options: &[
                "All roses fade quickly",
                "Some roses fade quickly",
                "No roses fade quickly",
                "None of these must be true",
            ],
            correct_answer: "None of these must be true",
        },
    },
];

/// Canned quiz for the student's interests and strongest subjects.
/// Always contains the two unconditional questions; never more than `QUESTION_COUNT`.
pub fn rule_questions(interests: &[String], marks: &Marks) -> Vec<Question> {
    let signals = Signals::new(interests, marks);
    QUESTION_RULES
        .iter()
        .filter(|rule| signals.matches(&rule.trigger))
        .take(QUESTION_COUNT)
        .map(|rule| {
            debug!("Question rule fired: {}", rule.topic);
            rule.payload.to_question()
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Career rules
// ────────────────────────────────────────────────────────────────────────────

/// `min(95, base + quiz_pct * quiz_weight + average_mark * marks_weight)`.
#[derive(Debug, Clone, Copy)]
pub struct MatchFormula {
    pub base: f64,
    pub quiz_weight: f64,
    pub marks_weight: f64,
}

impl MatchFormula {
    pub fn apply(&self, quiz_pct: f64, average_mark: f64) -> u8 {
        let raw = self.base + quiz_pct * self.quiz_weight + average_mark * self.marks_weight;
        raw.round().clamp(0.0, MAX_RULE_MATCH) as u8
    }
}

pub struct CannedCareer {
    pub title: &'static str,
    pub description: &'static str,
    pub learning_path: &'static [&'static str],
    pub skills_needed: &'static [&'static str],
}

pub struct CareerRule {
    pub topic: &'static str,
    pub trigger: Trigger,
    pub formula: MatchFormula,
    pub payload: CannedCareer,
}

impl CareerRule {
    fn recommend(&self, quiz_pct: f64, average_mark: f64) -> CareerRecommendation {
        CareerRecommendation {
            title: self.payload.title.to_string(),
            description: self.payload.description.to_string(),
            match_percentage: self.formula.apply(quiz_pct, average_mark),
            learning_path: self
                .payload
                .learning_path
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skills_needed: self
                .payload
                .skills_needed
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

pub const CAREER_RULES: &[CareerRule] = &[
    CareerRule {
        topic: "technology_engineering",
        trigger: Trigger::Keywords {
            keywords: &["computer", "engineering", "technology", "physics"],
            scope: Scope::InterestsOrTopSubjects,
        },
        formula: MatchFormula {
            base: 60.0,
            quiz_weight: 0.20,
            marks_weight: 0.15,
        },
        payload: CannedCareer {
            title: "Software Engineer",
            description: "Design, build, and maintain the software behind apps, websites, and devices. Software engineers break large problems into small, testable pieces and work in teams to ship reliable products.",
            learning_path: &[
                "Step 1: Learn a first programming language such as Python",
                "Step 2: Build small projects and publish them online",
                "Step 3: Study data structures and algorithms",
                "Step 4: Pursue a degree or bootcamp in computer science",
                "Step 5: Contribute to open source or complete an internship",
            ],
            skills_needed: &["Programming", "Problem Solving", "Logical Thinking", "Teamwork"],
        },
    },
    CareerRule {
        topic: "science_research",
        trigger: Trigger::Keywords {
            keywords: &["biology", "chemistry", "physics", "science"],
            scope: Scope::InterestsOrTopSubjects,
        },
        formula: MatchFormula {
            base: 55.0,
            quiz_weight: 0.20,
            marks_weight: 0.20,
        },
        payload: CannedCareer {
            title: "Research Scientist",
            description: "Investigate open questions through experiments and careful analysis. Research scientists publish findings that advance medicine, energy, and our understanding of the natural world.",
            learning_path: &[
                "Step 1: Take advanced science and mathematics courses",
                "Step 2: Join a science club or enter a science fair",
                "Step 3: Earn a bachelor's degree in a science discipline",
                "Step 4: Assist in a university research lab",
                "Step 5: Pursue graduate study in your field",
            ],
            skills_needed: &["Scientific Method", "Data Analysis", "Curiosity", "Technical Writing"],
        },
    },
    CareerRule {
        topic: "business_finance",
        trigger: Trigger::Keywords {
            keywords: &["business", "economics", "finance", "accounting"],
            scope: Scope::InterestsOrTopSubjects,
        },
        formula: MatchFormula {
            base: 55.0,
            quiz_weight: 0.15,
            marks_weight: 0.20,
        },
        payload: CannedCareer {
            title: "Financial Analyst",
            description: "Study markets, budgets, and company performance to guide investment decisions. Financial analysts turn numbers into recommendations that businesses rely on.",
            learning_path: &[
                "Step 1: Strengthen mathematics and economics fundamentals",
                "Step 2: Learn spreadsheet modelling",
                "Step 3: Earn a degree in finance, economics, or accounting",
                "Step 4: Complete a finance internship",
                "Step 5: Work toward a professional certification",
            ],
            skills_needed: &["Quantitative Analysis", "Spreadsheets", "Communication", "Attention to Detail"],
        },
    },
    CareerRule {
        topic: "creative_communication",
        trigger: Trigger::Keywords {
            keywords: &[
                "art",
                "music",
                "design",
                "english",
                "literature",
                "psychology",
                "history",
            ],
            scope: Scope::InterestsOrTopSubjects,
        },
        formula: MatchFormula {
            base: 58.0,
            quiz_weight: 0.15,
            marks_weight: 0.15,
        },
        payload: CannedCareer {
            title: "UX Designer",
            description: "Shape how people experience products by researching their needs and designing clear, usable interfaces. UX designers blend creativity with an understanding of human behaviour.",
            learning_path: &[
                "Step 1: Practice sketching and visual design",
                "Step 2: Learn the basics of user research",
                "Step 3: Get comfortable with a design tool such as Figma",
                "Step 4: Build a portfolio of redesign projects",
                "Step 5: Study design or human-computer interaction",
            ],
            skills_needed: &["Empathy", "Visual Design", "Communication", "Prototyping"],
        },
    },
];

/// Used when no career rule triggers.
pub const DEFAULT_CAREER: CareerRule = CareerRule {
    topic: "default",
    trigger: Trigger::Always,
    formula: MatchFormula {
        base: 50.0,
        quiz_weight: 0.20,
        marks_weight: 0.15,
    },
    payload: CannedCareer {
        title: "Project Manager",
        description: "Coordinate people, schedules, and resources so projects finish on time. Project managers keep teams aligned and solve problems as they come up.",
        learning_path: &[
            "Step 1: Lead a school club or group project",
            "Step 2: Learn planning and scheduling tools",
            "Step 3: Earn a degree in business or management",
            "Step 4: Gain experience coordinating small projects",
            "Step 5: Pursue a project management certification",
        ],
        skills_needed: &["Organization", "Leadership", "Communication", "Time Management"],
    },
};

/// Canned career recommendations for the profile and quiz result.
pub fn rule_recommendations(
    interests: &[String],
    marks: &Marks,
    score: u32,
    total_questions: usize,
) -> Vec<CareerRecommendation> {
    let signals = Signals::new(interests, marks);
    let quiz_pct = quiz_percentage(score, total_questions);
    let average = average_mark(marks);

    let mut recommendations: Vec<CareerRecommendation> = CAREER_RULES
        .iter()
        .filter(|rule| signals.matches(&rule.trigger))
        .take(MAX_RECOMMENDATIONS)
        .map(|rule| {
            debug!("Career rule fired: {}", rule.topic);
            rule.recommend(quiz_pct, average)
        })
        .collect();

    if recommendations.is_empty() {
        debug!("No career rule fired, using {}", DEFAULT_CAREER.topic);
        recommendations.push(DEFAULT_CAREER.recommend(quiz_pct, average));
    }
    recommendations
}
