//! Skill spotting: auxiliary keyword matching of a resume against the JD.
//!
//! Purely informational: it never feeds into the similarity score or the ordering.
//! Skills are matched as whole token sequences on normalized text, so the skill
//! names go through the same normalizer as the documents ("Node.js" → "nodej").

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::screening::normalizer::normalize;

/// Technical skills recognised in JDs and resumes.
const SKILL_NAMES: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "Rust",
    "Golang",
    "Kotlin",
    "Swift",
    "Scala",
    "Ruby",
    "PHP",
    "SQL",
    "NoSQL",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "Django",
    "Flask",
    "FastAPI",
    "Spring Boot",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "HTML",
    "CSS",
    "AWS",
    "Azure",
    "Google Cloud",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Linux",
    "Git",
    "CI/CD",
    "Kafka",
    "Spark",
    "Hadoop",
    "Airflow",
    "Pandas",
    "NumPy",
    "TensorFlow",
    "PyTorch",
    "Scikit-learn",
    "Machine Learning",
    "Deep Learning",
    "Data Analysis",
    "Natural Language Processing",
    "Computer Vision",
    "Tableau",
    "Power BI",
    "Excel",
    "Agile",
    "Scrum",
    "REST API",
    "GraphQL",
    "Microservices",
];

#[derive(Debug, Clone)]
struct Skill {
    name: &'static str,
    tokens: Vec<String>,
}

static SKILLS: LazyLock<Vec<Skill>> = LazyLock::new(|| {
    SKILL_NAMES
        .iter()
        .filter_map(|&name| {
            let tokens: Vec<String> = normalize(name).split(' ').map(String::from).collect();
            // a name that normalizes away can never match anything
            (!tokens.iter().all(String::is_empty)).then_some(Skill { name, tokens })
        })
        .collect()
});

/// Skill overlap between a resume and the JD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillReport {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    /// matched / JD skills × 100; `None` when the JD names no known skill
    pub coverage_percent: Option<u32>,
}

/// Skills found in already-normalized text, in skill-list order.
pub fn spot_skills(normalized: &str) -> Vec<&'static str> {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    SKILLS
        .iter()
        .filter(|skill| contains_sequence(&tokens, &skill.tokens))
        .map(|skill| skill.name)
        .collect()
}

fn contains_sequence(haystack: &[&str], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|w| w.iter().zip(needle).all(|(a, b)| *a == b.as_str()))
}

/// Compares the skills of a resume against those of the JD.
pub fn compare_skills(jd_skills: &[&'static str], resume_skills: &[&'static str]) -> SkillReport {
    let (matched, missing): (Vec<&str>, Vec<&str>) = jd_skills
        .iter()
        .copied()
        .partition(|s| resume_skills.contains(s));
    let extra = resume_skills
        .iter()
        .filter(|s| !jd_skills.contains(*s))
        .map(|s| s.to_string())
        .collect();

    let coverage_percent = (!jd_skills.is_empty())
        .then(|| ((matched.len() as f64 / jd_skills.len() as f64) * 100.0).round() as u32);

    SkillReport {
        matched: matched.into_iter().map(String::from).collect(),
        missing: missing.into_iter().map(String::from).collect(),
        extra,
        coverage_percent,
    }
}

/// Convenience wrapper over raw text.
#[cfg_attr(not(test), allow(dead_code))]
pub fn skill_report(jd_text: &str, resume_text: &str) -> SkillReport {
    let jd_skills = spot_skills(&normalize(jd_text));
    let resume_skills = spot_skills(&normalize(resume_text));
    compare_skills(&jd_skills, &resume_skills)
}
