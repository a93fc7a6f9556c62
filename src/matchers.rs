//! Compiled matchers derived from a [`Vocabulary`].
//!
//! All regexes are built once per vocabulary. Keyword tests are
//! case-insensitive substring checks against lower-cased text; skill and role
//! term tests are whole-word, case-insensitive regexes over escaped entries.

use std::sync::{Arc, OnceLock};

use regex::{NoExpand, Regex};

use crate::error::VocabularyError;
use crate::vocabulary::Vocabulary;

const PERCENT_MATCH_NOISE: &str = r"^\d+%\s*match$";
const MORE_EXPANDER_NOISE: &str = r"^\+\d+\s*more$";
const SINGLE_WORD_NOISE: &str = r"^[a-z\-]+$";
const PERCENT_MATCH_POSITION: &str = r"^\d+% match$";
const NAME_SHAPE: &str = r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+$";
const STRICT_NAME_SHAPE: &str = r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2}$";
const EXPERIENCE_LONG: &str = r"(?i)(\d+(?:\.\d+)?)\s*(?:years?|yrs?)\s*(?:experience|exp)?";
const EXPERIENCE_SHORT: &str = r"(?i)(\d+)\s*y\s+experience";

static BUILTIN: OnceLock<Arc<Matchers>> = OnceLock::new();

fn compile(table: &'static str, pattern: &str) -> Result<Regex, VocabularyError> {
    Regex::new(pattern).map_err(|e| VocabularyError::InvalidPattern {
        table,
        reason: format!("invalid regex '{pattern}': {e}"),
    })
}

fn alternation(entries: &[String]) -> String {
    entries
        .iter()
        .map(|e| regex::escape(e))
        .collect::<Vec<_>>()
        .join("|")
}

fn whole_word(table: &'static str, entry: &str) -> Result<Regex, VocabularyError> {
    compile(table, &format!(r"(?i)\b{}\b", regex::escape(entry)))
}

fn lowered(entries: &[String]) -> Vec<String> {
    entries.iter().map(|e| e.to_lowercase()).collect()
}

/// First letter upper-cased, the rest lower-cased.
fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

fn contains_any(text: &str, needles: &[String]) -> bool {
    let lower = text.to_lowercase();
    needles.iter().any(|n| lower.contains(n.as_str()))
}

/// Compiled form of a [`Vocabulary`], shared by the classifier and sanitizer.
#[derive(Debug)]
pub struct Matchers {
    version: u32,
    noise_shapes: Vec<Regex>,
    name_shape: Regex,
    strict_name_shape: Regex,
    experience_long: Regex,
    experience_short: Regex,
    location: Regex,
    percent_match_position: Regex,
    job_keywords: Vec<String>,
    cities: Vec<String>,
    education_keywords: Vec<String>,
    skills: Vec<(String, Regex)>,
    name_job_indicators: Vec<String>,
    swap_job_indicators: Vec<String>,
    role_terms: Vec<(String, Regex)>,
    residual_noise: Vec<String>,
    bare_skill_tokens: Vec<String>,
}

impl Matchers {
    /// Validates `vocabulary` and compiles every matcher it implies.
    pub fn compile(vocabulary: &Vocabulary) -> Result<Self, VocabularyError> {
        vocabulary.validate()?;

        let mut noise_shapes = vec![
            compile("noise_tags", PERCENT_MATCH_NOISE)?,
            compile("noise_tags", MORE_EXPANDER_NOISE)?,
            compile("noise_tags", SINGLE_WORD_NOISE)?,
        ];
        if !vocabulary.noise_tags.is_empty() {
            let tags = alternation(&lowered(&vocabulary.noise_tags));
            noise_shapes.push(compile("noise_tags", &format!("^(?:{tags})$"))?);
        }

        let location = compile(
            "cities",
            &format!(
                r"(?i)((?:{})(?:,\s*(?:California|CA))?)",
                alternation(&vocabulary.cities)
            ),
        )?;

        let skills = vocabulary
            .skills
            .iter()
            .map(|s| Ok((s.clone(), whole_word("skills", s)?)))
            .collect::<Result<Vec<_>, VocabularyError>>()?;

        let role_terms = vocabulary
            .role_terms
            .iter()
            .map(|t| Ok((capitalize(t), whole_word("role_terms", t)?)))
            .collect::<Result<Vec<_>, VocabularyError>>()?;

        Ok(Self {
            version: vocabulary.version,
            noise_shapes,
            name_shape: compile("name_shape", NAME_SHAPE)?,
            strict_name_shape: compile("name_shape", STRICT_NAME_SHAPE)?,
            experience_long: compile("experience", EXPERIENCE_LONG)?,
            experience_short: compile("experience", EXPERIENCE_SHORT)?,
            location,
            percent_match_position: compile("residual_noise", PERCENT_MATCH_POSITION)?,
            job_keywords: lowered(&vocabulary.job_keywords),
            cities: lowered(&vocabulary.cities),
            education_keywords: lowered(&vocabulary.education_keywords),
            skills,
            name_job_indicators: lowered(&vocabulary.name_job_indicators),
            swap_job_indicators: lowered(&vocabulary.swap_job_indicators),
            role_terms,
            residual_noise: vocabulary.residual_noise.clone(),
            bare_skill_tokens: lowered(&vocabulary.bare_skill_tokens),
        })
    }

    /// Matchers for the built-in vocabulary, compiled once per process.
    ///
    /// # Panics
    /// Never in practice: the built-in tables are fixed and covered by tests.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        Arc::clone(BUILTIN.get_or_init(|| {
            Arc::new(
                Self::compile(&Vocabulary::builtin()).expect("built-in vocabulary must compile"),
            )
        }))
    }

    /// Version of the vocabulary these matchers were compiled from.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// True when the whole (already lower-cased) block text is a UI noise shape.
    #[must_use]
    pub fn is_noise_text(&self, lower_text: &str) -> bool {
        self.noise_shapes.iter().any(|re| re.is_match(lower_text))
    }

    /// "Capitalized word, space, capitalized word[, more words]".
    #[must_use]
    pub fn has_name_shape(&self, text: &str) -> bool {
        self.name_shape.is_match(text)
    }

    /// Two or three capitalized words.
    #[must_use]
    pub fn has_strict_name_shape(&self, text: &str) -> bool {
        self.strict_name_shape.is_match(text)
    }

    /// True when `text` contains any job keyword.
    #[must_use]
    pub fn has_job_keyword(&self, text: &str) -> bool {
        contains_any(text, &self.job_keywords)
    }

    /// True when a stored name looks like a job title.
    #[must_use]
    pub fn has_name_job_indicator(&self, text: &str) -> bool {
        contains_any(text, &self.name_job_indicators)
    }

    /// True when a position must not be promoted to a name.
    #[must_use]
    pub fn has_swap_job_indicator(&self, text: &str) -> bool {
        contains_any(text, &self.swap_job_indicators)
    }

    /// True when `text` mentions a known city anywhere.
    #[must_use]
    pub fn mentions_city(&self, text: &str) -> bool {
        contains_any(text, &self.cities)
    }

    /// True when `text` contains an education keyword.
    #[must_use]
    pub fn is_education(&self, text: &str) -> bool {
        contains_any(text, &self.education_keywords)
    }

    /// Normalized `"<n> years"` when the line states an experience length.
    ///
    /// The long form (`years`/`yrs`) is tried before the short `y experience` form.
    #[must_use]
    pub fn experience(&self, line: &str) -> Option<String> {
        self.experience_long
            .captures(line)
            .or_else(|| self.experience_short.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|n| format!("{} years", n.as_str()))
    }

    /// The city mention in `line`, suffixed `, California` unless the state is
    /// already present.
    #[must_use]
    pub fn location(&self, line: &str) -> Option<String> {
        let found = self.location.captures(line)?.get(1)?.as_str();
        let lower = found.to_lowercase();
        let has_state =
            lower.contains("california") || lower.split_whitespace().any(|token| token == "ca");
        if has_state {
            Some(found.to_string())
        } else {
            Some(format!("{found}, California"))
        }
    }

    /// Canonical spellings of every skill mentioned in `line`.
    pub fn skills_in<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.skills
            .iter()
            .filter(move |(_, re)| re.is_match(line))
            .map(|(skill, _)| skill.as_str())
    }

    /// `position` with every role term capitalized, trimmed.
    #[must_use]
    pub fn capitalize_role_terms(&self, position: &str) -> String {
        let mut out = position.to_string();
        for (replacement, re) in &self.role_terms {
            out = re.replace_all(&out, NoExpand(replacement)).into_owned();
        }
        out.trim().to_string()
    }

    /// True when a position is leftover UI text rather than a job title.
    #[must_use]
    pub fn is_residual_noise(&self, position: &str) -> bool {
        if self.residual_noise.iter().any(|n| n == position) {
            return true;
        }
        let lower = position.to_lowercase();
        self.bare_skill_tokens.iter().any(|t| *t == lower)
            || self.percent_match_position.is_match(position)
    }
}
