use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::GenderizeError;

// @module: Gender presentation transform for video-generation prompts

// @const: Whitespace run regex used by tidy_spaces
static MULTI_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s{2,}").unwrap()
});

/// Movement-quality cue for a masculine presentation.
pub const MASCULINE_STYLE_TAG: &str = "Presenting a masculine look and movement quality (confident posture, strong chest/shoulder isolations).";

/// Movement-quality cue for a feminine presentation.
pub const FEMININE_STYLE_TAG: &str = "Presenting a feminine look and movement quality (fluid lines, hip emphasis, graceful arm styling).";

// Pronoun rule tables. Order matters: each rule is applied as a single
// whole-word pass over the text, in the order listed.
const MASCULINE_PRONOUN_RULES: &[(&str, &str)] = &[
    ("they", "he"),
    ("them", "him"),
    ("their", "his"),
    ("she", "he"),
    ("her", "his"), // object and possessive case both collapse to "his"
    ("theirs", "his"),
    ("themself", "himself"),
    ("themselves", "himself"),
    ("hers", "his"),
];

const FEMININE_PRONOUN_RULES: &[(&str, &str)] = &[
    ("they", "she"),
    ("them", "her"),
    ("their", "her"),
    ("he", "she"),
    ("him", "her"),
    ("his", "her"),
    ("theirs", "hers"),
    ("themself", "herself"),
    ("themselves", "herself"),
];

// Identity-lock phrases checked in priority order. The style tag is
// inserted immediately before the first phrase found in the prompt.
const IDENTITY_ANCHORS: &[&str] = &[
    "The anime character matches the uploaded reference exactly",
    "The character matches the uploaded reference exactly",
    "Preserve identity",
];

// Framing sentences appended when the prompt does not already carry them.
const VISIBILITY_CONSTRAINTS: &[&str] = &[
    "Entire body is always in frame.",
    "Head is always in the frame.",
];

/// Gender presentation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    // @code: M
    Masculine,
    // @code: F
    Feminine,
}

impl Gender {
    /// Normalize an external gender code (`M`/`F`, case-insensitive).
    ///
    /// Any other value is rejected; there is no silent fallback.
    pub fn from_code(code: &str) -> Result<Self, GenderizeError> {
        match code.trim() {
            c if c.eq_ignore_ascii_case("m") => Ok(Self::Masculine),
            c if c.eq_ignore_ascii_case("f") => Ok(Self::Feminine),
            _ => Err(GenderizeError::InvalidGenderCode(code.to_string())),
        }
    }

    // @returns: Canonical single-letter code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Masculine => "M",
            Self::Feminine => "F",
        }
    }

    // @returns: Capitalized presentation name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Masculine => "Masculine",
            Self::Feminine => "Feminine",
        }
    }

    // @returns: Lowercase code used in output filenames
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Masculine => "m".to_string(),
            Self::Feminine => "f".to_string(),
        }
    }
}

// Implement Display trait for Gender
impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for Gender
impl FromStr for Gender {
    type Err = GenderizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

/// A single word-boundary pronoun substitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PronounRule {
    /// Word to match (whole-word, case-insensitive)
    pub pattern: String,

    /// Replacement word
    pub replacement: String,
}

impl PronounRule {
    /// Create a new pronoun rule.
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// A per-gender pair of tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderMap<T> {
    /// Table for the masculine presentation
    pub masculine: T,

    /// Table for the feminine presentation
    pub feminine: T,
}

impl<T> GenderMap<T> {
    /// Look up the table for a gender.
    pub fn get(&self, gender: Gender) -> &T {
        match gender {
            Gender::Masculine => &self.masculine,
            Gender::Feminine => &self.feminine,
        }
    }
}

/// Transform tables for the prompt genderizer.
///
/// Every field serde-defaults to the built-in tables, so a configuration
/// file can override any one table without restating the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRules {
    /// Style-tag sentence injected per gender
    #[serde(default = "default_style_tags")]
    pub style_tags: GenderMap<String>,

    /// Ordered pronoun substitutions per gender
    #[serde(default = "default_pronoun_rules")]
    pub pronoun_rules: GenderMap<Vec<PronounRule>>,

    /// Identity-lock phrases in priority order
    #[serde(default = "default_identity_anchors")]
    pub identity_anchors: Vec<String>,

    /// Framing sentences appended when absent
    #[serde(default = "default_visibility_constraints")]
    pub visibility_constraints: Vec<String>,
}

impl Default for TransformRules {
    fn default() -> Self {
        Self {
            style_tags: default_style_tags(),
            pronoun_rules: default_pronoun_rules(),
            identity_anchors: default_identity_anchors(),
            visibility_constraints: default_visibility_constraints(),
        }
    }
}

fn default_style_tags() -> GenderMap<String> {
    GenderMap {
        masculine: MASCULINE_STYLE_TAG.to_string(),
        feminine: FEMININE_STYLE_TAG.to_string(),
    }
}

fn default_pronoun_rules() -> GenderMap<Vec<PronounRule>> {
    let build = |table: &[(&str, &str)]| {
        table
            .iter()
            .map(|(pattern, replacement)| PronounRule::new(pattern, replacement))
            .collect()
    };
    GenderMap {
        masculine: build(MASCULINE_PRONOUN_RULES),
        feminine: build(FEMININE_PRONOUN_RULES),
    }
}

fn default_identity_anchors() -> Vec<String> {
    IDENTITY_ANCHORS.iter().map(|s| s.to_string()).collect()
}

fn default_visibility_constraints() -> Vec<String> {
    VISIBILITY_CONSTRAINTS.iter().map(|s| s.to_string()).collect()
}

/// A pronoun rule compiled to a whole-word regex.
#[derive(Debug)]
struct CompiledRule {
    regex: Regex,
    replacement: String,
}

impl CompiledRule {
    fn compile(rule: &PronounRule) -> Self {
        // The pattern is escaped, so the resulting expression is always valid
        let regex = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&rule.pattern))).unwrap();
        Self {
            regex,
            replacement: rule.replacement.clone(),
        }
    }

    /// Replace every whole-word occurrence, keeping a leading capital
    /// when the matched word had one.
    fn apply(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |caps: &regex::Captures| {
                let matched = &caps[0];
                if matched.chars().next().is_some_and(char::is_uppercase) {
                    capitalize_first(&self.replacement)
                } else {
                    self.replacement.clone()
                }
            })
            .into_owned()
    }
}

/// Prompt genderizer holding compiled transform tables.
///
/// The tables are injected at construction time, so integrators can swap
/// vocabularies without touching the transform flow, and tests can use
/// custom tables without shared-state leakage.
#[derive(Debug)]
pub struct Genderizer {
    style_tags: GenderMap<String>,
    rules: GenderMap<Vec<CompiledRule>>,
    identity_anchors: Vec<String>,
    visibility_constraints: Vec<String>,
}

impl Genderizer {
    /// Create a genderizer with the built-in tables.
    pub fn new() -> Self {
        Self::with_rules(TransformRules::default())
    }

    /// Create a genderizer with custom transform tables.
    pub fn with_rules(rules: TransformRules) -> Self {
        let compile = |table: &[PronounRule]| table.iter().map(CompiledRule::compile).collect();
        Self {
            style_tags: rules.style_tags,
            rules: GenderMap {
                masculine: compile(&rules.pronoun_rules.masculine),
                feminine: compile(&rules.pronoun_rules.feminine),
            },
            identity_anchors: rules.identity_anchors,
            visibility_constraints: rules.visibility_constraints,
        }
    }

    /// Transform a prompt to match the gender presentation named by `code`.
    ///
    /// Fails with [`GenderizeError::InvalidGenderCode`] when the code does
    /// not normalize to `M` or `F`. An empty prompt is valid input and
    /// yields the style tag plus the visibility constraints.
    pub fn genderize(&self, prompt: &str, code: &str) -> Result<String, GenderizeError> {
        let gender = Gender::from_code(code)?;
        Ok(self.apply(prompt, gender))
    }

    /// Transform a batch of prompts, preserving input order.
    ///
    /// The gender code is validated once for the whole batch, so an
    /// invalid code fails before any prompt is transformed.
    pub fn genderize_batch<S: AsRef<str>>(
        &self,
        prompts: &[S],
        code: &str,
    ) -> Result<Vec<String>, GenderizeError> {
        let gender = Gender::from_code(code)?;
        Ok(prompts.iter().map(|p| self.apply(p.as_ref(), gender)).collect())
    }

    /// Transform a prompt for an already-validated gender.
    ///
    /// Pure and deterministic: identical inputs always yield identical
    /// output, and reapplying the transform to its own output is a no-op.
    pub fn apply(&self, prompt: &str, gender: Gender) -> String {
        let out = self.map_pronouns(prompt, gender);
        let out = self.inject_style_tag(&out, gender);
        let out = self.append_visibility_constraints(&out);
        tidy_spaces(&out)
    }

    /// Apply the pronoun rule table for `gender`, one pass per rule,
    /// in table order.
    fn map_pronouns(&self, prompt: &str, gender: Gender) -> String {
        let mut mapped = prompt.to_string();
        for rule in self.rules.get(gender) {
            mapped = rule.apply(&mapped);
        }
        mapped
    }

    /// Insert the style tag before the identity anchor if one is found,
    /// otherwise append it. Skips insertion when the tag is already
    /// present, so repeated transforms never double it.
    fn inject_style_tag(&self, prompt: &str, gender: Gender) -> String {
        let tag = self.style_tags.get(gender);
        if prompt.contains(tag.as_str()) {
            return prompt.to_string();
        }
        for anchor in &self.identity_anchors {
            if let Some(idx) = prompt.find(anchor.as_str()) {
                let head = prompt[..idx].trim_end();
                if head.is_empty() {
                    return format!("{} {}", tag, &prompt[idx..]);
                }
                return format!("{} {} {}", head, tag, &prompt[idx..]);
            }
        }
        append_sentence(prompt, tag)
    }

    /// Append each visibility constraint whose text is not already in
    /// the prompt.
    fn append_visibility_constraints(&self, prompt: &str) -> String {
        let mut out = prompt.to_string();
        for sentence in &self.visibility_constraints {
            if !out.contains(sentence.as_str()) {
                out = append_sentence(&out, sentence);
            }
        }
        out
    }
}

impl Default for Genderizer {
    fn default() -> Self {
        Self::new()
    }
}

// Process-wide genderizer built from the built-in tables, backing the
// module-level convenience functions.
static DEFAULT_GENDERIZER: Lazy<Genderizer> = Lazy::new(Genderizer::new);

/// Transform a prompt using the built-in tables.
///
/// See [`Genderizer::genderize`].
pub fn genderize(prompt: &str, gender_code: &str) -> Result<String, GenderizeError> {
    DEFAULT_GENDERIZER.genderize(prompt, gender_code)
}

/// Transform a batch of prompts using the built-in tables.
///
/// See [`Genderizer::genderize_batch`].
pub fn genderize_batch<S: AsRef<str>>(
    prompts: &[S],
    gender_code: &str,
) -> Result<Vec<String>, GenderizeError> {
    DEFAULT_GENDERIZER.genderize_batch(prompts, gender_code)
}

/// Join `sentence` onto `text`, closing the existing text with a period
/// when it lacks terminal punctuation.
fn append_sentence(text: &str, sentence: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return sentence.to_string();
    }
    if trimmed.ends_with(['.', '!', '?']) {
        format!("{} {}", trimmed, sentence)
    } else {
        format!("{}. {}", trimmed, sentence)
    }
}

/// Collapse whitespace runs left behind by substitutions to a single
/// space and trim the ends.
pub fn tidy_spaces(text: &str) -> String {
    MULTI_SPACE_REGEX.replace_all(text, " ").trim().to_string()
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
