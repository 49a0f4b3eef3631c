use regex::Regex;

/// Label returned when no rule matches, and the default category for
/// knowledge entries without one.
pub const DEFAULT_INTENT: &str = "info_generale_uvbf";

#[derive(Debug)]
pub struct IntentRule {
    pub label: String,
    pub patterns: Vec<Regex>,
}

impl IntentRule {
    pub fn new(label: impl Into<String>, patterns: Vec<Regex>) -> Self {
        Self {
            label: label.into(),
            patterns,
        }
    }
}

/// Ordered rule matcher: rules are evaluated in declaration order and the
/// first rule with any matching pattern wins. Independent from retrieval.
#[derive(Debug)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
    default_label: String,
}

impl IntentClassifier {
    pub fn new(rules: Vec<IntentRule>, default_label: impl Into<String>) -> Self {
        Self {
            rules,
            default_label: default_label.into(),
        }
    }

    /// Matches against the lowercased input only; accents are kept so the
    /// built-in accented patterns behave as written.
    pub fn classify(&self, text: &str) -> &str {
        let t = text.to_lowercase();
        for rule in &self.rules {
            if rule.patterns.iter().any(|p| p.is_match(&t)) {
                return &rule.label;
            }
        }
        &self.default_label
    }
}

fn rule(label: &str, patterns: &[&str]) -> IntentRule {
    IntentRule::new(
        label,
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("built-in intent pattern"))
            .collect(),
    )
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(
            vec![
                rule(
                    "frais_inscription",
                    &[r"\bfrais\b", "inscription", "payer", "paiement", "versement"],
                ),
                rule(
                    "acces_plateforme",
                    &[
                        "plateforme",
                        "lms",
                        "moodle",
                        "mot de passe",
                        "connexion",
                        "connecter",
                        "login",
                        "se connecter",
                    ],
                ),
                rule(
                    "examens_modalites",
                    &[
                        "examen",
                        "évaluation",
                        "eval",
                        "en ligne",
                        "présentiel",
                        "sur table",
                        "modalit",
                    ],
                ),
                rule(
                    DEFAULT_INTENT,
                    &[
                        r"uv\-?bf",
                        "université virtuelle",
                        "formation",
                        "offre",
                        "filière",
                        "publique",
                        "privée",
                    ],
                ),
            ],
            DEFAULT_INTENT,
        )
    }
}
