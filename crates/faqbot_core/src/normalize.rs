use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// Plural/variant surface forms collapsed to one stem. Applied in order,
// after accent stripping, so the patterns are accent-free.
static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bexamens?\b", "examen"),
        (r"\bevaluations?\b", "evaluation"),
        (r"\bformations?\b", "formation"),
        (r"\bprogrammes?\b", "programme"),
        (r"\bfilieres?\b", "filiere"),
        (r"\bsessions?\b", "session"),
        (r"\bdiplomes?\b", "diplome"),
        (r"\bnotes?\b", "note"),
        (r"\bmodalites?\b", "modalite"),
        (r"\bidentifiants?\b", "identifiant"),
        (r"\bmasters?\b", "master"),
        (r"\blicences?\b", "licence"),
        (r"\bproblemes?\b", "probleme"),
        (r"\bdifficultes?\b", "difficulte"),
    ]
    .into_iter()
    .map(|(pat, rep)| (Regex::new(pat).expect("lexical rule pattern"), rep))
    .collect()
});

static ACRONYM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\buv[\-\s]?bf\b").expect("acronym pattern"));
static MDP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmdp\b").expect("mdp pattern"));
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_/]").expect("separator pattern"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("token pattern"));

// Minimal French stopword list, passed through `normalize` once so that
// comparisons against normalized tokens are exact.
static FR_STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    [
        "alors", "au", "aucun", "aussi", "autre", "aux", "avec", "avoir", "bon", "car", "ce",
        "cela", "ces", "cet", "cette", "ceux", "chaque", "comme", "comment", "dans", "de", "des",
        "du", "elle", "elles", "en", "encore", "est", "et", "etc", "etre", "eux", "faire", "fois",
        "hors", "il", "ils", "je", "la", "le", "les", "leur", "lui", "mais", "malgre", "me",
        "meme", "mes", "moi", "mon", "ne", "nos", "notre", "nous", "on", "ou", "par", "parce",
        "pas", "peu", "plus", "pour", "pourquoi", "quand", "que", "quel", "quelle", "quelles",
        "quels", "qui", "sans", "se", "ses", "si", "sont", "sur", "ta", "te", "tes", "toi", "ton",
        "tous", "tout", "toute", "toutes", "tres", "tu", "un", "une", "vos", "votre", "vous", "y",
    ]
    .into_iter()
    .map(normalize)
    .collect()
});

fn strip_accents_lower(text: &str) -> String {
    text.to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Canonical text form shared by the retriever and the index builder:
/// lowercase, accent-free, domain lexical rules applied, separators and
/// repeated whitespace collapsed. Idempotent.
pub fn normalize(text: &str) -> String {
    let mut t = strip_accents_lower(text);
    for (pat, rep) in SINGULAR_RULES.iter() {
        t = pat.replace_all(&t, *rep).into_owned();
    }
    t = ACRONYM_RE.replace_all(&t, "uvbf").into_owned();
    t = MDP_RE.replace_all(&t, "mot de passe").into_owned();
    t = SEPARATOR_RE.replace_all(&t, " ").into_owned();
    WHITESPACE_RE.replace_all(&t, " ").trim().to_string()
}

/// Normalized alphanumeric tokens with stopwords removed.
pub fn clean_tokens(text: &str) -> Vec<String> {
    let t = normalize(text);
    TOKEN_RE
        .find_iter(&t)
        .map(|m| m.as_str())
        .filter(|tok| !FR_STOPWORDS.contains(*tok))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_accents() {
        assert_eq!(normalize("Évaluations Prévues"), "evaluation prevues");
        assert_eq!(normalize("Diplômes"), "diplome");
    }

    #[test]
    fn collapses_plural_surface_forms() {
        assert_eq!(normalize("les examens des licences"), "les examen des licence");
    }

    #[test]
    fn harmonizes_acronym_spellings() {
        assert_eq!(normalize("UV-BF"), "uvbf");
        assert_eq!(normalize("uv bf"), "uvbf");
        assert_eq!(normalize("uvbf"), "uvbf");
    }

    #[test]
    fn expands_mdp_abbreviation() {
        assert_eq!(normalize("mdp oublié"), "mot de passe oublie");
    }

    #[test]
    fn replaces_separators_and_collapses_whitespace() {
        assert_eq!(normalize("licence_2/semestre   1"), "licence 2 semestre 1");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert!(clean_tokens("").is_empty());
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in [
            "Les Examens de l'UV-BF",
            "mdp / identifiants",
            "Problèmes d'accès à la plateforme",
            "FRAIS_INSCRIPTION",
            "",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn clean_tokens_drops_stopwords() {
        assert_eq!(
            clean_tokens("Comment payer les frais de la licence ?"),
            vec!["payer", "frais", "licence"]
        );
    }
}
