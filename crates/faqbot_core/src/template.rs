use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Closed set of slot names a template may draw from extracted entities.
/// `LIEN` is bound separately from the template's default links.
pub const SLOT_NAMES: [&str; 7] = [
    "NIVEAU",
    "SEMESTRE",
    "MONTANT",
    "MODE_PAIEMENT",
    "CONTACT",
    "SERVICE",
    "TYPE_EXAMEN",
];

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSpec {
    pub intent: String,
    #[serde(default)]
    pub required_entities: Vec<String>,
    #[serde(default)]
    pub fallback_prompt: Option<String>,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    #[serde(default)]
    pub template_text: String,
    #[serde(default)]
    pub contact_suffix: String,
    #[serde(default)]
    pub default_links: Vec<String>,
}

/// On-disk template collection: `{"intents": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateFile {
    #[serde(default)]
    pub intents: Vec<TemplateSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub need_more_info: bool,
    pub missing: Vec<String>,
}

impl Rendered {
    fn empty() -> Self {
        Self {
            text: String::new(),
            need_more_info: false,
            missing: Vec::new(),
        }
    }
}

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Z_]+)\}").expect("placeholder pattern"));

fn substitute(template: &str, context: &BTreeMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            context.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Intent label → template table; at most one template per label, a later
/// duplicate replacing the earlier one.
#[derive(Debug)]
pub struct TemplateCatalog {
    templates: HashMap<String, TemplateSpec>,
}

impl TemplateCatalog {
    pub fn new(specs: Vec<TemplateSpec>) -> Self {
        Self {
            templates: specs
                .into_iter()
                .map(|spec| (spec.intent.clone(), spec))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Resolve a template against extracted entities. An unknown label is
    /// the fallback trigger (empty text, no flags), not an error. Missing
    /// required entities short-circuit into a clarification prompt; no
    /// partial rendering happens.
    pub fn render(&self, label: &str, entities: &BTreeMap<String, Vec<String>>) -> Rendered {
        let Some(spec) = self.templates.get(label) else {
            return Rendered::empty();
        };

        let missing: Vec<String> = spec
            .required_entities
            .iter()
            .filter(|req| entities.get(req.as_str()).map_or(true, Vec::is_empty))
            .cloned()
            .collect();
        if !missing.is_empty() {
            let text = spec
                .fallback_prompt
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Précisez: {}", missing.join(", ")));
            return Rendered {
                text,
                need_more_info: true,
                missing,
            };
        }

        let mut context = spec.defaults.clone();
        for slot in SLOT_NAMES {
            if let Some(first) = entities.get(slot).and_then(|values| values.first()) {
                context.insert(slot.to_string(), first.clone());
            }
        }
        context.insert(
            "LIEN".to_string(),
            spec.default_links.first().cloned().unwrap_or_default(),
        );

        let mut text = substitute(&spec.template_text, &context);
        let has_contact = ["SERVICE", "CONTACT"]
            .iter()
            .any(|key| context.get(*key).is_some_and(|v| !v.is_empty()));
        if !spec.contact_suffix.is_empty() && has_contact {
            text.push_str(&substitute(&spec.contact_suffix, &context));
        }

        Rendered {
            text,
            need_more_info: false,
            missing: Vec::new(),
        }
    }
}
