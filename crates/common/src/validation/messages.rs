//! Message templates for validation rules.
//!
//! A catalog is built once at startup from configuration and handed to the
//! validators that need it. Templates use `{Placeholder}` tokens.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

use super::rules::RuleCode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unsupported validation language: {0}")]
    UnsupportedLanguage(String),
    #[error("unknown validation rule code: {0}")]
    UnknownRuleCode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
}

impl FromStr for Language {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "en" | "en-us" | "en-gb" | "english" => Ok(Language::English),
            other => Err(CatalogError::UnsupportedLanguage(other.to_string())),
        }
    }
}

fn english(code: RuleCode) -> &'static str {
    match code {
        RuleCode::NotEmpty => "Must not be empty.",
        RuleCode::MinimumLength => {
            "The length must be at least {MinLength} characters. You entered {TotalLength} characters."
        }
        RuleCode::MaximumLength => {
            "The length must be {MaxLength} characters or fewer. You entered {TotalLength} characters."
        }
        RuleCode::EmailAddress => "Must be a valid email address.",
        RuleCode::LessThanOrEqual => "Must be less than or equal to '{ComparisonValue}'.",
        RuleCode::Predicate => "The specified condition was not met.",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    language: Language,
    overrides: HashMap<RuleCode, String>,
}

impl MessageCatalog {
    pub fn new(language: Language) -> Self {
        Self { language, overrides: HashMap::new() }
    }

    /// Build a catalog from the `[validation]` config section.
    pub fn from_config(language: &str, overrides: &HashMap<String, String>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(language.parse()?);
        for (code, template) in overrides {
            let code = RuleCode::parse(code).ok_or_else(|| CatalogError::UnknownRuleCode(code.clone()))?;
            catalog.overrides.insert(code, template.clone());
        }
        Ok(catalog)
    }

    pub fn with_override(mut self, code: RuleCode, template: impl Into<String>) -> Self {
        self.overrides.insert(code, template.into());
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn template(&self, code: RuleCode) -> &str {
        if let Some(t) = self.overrides.get(&code) {
            return t;
        }
        match self.language {
            Language::English => english(code),
        }
    }

    /// Render the template for `code`, substituting `{Name}` tokens from `args`.
    /// Unknown tokens are left untouched.
    pub fn render(&self, code: RuleCode, args: &[(&str, String)]) -> String {
        let mut out = self.template(code).to_string();
        for (name, value) in args {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_placeholders() {
        let catalog = MessageCatalog::default();
        let msg = catalog.render(
            RuleCode::MaximumLength,
            &[("MaxLength", "255".into()), ("TotalLength", "256".into())],
        );
        assert_eq!(msg, "The length must be 255 characters or fewer. You entered 256 characters.");
    }

    #[test]
    fn overrides_win_over_language_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert("NotEmptyValidator".to_string(), "Required.".to_string());
        let catalog = MessageCatalog::from_config("en", &overrides).unwrap();
        assert_eq!(catalog.template(RuleCode::NotEmpty), "Required.");
        assert_eq!(catalog.template(RuleCode::EmailAddress), "Must be a valid email address.");
    }

    #[test]
    fn rejects_unknown_language_and_codes() {
        let none = HashMap::new();
        assert_eq!(
            MessageCatalog::from_config("fr", &none).unwrap_err(),
            CatalogError::UnsupportedLanguage("fr".into())
        );

        let mut bad = HashMap::new();
        bad.insert("NoSuchValidator".to_string(), "x".to_string());
        assert!(matches!(
            MessageCatalog::from_config("en", &bad),
            Err(CatalogError::UnknownRuleCode(_))
        ));
    }

    #[test]
    fn unknown_tokens_are_kept() {
        let catalog = MessageCatalog::default().with_override(RuleCode::Predicate, "{Unknown} stays");
        assert_eq!(catalog.render(RuleCode::Predicate, &[]), "{Unknown} stays");
    }
}
