//! String helpers callable from templates.

use crate::wrap::model::lower_first;

/// The closed set of helpers a template can call by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateHelper {
    /// Lowercase the first letter: `UserStore` → `userStore`
    Camelize,
    /// Uppercase the first letter of every word: `user store` → `User Store`
    Capitalize,
    Downcase,
    Uppercase,
}

impl TemplateHelper {
    pub const ALL: [TemplateHelper; 4] = [
        TemplateHelper::Camelize,
        TemplateHelper::Capitalize,
        TemplateHelper::Downcase,
        TemplateHelper::Uppercase,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Camelize => "camelize",
            Self::Capitalize => "capitalize",
            Self::Downcase => "downcase",
            Self::Uppercase => "uppercase",
        }
    }

    /// Look a helper up by the name used in templates. `lowercase` is
    /// accepted as an alias of `downcase`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lowercase" => Some(Self::Downcase),
            other => Self::ALL.into_iter().find(|h| h.name() == other),
        }
    }

    pub fn apply(self, input: &str) -> String {
        match self {
            Self::Camelize => lower_first(input),
            Self::Capitalize => title_case(input),
            Self::Downcase => input.to_lowercase(),
            Self::Uppercase => input.to_uppercase(),
        }
    }
}

fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = is_separator(c);
    }
    out
}

/// Word boundaries as Go's `strings.Title` sees them: ASCII punctuation and
/// whitespace separate words, other non-letter runes do not.
fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}
