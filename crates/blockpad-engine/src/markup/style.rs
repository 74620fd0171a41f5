/// Parsed declarations of an inline `style` attribute.
///
/// Property names are lowercased; values are trimmed but otherwise kept as
/// written. Later declarations of the same property win, as in CSS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(source: &str) -> Self {
        let declarations = source
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(property, value)| {
                (
                    property.trim().to_ascii_lowercase(),
                    value.trim().to_string(),
                )
            })
            .filter(|(property, value)| !property.is_empty() && !value.is_empty())
            .collect();
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value.as_str())
    }

    /// True when `property` is set to exactly `keyword` (ASCII case-insensitive).
    pub fn is(&self, property: &str, keyword: &str) -> bool {
        self.get(property)
            .is_some_and(|value| value.eq_ignore_ascii_case(keyword))
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declarations() {
        let style = InlineStyle::parse("font-weight: bold; Color:#f00 ;;text-decoration:underline");
        assert_eq!(style.get("font-weight"), Some("bold"));
        assert_eq!(style.get("color"), Some("#f00"));
        assert_eq!(style.get("text-decoration"), Some("underline"));
        assert_eq!(style.get("font-style"), None);
    }

    #[test]
    fn last_declaration_wins() {
        let style = InlineStyle::parse("color: red; color: blue");
        assert_eq!(style.get("color"), Some("blue"));
    }

    #[test]
    fn keyword_match_is_exact_apart_from_case() {
        let style = InlineStyle::parse("font-weight: BOLD; text-decoration: underline red");
        assert!(style.is("font-weight", "bold"));
        assert!(!style.is("text-decoration", "underline"));
    }

    #[test]
    fn ignores_garbage() {
        let style = InlineStyle::parse("nonsense; : empty; color:");
        assert!(style.is_empty());
    }
}
