use indexmap::IndexMap;
use thiserror::Error;

/// Field validation failures collected while checking a request
///
/// `errors` holds the client-facing messages per field; `failed_rules`
/// holds the rule names that produced them, which are only surfaced in
/// debug mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("the given data was invalid")]
pub struct ValidationErrors {
    errors: IndexMap<String, Vec<String>>,
    failed_rules: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `rule` failed for `field` with a client-facing message
    pub fn add(&mut self, field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        self.failed_rules.entry(field.clone()).or_default().push(rule.into());
        self.errors.entry(field).or_default().push(message.into());
    }

    /// Builder form of [`ValidationErrors::add`]
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, rule, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub const fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    pub const fn failed_rules(&self) -> &IndexMap<String, Vec<String>> {
        &self.failed_rules
    }

    /// `Ok(value)` when nothing failed, otherwise the collected errors
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed validation
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_messages_and_rules_by_field() {
        let errors = ValidationErrors::new()
            .with("ifsc", "required", "The ifsc field is required.")
            .with("account_number", "digits_between", "The account number must be 9 to 18 digits.")
            .with("ifsc", "regex", "The ifsc format is invalid.");

        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.errors()["ifsc"].len(), 2);
        assert_eq!(errors.failed_rules()["ifsc"], vec!["required", "regex"]);
    }

    #[test]
    fn finish_passes_value_through_when_clean() {
        assert_eq!(ValidationErrors::new().finish(7), Ok(7));
    }
}
