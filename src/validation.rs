use std::ops::RangeInclusive;

use crate::appresult::{AppError, AppResult, FieldErrors};

#[derive(Debug, Default)]
#[must_use]
pub struct Checks {
    errors: FieldErrors,
}

impl Checks {
    pub fn email(self, field: &'static str, value: &str) -> Self {
        self.check(field, is_email(value), || "Email is invalid".to_owned())
    }

    pub fn required(self, field: &'static str, value: &str, message: &str) -> Self {
        self.check(field, !value.trim().is_empty(), || message.to_owned())
    }

    pub fn length(
        self,
        field: &'static str,
        value: &str,
        range: RangeInclusive<usize>,
        message: &str,
    ) -> Self {
        let len = value.trim().chars().count();
        self.check(field, range.contains(&len), || message.to_owned())
    }

    /// `required` then an upper bound, reporting whichever fails first.
    pub fn name(self, field: &'static str, value: &str, label: &str) -> Self {
        if value.trim().is_empty() {
            return self.required(field, value, &format!("{label} is required"));
        }
        self.length(field, value, 1..=30, &format!("{label} must be at most 30 characters"))
    }

    pub fn check(mut self, field: &'static str, ok: bool, message: impl FnOnce() -> String) -> Self {
        if !ok {
            self.errors.entry(field).or_insert_with(message);
        }
        self
    }

    pub fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("a.b+c@mail.example.org", true)]
    #[case("", false)]
    #[case("ada", false)]
    #[case("@example.com", false)]
    #[case("ada@example", false)]
    #[case("ada@@example.com", false)]
    #[case("ada@example..com", false)]
    #[case("ada lovelace@example.com", false)]
    fn email_shapes(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_email(value), expected);
    }

    #[rstest]
    #[case("", Some("First name is required"))]
    #[case("   ", Some("First name is required"))]
    #[case("Ada", None)]
    #[case(&"x".repeat(30), None)]
    #[case(&"x".repeat(31), Some("First name must be at most 30 characters"))]
    fn name_rules(#[case] value: &str, #[case] expected: Option<&str>) {
        let result = Checks::default().name("firstName", value, "First name").finish();
        match (result, expected) {
            (Ok(()), None) => {}
            (Err(AppError::Validation(errors)), Some(message)) => {
                assert_eq!(errors.get("firstName").map(String::as_str), Some(message));
            }
            (other, _) => panic!("unexpected {other:?} for {value:?}"),
        }
    }

    #[test]
    fn all_failures_are_reported_and_first_message_per_field_wins() {
        let result = Checks::default()
            .email("email", "nope")
            .length("password", "abc", 6..=30, "Password must be between 6 and 30 characters")
            .required("password", "", "never shown")
            .required("homeCity", "Austin", "Home city is required")
            .finish();

        let Err(AppError::Validation(errors)) = result else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["email"], "Email is invalid");
        assert_eq!(errors["password"], "Password must be between 6 and 30 characters");
    }
}
