use std::collections::HashMap;

/// Named input fields of a form.
pub trait FormFields {
    /// Current value of the field called `name`, or `None` if the form has no such field
    fn value(&self, name: &str) -> Option<String>;
}

impl FormFields for HashMap<String, String> {
    fn value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl FormFields for [(&str, &str)] {
    fn value(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.to_string())
    }
}

impl<const N: usize> FormFields for [(&str, &str); N] {
    fn value(&self, name: &str) -> Option<String> {
        self.as_slice().value(name)
    }
}

/// A single form submission.
///
/// Tracks whether the default submit action was suppressed.
pub struct SubmitEvent<'a> {
    form: &'a dyn FormFields,
    default_prevented: bool,
}

impl<'a> SubmitEvent<'a> {
    pub fn new(form: &'a dyn FormFields) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn form(&self) -> &dyn FormFields {
        self.form
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_form_lookup() {
        let form = [("username", "alice"), ("password", "pw")];
        assert_eq!(form.value("username").as_deref(), Some("alice"));
        assert!(form.value("email").is_none());
    }

    #[test]
    fn test_prevent_default_sticks() {
        let form: HashMap<String, String> = HashMap::new();
        let mut event = SubmitEvent::new(&form);
        assert!(!event.default_prevented());
        event.prevent_default();
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
