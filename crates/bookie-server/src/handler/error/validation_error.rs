//! Mapping of validation failures onto HTTP errors.

use std::collections::BTreeMap;

use validator::{ValidationErrors, ValidationErrorsKind};

use super::{Error, ErrorKind};

fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut fields = BTreeMap::new();

    for (field, kind) in errors.errors() {
        let ValidationErrorsKind::Field(errors) = kind else {
            continue;
        };

        let messages = errors
            .iter()
            .map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => describe(&e.code, e.params.get("min"), e.params.get("max")),
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }

    fields
}

fn describe(
    code: &str,
    min: Option<&serde_json::Value>,
    max: Option<&serde_json::Value>,
) -> String {
    match (code, min, max) {
        ("email", ..) => "must be a valid email address".to_owned(),
        ("length", Some(min), Some(max)) => format!("length must be between {min} and {max}"),
        ("length", Some(min), None) => format!("length must be at least {min}"),
        ("length", None, Some(max)) => format!("length must be at most {max}"),
        (code, ..) => format!("failed {code} validation"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let payload = serde_json::to_value(field_messages(&errors)).unwrap_or_default();
        ErrorKind::BadRequest
            .with_message("validation failed")
            .with_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Form {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    #[test]
    fn payload_lists_each_field() {
        let form = Form {
            email: "nope".into(),
            password: "short".into(),
        };

        let error = Error::from(form.validate().unwrap_err());
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let payload = error.payload().unwrap();
        assert_eq!(payload["email"][0], "must be a valid email address");
        assert_eq!(payload["password"][0], "length must be at least 8");
    }
}
