use std::sync::OnceLock;

use axum::extract::State;
use axum::{Extension, Json};
use courier_core::{Partner, Raised, ValidationErrors};
use http::StatusCode;
use regex::Regex;
use serde::Deserialize;

use super::{Success, success};
use crate::auth::require_active;
use crate::extract::Payload;
use crate::state::{AppState, BankAccount, BankAccountView};

const HOLDER_NAME_MAX: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct BankAccountRequest {
    account_holder_name: Option<String>,
    account_number: Option<String>,
    ifsc: Option<String>,
}

impl BankAccountRequest {
    fn validate(self) -> Result<BankAccount, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let holder = required(&mut errors, "account_holder_name", self.account_holder_name);
        if let Some(ref name) = holder
            && name.chars().count() > HOLDER_NAME_MAX
        {
            errors.add(
                "account_holder_name",
                "max",
                format!("The account holder name may not be greater than {HOLDER_NAME_MAX} characters."),
            );
        }

        let number = required(&mut errors, "account_number", self.account_number);
        if number.as_deref().is_some_and(|n| !is_account_number(n)) {
            errors.add("account_number", "digits_between", "The account number must be between 9 and 18 digits.");
        }

        let ifsc = required(&mut errors, "ifsc", self.ifsc).map(|code| code.to_ascii_uppercase());
        if let Some(ref code) = ifsc
            && !ifsc_pattern().is_match(code)
        {
            errors.add("ifsc", "regex", "The ifsc format is invalid.");
        }

        match (holder, number, ifsc) {
            (Some(account_holder_name), Some(account_number), Some(ifsc)) => errors.finish(BankAccount {
                account_holder_name,
                account_number,
                ifsc,
            }),
            _ => Err(errors),
        }
    }
}

fn required(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<String> {
    let value = value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
    if value.is_none() {
        errors.add(field, "required", format!("The {} field is required.", field.replace('_', " ")));
    }
    value
}

fn is_account_number(value: &str) -> bool {
    (9..=18).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

fn ifsc_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("must be valid regex"))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(partner): Extension<Partner>,
) -> Result<Json<Success<BankAccountView>>, Raised> {
    let account = state.bank_accounts.get(&partner)?;
    Ok(success(BankAccountView::from(&account)))
}

pub async fn store(
    State(state): State<AppState>,
    Extension(partner): Extension<Partner>,
    Payload(request): Payload<BankAccountRequest>,
) -> Result<(StatusCode, Json<Success<BankAccountView>>), Raised> {
    require_active(&partner)?;
    let account = request.validate()?;
    let saved = state.bank_accounts.save(&partner, account)?;
    Ok((StatusCode::CREATED, success(BankAccountView::from(&saved))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(holder: &str, number: &str, ifsc: &str) -> BankAccountRequest {
        BankAccountRequest {
            account_holder_name: Some(holder.to_owned()),
            account_number: Some(number.to_owned()),
            ifsc: Some(ifsc.to_owned()),
        }
    }

    #[test]
    fn valid_request_normalizes_ifsc() {
        let account = request(" Asha Rao ", "123456789012", "hdfc0001234").validate().unwrap();
        assert_eq!(account.account_holder_name, "Asha Rao");
        assert_eq!(account.ifsc, "HDFC0001234");
    }

    #[test]
    fn empty_request_fails_every_required_rule() {
        let errors = BankAccountRequest::default().validate().unwrap_err();

        assert_eq!(errors.errors().len(), 3);
        assert_eq!(errors.errors()["account_holder_name"], vec!["The account holder name field is required."]);
        assert_eq!(errors.failed_rules()["ifsc"], vec!["required"]);
    }

    #[test]
    fn account_number_must_be_9_to_18_digits() {
        for number in ["12345678", "1234567890123456789", "12345abc90"] {
            let errors = request("Asha", number, "HDFC0001234").validate().unwrap_err();
            assert_eq!(errors.failed_rules()["account_number"], vec!["digits_between"], "{number}");
        }
    }

    #[test]
    fn ifsc_fifth_character_must_be_zero() {
        let errors = request("Asha", "123456789012", "HDFC1001234").validate().unwrap_err();
        assert_eq!(errors.failed_rules()["ifsc"], vec!["regex"]);
        assert!(!errors.errors().contains_key("account_number"));
    }
}
