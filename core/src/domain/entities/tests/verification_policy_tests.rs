//! Unit tests for the verification policy table

use std::collections::HashSet;

use crate::domain::entities::verification_policy::{
    get_policy, is_valid_type, Channel, CodeType, UserValidation,
};
use crate::errors::VerificationError;

#[test]
fn test_every_code_type_has_a_sane_policy() {
    for code_type in CodeType::ALL {
        let policy = code_type.policy();
        assert_eq!(policy.code_type, code_type);
        assert!(policy.digits > 0, "{} digits", code_type);
        assert!(policy.expiry_minutes > 0, "{} expiry", code_type);
        assert!(policy.max_retries > 0, "{} retries", code_type);
        assert!(policy.rate_limit_seconds > 0, "{} rate limit", code_type);
        assert!(matches!(policy.channel, Channel::Email | Channel::Sms));
        assert!(!policy.template.is_empty());
    }
}

#[test]
fn test_wire_names_are_unique_and_round_trip() {
    let names: HashSet<&str> = CodeType::ALL.iter().map(|t| t.as_str()).collect();
    assert_eq!(names.len(), CodeType::ALL.len());

    for code_type in CodeType::ALL {
        assert_eq!(code_type.as_str().parse::<CodeType>().unwrap(), code_type);
        assert_eq!(code_type.to_string(), code_type.as_str());

        let json = serde_json::to_string(&code_type).unwrap();
        assert_eq!(json, format!("\"{}\"", code_type.as_str()));
    }
}

#[test]
fn test_get_policy_known_types() {
    let register = get_policy("email_register").unwrap();
    assert_eq!(register.channel, Channel::Email);
    assert!(!register.require_auth);
    assert_eq!(register.user_validation, Some(UserValidation::MustNotExist));

    let login = get_policy("phone_login").unwrap();
    assert_eq!(login.channel, Channel::Sms);
    assert_eq!(login.user_validation, Some(UserValidation::MustExist));

    let sensitive = get_policy("sensitive_operation").unwrap();
    assert!(sensitive.require_auth);
    assert_eq!(sensitive.max_retries, 3);
    assert_eq!(sensitive.rate_limit_seconds, 120);
}

#[test]
fn test_email_change_requires_auth_and_existing_user() {
    let policy = CodeType::EmailChange.policy();
    assert!(policy.require_auth);
    assert_eq!(policy.user_validation, Some(UserValidation::MustExist));
}

#[test]
fn test_phone_change_is_single_step() {
    let policy = CodeType::PhoneChange.policy();
    assert!(policy.require_auth);
    assert_eq!(policy.channel, Channel::Sms);
    assert_eq!(policy.user_validation, None);
}

#[test]
fn test_unknown_type_has_no_policy() {
    assert!(get_policy("not_a_real_type").is_none());
    assert!(get_policy("").is_none());
    assert!(get_policy("EMAIL_REGISTER").is_none());
    assert!(get_policy(" email_register").is_none());

    assert_eq!(
        "not_a_real_type".parse::<CodeType>().unwrap_err(),
        VerificationError::UnknownCodeType {
            code_type: "not_a_real_type".to_string()
        }
    );
}

#[test]
fn test_is_valid_type_matches_get_policy() {
    let candidates = [
        "email_register",
        "email_login",
        "email_password_reset",
        "email_verify",
        "email_bind",
        "email_change",
        "phone_register",
        "phone_login",
        "phone_password_reset",
        "phone_verify",
        "phone_bind",
        "phone_change",
        "sensitive_operation",
        "not_a_real_type",
        "phone_change_old",
        "Email_Login",
        "",
    ];
    for candidate in candidates {
        assert_eq!(is_valid_type(candidate), get_policy(candidate).is_some(), "{}", candidate);
    }

    let valid = candidates.iter().filter(|c| is_valid_type(c)).count();
    assert_eq!(valid, CodeType::ALL.len());
}

#[test]
fn test_channel_matches_code_type_family() {
    for code_type in CodeType::ALL {
        let name = code_type.as_str();
        let expected = if name.starts_with("phone_") {
            Channel::Sms
        } else {
            Channel::Email
        };
        assert_eq!(code_type.policy().channel, expected, "{}", name);
    }
}
