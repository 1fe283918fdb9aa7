use paylens_core::{
    Company, CompanyValidationError, Payment, PaymentValidationError, User, UserValidationError,
};
use uuid::Uuid;

#[test]
fn valid_user_passes_validation() {
    let user = User::new("Ivan", "Ivanov", "1990-03-14");
    assert!(user.validate().is_ok());
}

#[test]
fn user_with_blank_names_is_rejected() {
    let no_first = User::new("  ", "Ivanov", "1990-03-14");
    assert_eq!(
        no_first.validate(),
        Err(UserValidationError::EmptyFirstName)
    );

    let no_last = User::new("Ivan", "", "1990-03-14");
    assert_eq!(no_last.validate(), Err(UserValidationError::EmptyLastName));
}

#[test]
fn user_with_non_iso_birth_date_is_rejected() {
    let user = User::new("Ivan", "Ivanov", "14.03.1990");
    assert_eq!(
        user.validate(),
        Err(UserValidationError::InvalidBirthDate("14.03.1990".to_string()))
    );
}

#[test]
fn company_with_blank_name_is_rejected() {
    let company = Company::new("   ");
    assert_eq!(company.validate(), Err(CompanyValidationError::EmptyName));
}

#[test]
fn payment_with_non_positive_amount_is_rejected() {
    let receiver = Uuid::new_v4();

    let zero = Payment::new(0, receiver);
    assert_eq!(
        zero.validate(),
        Err(PaymentValidationError::NonPositiveAmount(0))
    );

    let negative = Payment::new(-5, receiver);
    assert_eq!(
        negative.validate(),
        Err(PaymentValidationError::NonPositiveAmount(-5))
    );
}

#[test]
fn user_serialization_keeps_nested_personal_info_shape() {
    let user = User::new("Ivan", "Ivanov", "1990-03-14");

    let json = serde_json::to_value(&user).unwrap();

    assert_eq!(json["personal_info"]["first_name"], "Ivan");
    assert_eq!(json["personal_info"]["last_name"], "Ivanov");
    assert_eq!(json["personal_info"]["birth_date"], "1990-03-14");
    assert_eq!(json["company_id"], serde_json::Value::Null);
}
