//! Built-in field tables, one per operation.
//!
//! Messages are returned to clients verbatim.

use super::{FieldDef, Operation, RuleDef};

const PHONE_PATTERN: &str = r"^\d{2,3}-\d{3,4}-\d{4}$";
const ROLE_PATTERN: &str = r"^(customer|provider|admin)$";
const POSITIVE_INT_PATTERN: &str = r"^[1-9]\d{0,8}$";

const EMAIL: FieldDef = FieldDef::string("email")
    .required("Email is required")
    .rules(&[RuleDef::Email {
        message: "Invalid email address",
    }]);

const PASSWORD: FieldDef = FieldDef::string("password")
    .required("Password is required")
    .rules(&[RuleDef::MinLength {
        min: 6,
        message: "Password must be at least 6 characters",
    }]);

const NAME_RULES: &[RuleDef] = &[RuleDef::MinLength {
    min: 2,
    message: "Name must be at least 2 characters",
}];

const PHONE: FieldDef = FieldDef::string("phone").rules(&[RuleDef::Pattern {
    pattern: PHONE_PATTERN,
    message: "Invalid phone number format",
}]);

const ROLE: FieldDef = FieldDef::string("role").rules(&[RuleDef::Pattern {
    pattern: ROLE_PATTERN,
    message: "Role must be one of customer, provider, admin",
}]);

const IS_ACTIVE: FieldDef = FieldDef::boolean("isActive");

const LOGIN: &[FieldDef] = &[EMAIL, PASSWORD];

const REGISTER: &[FieldDef] = &[
    EMAIL,
    PASSWORD,
    FieldDef::string("name")
        .required("Name is required")
        .rules(NAME_RULES),
    PHONE,
];

const CHANGE_PASSWORD: &[FieldDef] = &[
    FieldDef::string("currentPassword")
        .required("Current password is required")
        .rules(&[RuleDef::MinLength {
            min: 1,
            message: "Current password is required",
        }]),
    FieldDef::string("newPassword")
        .required("New password is required")
        .rules(&[RuleDef::MinLength {
            min: 6,
            message: "New password must be at least 6 characters",
        }]),
];

const FORGOT_PASSWORD: &[FieldDef] = &[EMAIL];

const RESET_PASSWORD: &[FieldDef] = &[
    FieldDef::string("token")
        .required("Reset token is required")
        .rules(&[RuleDef::MinLength {
            min: 1,
            message: "Reset token is required",
        }]),
    FieldDef::string("newPassword")
        .required("New password is required")
        .rules(&[RuleDef::MinLength {
            min: 6,
            message: "Password must be at least 6 characters",
        }]),
];

const CREATE_USER: &[FieldDef] = &[
    EMAIL,
    PASSWORD,
    FieldDef::string("name")
        .required("Name is required")
        .rules(NAME_RULES),
    PHONE,
    ROLE,
    IS_ACTIVE,
];

const UPDATE_USER: &[FieldDef] = &[
    FieldDef::string("name").rules(NAME_RULES),
    PHONE,
    ROLE,
    IS_ACTIVE,
];

// Query strings only carry strings; the typed DTO parses them afterwards.
const USER_QUERY: &[FieldDef] = &[
    FieldDef::string("search"),
    ROLE,
    FieldDef::string("isActive").rules(&[RuleDef::Pattern {
        pattern: r"^(true|false)$",
        message: "isActive must be true or false",
    }]),
    FieldDef::string("page").rules(&[RuleDef::Pattern {
        pattern: POSITIVE_INT_PATTERN,
        message: "Page must be a positive integer",
    }]),
    FieldDef::string("limit").rules(&[RuleDef::Pattern {
        pattern: POSITIVE_INT_PATTERN,
        message: "Limit must be a positive integer",
    }]),
];

/// Static field table for `operation`.
#[must_use]
pub fn fields_for(operation: Operation) -> &'static [FieldDef] {
    match operation {
        Operation::Login => LOGIN,
        Operation::Register => REGISTER,
        Operation::ChangePassword => CHANGE_PASSWORD,
        Operation::ForgotPassword => FORGOT_PASSWORD,
        Operation::ResetPassword => RESET_PASSWORD,
        Operation::CreateUser => CREATE_USER,
        Operation::UpdateUser => UPDATE_USER,
        Operation::UserQuery => USER_QUERY,
    }
}
