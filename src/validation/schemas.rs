//! Rule tables for every validated request.

use super::rules::{Check, FieldRule, Location, RuleSet};

const EMAIL: &[Check] = &[Check::String, Check::Email];
const NAME: &[Check] = &[Check::String, Check::NotBlank];
const PRODUCT_NAME: &[Check] = &[Check::String, Check::MinLength(2)];
const PRICE: &[Check] = &[Check::Number, Check::Positive];

pub const CREATE_USER: RuleSet = RuleSet::new(
    Location::Body,
    &[
        FieldRule::required("email", EMAIL, "email must be a valid email address"),
        FieldRule::required("first_name", NAME, "first_name is required"),
        FieldRule::required("last_name", NAME, "last_name is required"),
        FieldRule::required(
            "password",
            &[Check::String, Check::MinLength(8)],
            "password must have at least 8 characters",
        )
        .secret(),
        FieldRule::optional("avatar", &[Check::String], "avatar must be a string"),
    ],
);

pub const LOGIN: RuleSet = RuleSet::new(
    Location::Body,
    &[
        FieldRule::required("email", &[Check::String], "email is required"),
        FieldRule::required("password", &[Check::String], "password is required").secret(),
    ],
);

pub const CREATE_PRODUCT: RuleSet = RuleSet::new(
    Location::Body,
    &[
        FieldRule::required("name", PRODUCT_NAME, "name must have at least 2 characters"),
        FieldRule::required("year", &[Check::Integer], "year must be an integer"),
        FieldRule::optional("price", PRICE, "price must be a number greater than 0"),
        FieldRule::optional("description", &[Check::String], "description must be a string"),
        FieldRule::required("userId", &[Check::Id], "userId must be a valid id"),
    ],
);

/// Full replacement carries the same requirements as creation
pub const REPLACE_PRODUCT: RuleSet = CREATE_PRODUCT;

pub const PRODUCT_CHANGES: RuleSet = RuleSet::new(
    Location::Body,
    &[
        FieldRule::optional("name", PRODUCT_NAME, "name must have at least 2 characters"),
        FieldRule::optional("year", &[Check::Integer], "year must be an integer"),
        FieldRule::optional("price", PRICE, "price must be a number greater than 0"),
        FieldRule::optional("description", &[Check::String], "description must be a string"),
        FieldRule::optional("userId", &[Check::Id], "userId must be a valid id"),
    ],
);

pub const NOTIFY_CLIENT: RuleSet = RuleSet::new(
    Location::Body,
    &[
        FieldRule::required("clientEmail", EMAIL, "clientEmail must be a valid email address"),
        FieldRule::required("data", &[Check::Object], "data must be an object"),
        FieldRule::optional(
            "data.name",
            PRODUCT_NAME,
            "data.name must have at least 2 characters",
        ),
        FieldRule::optional("data.year", &[Check::Integer], "data.year must be an integer"),
        FieldRule::optional(
            "data.price",
            PRICE,
            "data.price must be a number greater than 0",
        ),
        FieldRule::optional(
            "data.description",
            &[Check::String],
            "data.description must be a string",
        ),
        FieldRule::optional("data.userId", &[Check::Id], "data.userId must be a valid id"),
    ],
);

pub const ID_PARAM: RuleSet = RuleSet::new(
    Location::Params,
    &[FieldRule::required("id", &[Check::Id], "id must be a valid id")],
);

pub const PAGE_QUERY: RuleSet = RuleSet::new(
    Location::Query,
    &[FieldRule::optional(
        "page",
        &[Check::PositiveIntegerText],
        "page must be an integer greater than 0",
    )],
);
