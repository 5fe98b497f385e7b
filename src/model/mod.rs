//! Records, write payloads and client views for users and products.

pub mod product;
pub mod user;

pub use product::{
    OwnerRef, ProductFields, ProductPatch, ProductRecord, ProductView, OWNER_FIELD, PRODUCTS,
};
pub use user::{NewUser, UserRecord, UserView, USERS};
