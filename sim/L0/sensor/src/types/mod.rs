//! Core type definitions shared by the sensor stages.
//!
//! Enums, read-set flags, options, Model, Data, and contacts.

pub(crate) mod contact_types;
pub(crate) mod data;
pub(crate) mod enums;
pub(crate) mod model;
mod model_factories;
mod model_init;
pub(crate) mod options;
pub(crate) mod quantities;

pub use contact_types::Contact;
pub use data::Data;
pub use enums::*;
pub use model::Model;
pub use options::{SimOptions, disabled};
pub use quantities::Quantities;
