pub mod campaign;
pub mod dashboard_settings;
pub mod lead;
pub mod profile;

use missionboard_core::error::CoreError;
use missionboard_core::validation;
use validator::{Validate, ValidationError};

/// Run the derived field checks and fold failures into a domain error.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}

fn field_error(code: &'static str, result: Result<(), CoreError>) -> Result<(), ValidationError> {
    result.map_err(|err| {
        let message = match err {
            CoreError::Validation(message) => message,
            other => other.to_string(),
        };
        ValidationError::new(code).with_message(message.into())
    })
}

pub(crate) fn title_field(title: &str) -> Result<(), ValidationError> {
    field_error("title", validation::validate_title(title))
}

pub(crate) fn info_link_field(link: &str) -> Result<(), ValidationError> {
    field_error("info_link", validation::validate_info_link(link))
}

pub(crate) fn hex_color_field(color: &str) -> Result<(), ValidationError> {
    field_error("hex_color", validation::validate_hex_color(color))
}

pub(crate) fn full_name_field(name: &str) -> Result<(), ValidationError> {
    field_error("full_name", validation::validate_full_name(name))
}
