//! Tolerant readers for backend payloads whose shape is not under our control.
//! Nothing here fails except token extraction on the login path.

mod login;
mod probe;
mod records;

pub use login::{
    extract_current_user, extract_display_name, extract_error_message, extract_identity, extract_profile,
    extract_role, extract_token, normalize_display_name, profile_container, PROFILE_CONTAINERS, ROLE_PATHS,
    TOKEN_PATHS,
};
pub use probe::{as_text, first_array, first_number, first_object, first_text, first_text_at, FieldPath};
pub use records::{extract_evaluation, extract_record, extract_records, extract_review, RECORD_LIST_PATHS};
