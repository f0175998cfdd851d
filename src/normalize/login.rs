//! Login response normalization: token, role and profile out of whatever the
//! auth endpoint happens to return.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::probe::{first_object, first_text, first_text_at, FieldPath};
use crate::error::{ClientError, ClientResult};
use crate::identity::{Identity, Profile, RoleTag, DEFAULT_DISPLAY_NAME, DEFAULT_DOMAIN, DEFAULT_INSTITUTION};

pub const TOKEN_PATHS: [FieldPath; 11] = [
    FieldPath::new(&["token"]),
    FieldPath::new(&["accessToken"]),
    FieldPath::new(&["jwt"]),
    FieldPath::new(&["access_token"]),
    FieldPath::new(&["authToken"]),
    FieldPath::new(&["sessionToken"]),
    FieldPath::new(&["data", "token"]),
    FieldPath::new(&["user", "token"]),
    FieldPath::new(&["result", "token"]),
    FieldPath::new(&["profile", "token"]),
    FieldPath::new(&["data", "user", "token"]),
];

pub const ROLE_PATHS: [FieldPath; 6] = [
    FieldPath::new(&["role"]),
    FieldPath::new(&["user", "role"]),
    FieldPath::new(&["data", "role"]),
    FieldPath::new(&["data", "user", "role"]),
    FieldPath::new(&["result", "role"]),
    FieldPath::new(&["profile", "role"]),
];

/// Containers that may hold the user's own fields; the root comes last.
pub const PROFILE_CONTAINERS: [FieldPath; 5] = [
    FieldPath::new(&["user"]),
    FieldPath::new(&["data"]),
    FieldPath::new(&["result"]),
    FieldPath::new(&["profile"]),
    FieldPath::new(&[]),
];

const NAME_FIELDS: [FieldPath; 4] = crate::field_paths!["fullName", "name", "displayName", "username"];
const INSTITUTION_FIELDS: [FieldPath; 4] = crate::field_paths!["institution", "organization", "university", "affiliation"];
const DOMAIN_FIELDS: [FieldPath; 4] = crate::field_paths!["domain", "field", "specialty", "researchArea"];
const EMAIL_FIELDS: [FieldPath; 1] = crate::field_paths!["email"];
const ERROR_FIELDS: [FieldPath; 2] = crate::field_paths!["error", "message"];

pub const ME_DEFAULT_INSTITUTION: &str = "Institution inconnue";

pub fn extract_token(raw: &Value) -> ClientResult<String> {
    match first_text_at(raw, &TOKEN_PATHS) {
        Some((idx, token)) => {
            debug!(target: "auth", path = %TOKEN_PATHS[idx], "token located");
            Ok(token)
        }
        None => {
            warn!(target: "auth", "login response carries no token at any known path");
            Err(ClientError::MissingToken)
        }
    }
}

pub fn extract_role(raw: &Value) -> RoleTag {
    first_text(raw, &ROLE_PATHS).map(|r| RoleTag::parse(&r)).unwrap_or(RoleTag::FALLBACK)
}

/// The object most likely to describe the user, as a JSON object value.
/// Falls back to an empty object so every field read takes its default.
pub fn profile_container(raw: &Value) -> Value {
    first_object(raw, &PROFILE_CONTAINERS)
        .map(|m| Value::Object(m.clone()))
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or("")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title-case each whitespace-separated token and rejoin with single spaces.
pub fn normalize_display_name(raw_name: &str, login_email: &str) -> String {
    let name = raw_name.split_whitespace().map(capitalize_word).collect::<Vec<_>>().join(" ");
    if name.to_lowercase() == email_local_part(login_email).to_lowercase() {
        return capitalize_first(&name);
    }
    name
}

/// Best available name for `user`, before normalization.
fn raw_display_name(user: &Value, login_email: &str) -> String {
    if let Some(n) = first_text(user, &NAME_FIELDS) {
        return n;
    }
    let first = first_text(user, &crate::field_paths!["firstName"]).unwrap_or_default();
    let last = first_text(user, &crate::field_paths!["lastName"]).unwrap_or_default();
    let joined = format!("{} {}", first, last);
    let joined = joined.trim();
    if !joined.is_empty() {
        return joined.to_string();
    }
    if let Some(email) = first_text(user, &EMAIL_FIELDS) {
        let local = email_local_part(&email);
        if !local.is_empty() {
            return local.to_string();
        }
    }
    let local = email_local_part(login_email);
    if !local.is_empty() {
        return local.to_string();
    }
    DEFAULT_DISPLAY_NAME.to_string()
}

pub fn extract_display_name(user: &Value, login_email: &str) -> String {
    normalize_display_name(&raw_display_name(user, login_email), login_email)
}

pub fn extract_profile(raw: &Value, login_email: &str) -> Profile {
    let user = profile_container(raw);
    Profile {
        display_name: extract_display_name(&user, login_email),
        institution: first_text(&user, &INSTITUTION_FIELDS).unwrap_or_else(|| DEFAULT_INSTITUTION.to_string()),
        domain: first_text(&user, &DOMAIN_FIELDS).unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
        email: first_text(&user, &EMAIL_FIELDS).unwrap_or_else(|| login_email.to_string()),
    }
}

/// Turn a login response into an [`Identity`]. Fails only when no token exists.
pub fn extract_identity(raw: &Value, login_email: &str) -> ClientResult<Identity> {
    let token = extract_token(raw)?;
    let role = extract_role(raw);
    let profile = extract_profile(raw, login_email);
    debug!(target: "auth", role = %role, name = %profile.display_name, "identity extracted");
    Ok(Identity { token, role, profile })
}

/// Where the current-user endpoint may put the user's fields; the body root comes first.
pub const CURRENT_USER_CONTAINERS: [FieldPath; 5] = [
    FieldPath::new(&[]),
    FieldPath::new(&["user"]),
    FieldPath::new(&["data"]),
    FieldPath::new(&["result"]),
    FieldPath::new(&["profile"]),
];

fn current_user_text(raw: &Value, fields: &[FieldPath]) -> Option<String> {
    CURRENT_USER_CONTAINERS
        .iter()
        .filter_map(|c| c.resolve(raw))
        .find_map(|container| first_text(container, fields))
}

/// Profile from the current-user endpoint, which only reliably carries name and institution.
pub fn extract_current_user(raw: &Value) -> Profile {
    Profile {
        display_name: current_user_text(raw, &crate::field_paths!["name"])
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
        institution: current_user_text(raw, &crate::field_paths!["institution"])
            .unwrap_or_else(|| ME_DEFAULT_INSTITUTION.to_string()),
        domain: current_user_text(raw, &DOMAIN_FIELDS).unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
        email: current_user_text(raw, &EMAIL_FIELDS).unwrap_or_default(),
    }
}

/// Server-provided explanation in an error body, if any.
pub fn extract_error_message(raw: &Value) -> Option<String> {
    first_text(raw, &ERROR_FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place(path: &FieldPath, leaf: Value) -> Value {
        path.keys().iter().rev().fold(leaf, |inner, key| {
            let mut m = Map::new();
            m.insert(key.to_string(), inner);
            Value::Object(m)
        })
    }

    #[test]
    fn token_found_at_every_candidate_path() {
        for path in TOKEN_PATHS.iter() {
            let raw = place(path, json!("tok-123"));
            assert_eq!(extract_token(&raw).unwrap(), "tok-123", "path {}", path);
        }
    }

    #[test]
    fn earlier_token_path_wins() {
        let raw = json!({
            "data": {"token": "from-data", "user": {"token": "from-data-user"}},
            "jwt": "from-jwt",
            "user": {"token": "from-user"}
        });
        assert_eq!(extract_token(&raw).unwrap(), "from-jwt");
        let raw = json!({"user": {"token": "from-user"}, "data": {"token": "from-data"}});
        assert_eq!(extract_token(&raw).unwrap(), "from-data");
    }

    #[test]
    fn missing_token_is_fatal() {
        for raw in [json!({}), json!({"token": ""}), json!({"data": {"user": {}}}), json!(null), json!([1, 2])] {
            assert_eq!(extract_identity(&raw, "a@b.c"), Err(ClientError::MissingToken));
        }
    }

    #[test]
    fn role_probing_and_fallback() {
        assert_eq!(extract_role(&json!({"data": {"user": {"role": "communicant"}}})), RoleTag::Communicant);
        assert_eq!(
            extract_role(&json!({"profile": {"role": "guest_speaker"}, "user": {"role": "super_admin"}})),
            RoleTag::SuperAdmin
        );
        assert_eq!(extract_role(&json!({"role": ""})), RoleTag::Participant);
        assert_eq!(extract_role(&json!({"role": "reviewer"})), RoleTag::Unrecognized("reviewer".into()));
    }

    #[test]
    fn profile_container_preference() {
        let raw = json!({"token": "t", "data": {"institution": "CERIST"}, "profile": {"institution": "ignored"}});
        assert_eq!(extract_profile(&raw, "x@y.z").institution, "CERIST");
        let raw = json!({"token": "t", "user": "not an object", "institution": "Root U"});
        assert_eq!(extract_profile(&raw, "x@y.z").institution, "Root U");
    }

    #[test]
    fn empty_profile_takes_every_default() {
        let p = extract_profile(&json!("opaque"), "");
        assert_eq!(p.display_name, "Utilisateur");
        assert_eq!(p.institution, "Institution non spécifiée");
        assert_eq!(p.domain, "Domaine non spécifié");
        assert_eq!(p.email, "");
    }

    #[test]
    fn name_normalization_title_cases_tokens() {
        let raw = json!({"token": "t", "user": {"fullName": "  jEAN-PIERRE   dupont "}});
        let id = extract_identity(&raw, "jean@x.com").unwrap();
        assert_eq!(id.profile.display_name, "Jean-pierre Dupont");
    }

    #[test]
    fn name_falls_back_to_login_email_local_part() {
        let id = extract_identity(&json!({"token": "t"}), "a.b@x.com").unwrap();
        assert_eq!(id.profile.display_name, "A.b");
        assert_eq!(id.profile.email, "a.b@x.com");
    }

    #[test]
    fn name_candidates_in_order() {
        let user = json!({"username": "jdoe", "displayName": "J Doe"});
        assert_eq!(extract_display_name(&user, "q@x.com"), "J Doe");
        let user = json!({"firstName": "amina", "lastName": "BELKACEM"});
        assert_eq!(extract_display_name(&user, "q@x.com"), "Amina Belkacem");
        let user = json!({"lastName": "kaci"});
        assert_eq!(extract_display_name(&user, "q@x.com"), "Kaci");
        let user = json!({"email": "sara.m@univ.dz"});
        assert_eq!(extract_display_name(&user, "other@x.com"), "Sara.m");
    }

    #[test]
    fn institution_and_domain_candidates() {
        let raw = json!({"token": "t", "user": {"university": "USTHB", "researchArea": "Radiologie", "email": "u@usthb.dz"}});
        let p = extract_identity(&raw, "typed@x.com").unwrap().profile;
        assert_eq!(p.institution, "USTHB");
        assert_eq!(p.domain, "Radiologie");
        assert_eq!(p.email, "u@usthb.dz");
    }

    #[test]
    fn current_user_defaults() {
        let p = extract_current_user(&json!({}));
        assert_eq!(p.display_name, "Utilisateur");
        assert_eq!(p.institution, "Institution inconnue");
        let p = extract_current_user(&json!({"user": {"name": "Nadia", "institution": "CHU Oran"}}));
        assert_eq!(p.display_name, "Nadia");
        assert_eq!(p.institution, "CHU Oran");
    }

    #[test]
    fn current_user_root_fields_beat_unrelated_nested_objects() {
        let p = extract_current_user(&json!({
            "name": "Yacine Benali",
            "institution": "Univ Oran",
            "data": {"lastLogin": "2026-01-02"}
        }));
        assert_eq!(p.display_name, "Yacine Benali");
        assert_eq!(p.institution, "Univ Oran");
        let p = extract_current_user(&json!({"data": {"name": "Lina", "email": "lina@x.dz"}, "institution": "CHU"}));
        assert_eq!(p.display_name, "Lina");
        assert_eq!(p.institution, "CHU");
        assert_eq!(p.email, "lina@x.dz");
    }

    #[test]
    fn blank_name_candidates_fall_through() {
        let user = json!({"fullName": "   ", "name": "\t", "email": "nour.h@x.dz"});
        assert_eq!(extract_display_name(&user, "typed@x.com"), "Nour.h");
        assert_eq!(extract_display_name(&json!({"fullName": "  "}), ""), "Utilisateur");
        let p = extract_profile(&json!({"user": {"institution": " ", "domain": ""}}), "a@b.c");
        assert_eq!(p.institution, "Institution non spécifiée");
        assert_eq!(p.domain, "Domaine non spécifié");
    }

    #[test]
    fn error_message_prefers_error_field() {
        assert_eq!(extract_error_message(&json!({"message": "m", "error": "e"})).as_deref(), Some("e"));
        assert_eq!(extract_error_message(&json!({"message": "m"})).as_deref(), Some("m"));
        assert_eq!(extract_error_message(&json!({"error": ""})), None);
    }
}
