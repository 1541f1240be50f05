//! Event form parsing and validation.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use storage::{EventPatch, EventType, NewEvent, Principal};

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 100;
const DESCRIPTION_MIN: usize = 10;
const LOCATION_MIN: usize = 3;
const ORGANIZER_MIN: usize = 3;

/// Check a complete draft before it reaches the store.
pub fn validate_draft(draft: &NewEvent) -> Result<()> {
    check_title(&draft.title)?;
    check_min("description", &draft.description, DESCRIPTION_MIN)?;
    check_min("location", &draft.location, LOCATION_MIN)?;
    check_min("organizer", &draft.organizer, ORGANIZER_MIN)?;
    check_image_url(&draft.image_url)
}

/// Check the fields a patch sets.
pub fn validate_patch(patch: &EventPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(Error::EmptyPatch);
    }
    if let Some(title) = &patch.title {
        check_title(title)?;
    }
    if let Some(description) = &patch.description {
        check_min("description", description, DESCRIPTION_MIN)?;
    }
    if let Some(location) = &patch.location {
        check_min("location", location, LOCATION_MIN)?;
    }
    if let Some(organizer) = &patch.organizer {
        check_min("organizer", organizer, ORGANIZER_MIN)?;
    }
    if let Some(url) = &patch.image_url {
        check_image_url(url)?;
    }
    Ok(())
}

fn check_title(title: &str) -> Result<()> {
    check_min("title", title, TITLE_MIN)?;
    if title.chars().count() > TITLE_MAX {
        return Err(Error::InvalidField {
            field: "title",
            message: format!("must be at most {TITLE_MAX} characters"),
        });
    }
    Ok(())
}

fn check_min(field: &'static str, value: &str, min: usize) -> Result<()> {
    if value.trim().chars().count() < min {
        return Err(Error::InvalidField {
            field,
            message: format!("must be at least {min} characters"),
        });
    }
    Ok(())
}

fn check_image_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Ok(());
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') && !url.contains(char::is_whitespace) => Ok(()),
        _ => Err(Error::InvalidField {
            field: "image URL",
            message: "must be empty or an http(s) URL".to_string(),
        }),
    }
}

/// Organizer recorded when the form leaves it blank.
///
/// A display name too short to pass validation falls back to the email.
pub fn default_organizer(principal: &Principal) -> String {
    if principal.name.trim().chars().count() >= ORGANIZER_MIN {
        return principal.name.clone();
    }
    principal
        .email
        .clone()
        .unwrap_or_else(|| principal.name.clone())
}

/// Canonical name of a category, matched case-insensitively.
pub fn parse_event_type(raw: &str) -> std::result::Result<String, String> {
    raw.parse::<EventType>()
        .map(|kind| kind.name().to_string())
        .map_err(|_| {
            let names: Vec<_> = EventType::ALL.iter().map(|t| t.name()).collect();
            format!("expected one of: {}", names.join(", "))
        })
}

/// Check `raw` is a calendar date and keep it as typed.
pub fn parse_date(raw: &str) -> std::result::Result<String, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|_| raw.to_string())
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Check `raw` is a wall-clock time and keep it as typed.
pub fn parse_time(raw: &str) -> std::result::Result<String, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|_| raw.to_string())
        .map_err(|e| format!("expected HH:MM: {e}"))
}

/// Long form of a stored date, or the stored text if it is not a date.
pub fn display_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%a, %b %-d %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewEvent {
        NewEvent {
            title: "Robotics 101".to_string(),
            description: "Hands-on robotics workshop".to_string(),
            kind: "Workshop".to_string(),
            date: "2025-02-14".to_string(),
            time: "14:30".to_string(),
            location: "Lab 4".to_string(),
            organizer: "Robotics Club".to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_valid_draft() {
        validate_draft(&draft()).unwrap();
        let with_image = NewEvent {
            image_url: "https://example.com/banner.png".to_string(),
            ..draft()
        };
        validate_draft(&with_image).unwrap();
    }

    #[test]
    fn test_title_bounds() {
        let short = NewEvent { title: "Hi".to_string(), ..draft() };
        assert!(matches!(validate_draft(&short), Err(Error::InvalidField { field: "title", .. })));

        let long = NewEvent { title: "x".repeat(101), ..draft() };
        assert!(matches!(validate_draft(&long), Err(Error::InvalidField { field: "title", .. })));
    }

    #[test]
    fn test_short_description() {
        let bad = NewEvent { description: "Too short".to_string(), ..draft() };
        assert!(matches!(
            validate_draft(&bad),
            Err(Error::InvalidField { field: "description", .. })
        ));
    }

    #[test]
    fn test_image_url_must_be_http() {
        for url in ["ftp://example.com/a.png", "example.com", "https://", "https:// x"] {
            let bad = NewEvent { image_url: url.to_string(), ..draft() };
            assert!(validate_draft(&bad).is_err(), "{url}");
        }
    }

    #[test]
    fn test_patch_checks_only_set_fields() {
        let patch = EventPatch { title: Some("New title".to_string()), ..Default::default() };
        validate_patch(&patch).unwrap();

        let bad = EventPatch { organizer: Some("X".to_string()), ..Default::default() };
        assert!(validate_patch(&bad).is_err());

        assert!(matches!(validate_patch(&EventPatch::default()), Err(Error::EmptyPatch)));
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_event_type("hackathon").unwrap(), "Hackathon");
        assert!(parse_event_type("Picnic").unwrap_err().contains("Sports"));
        assert_eq!(parse_time("08:00").unwrap(), "08:00");
        assert_eq!(parse_time("08:00:30").unwrap(), "08:00:30");
        assert!(parse_time("25:00").is_err());
        assert_eq!(parse_date("2025-03-01").unwrap(), "2025-03-01");
        assert!(parse_date("01/03/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_display_date_keeps_unparsed_text() {
        assert_eq!(display_date("2025-03-01"), "Sat, Mar 1 2025");
        assert_eq!(display_date("2025-02-30"), "2025-02-30");
    }

    #[test]
    fn test_short_name_organizer_uses_email() {
        let short = Principal::new("u1", "al").with_email("al@x.io");
        assert_eq!(default_organizer(&short), "al@x.io");
        let event = NewEvent { organizer: default_organizer(&short), ..draft() };
        validate_draft(&event).unwrap();

        let named = Principal::new("u2", "alice").with_email("alice@x.io");
        assert_eq!(default_organizer(&named), "alice");
    }
}
