//! Sample catalog written when no saved collection exists.

use storage::{Event, EventId, PrincipalId};

/// Principal recorded as the creator of the sample events.
pub const SEED_CREATOR: &str = "admin";

/// The fixed sample events, in insertion order.
pub fn sample_events() -> Vec<Event> {
    vec![
        sample(
            "1",
            "Odoo x charusat",
            "A coding competition for tech students, freshers, and coding enthusiasts hosted at CHARUSAT University.",
            "Hackathon",
            ("2025-03-01", "08:00"),
            "Main Auditorium",
            "Odoo",
            "https://d8it4huxumps7.cloudfront.net/lambda-pdfs/opportunity-bannerImages/1739249773.png?d=700x400",
        ),
        sample(
            "2",
            "Spoural'25",
            "sports and cultural festival hosted by CHARUSAT University.",
            "Sports",
            ("2025-01-01", "09:00"),
            "On Campus",
            "Sports Committee",
            "https://i.ytimg.com/vi/aqJPZLRA2aA/maxresdefault.jpg",
        ),
        sample(
            "3",
            "Sanyojan-2025",
            "CHARUSAT University's alumni meet event, specifically Sanyojan-2025",
            "Cultural",
            ("2025-01-24", "06:00"),
            "College Ground",
            "Collage Management",
            "https://img.freepik.com/premium-photo/confetti-fireworks-crowd-music-festival_989072-16.jpg?semt=ais_hybrid&w=740",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    title: &str,
    description: &str,
    kind: &str,
    (date, time): (&str, &str),
    location: &str,
    organizer: &str,
    image_url: &str,
) -> Event {
    Event {
        id: EventId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        kind: kind.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        location: location.to_string(),
        organizer: organizer.to_string(),
        image_url: image_url.to_string(),
        created_by: PrincipalId::from(SEED_CREATOR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::EventType;

    #[test]
    fn test_samples_are_complete() {
        let events = sample_events();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert!(events.iter().all(|e| e.created_by.as_str() == SEED_CREATOR));
    }

    #[test]
    fn test_samples_use_known_types() {
        let types: Vec<_> = sample_events().iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            [Some(EventType::Hackathon), Some(EventType::Sports), Some(EventType::Cultural)]
        );
    }
}
