//! Built-in dataset presented when admin mode is off, and used as the
//! fallback for absent or unreadable persisted collections.
//!
//! Records carry a fixed creation timestamp so every fallback yields
//! identical values.

use super::achievement::Achievement;
use super::project::{Project, ProjectStatus};
use super::Timestamp;
use chrono::DateTime;

/// 2024-01-01T00:00:00Z
const DEFAULT_CREATED_AT_SECS: i64 = 1_704_067_200;

fn default_created_at() -> Timestamp {
    DateTime::from_timestamp(DEFAULT_CREATED_AT_SECS, 0).unwrap_or_default()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Returns the three built-in projects (order 1..=3).
pub fn default_projects() -> Vec<Project> {
    let created_at = default_created_at();
    let project = |id: &str, order: i64, title: &str, description: &str, labels: &[&str]| {
        Project {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            tags: tags(labels),
            live_url: Some("https://example.com".to_string()),
            github_url: Some("https://github.com".to_string()),
            image_url: None,
            status: ProjectStatus::Completed,
            order,
            created_at,
        }
    };

    vec![
        project(
            "1",
            1,
            "E-Commerce Platform",
            "A full-stack e-commerce solution built with React, Node.js, and MongoDB. Features include user authentication, payment integration, and admin dashboard.",
            &["React", "Node.js", "MongoDB", "Stripe"],
        ),
        project(
            "2",
            2,
            "Task Management App",
            "A collaborative task management application with real-time updates, built using React and Firebase.",
            &["React", "Firebase", "Material-UI"],
        ),
        project(
            "3",
            3,
            "Weather Dashboard",
            "A responsive weather dashboard that displays current weather and forecasts using OpenWeatherMap API.",
            &["JavaScript", "API", "CSS3", "HTML5"],
        ),
    ]
}

/// Returns the three built-in achievements (order 1..=3).
pub fn default_achievements() -> Vec<Achievement> {
    let created_at = default_created_at();
    let achievement = |id: &str, order: i64, title: &str, description: &str| Achievement {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        certificate_url: Some(format!("https://example.com/cert{id}")),
        badge_url: None,
        order,
        created_at,
    };

    vec![
        achievement(
            "1",
            1,
            "AWS Certified Solutions Architect",
            "Professional certification demonstrating expertise in designing distributed systems on AWS.",
        ),
        achievement(
            "2",
            2,
            "React Developer Certification",
            "Advanced certification in React development and best practices.",
        ),
        achievement(
            "3",
            3,
            "Google Cloud Professional",
            "Certification in Google Cloud Platform services and architecture.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_achievements, default_projects};

    #[test]
    fn defaults_are_deterministic() {
        assert_eq!(default_projects(), default_projects());
        assert_eq!(default_achievements(), default_achievements());
    }

    #[test]
    fn defaults_have_sequential_order() {
        let orders: Vec<i64> = default_projects().iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(
            default_achievements()[2].certificate_url.as_deref(),
            Some("https://example.com/cert3")
        );
    }
}
