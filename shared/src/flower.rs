use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 60;
pub const MAX_MESSAGE_CHARS: usize = 500;
pub const MAX_AUTHOR_CHARS: usize = 40;

/// A point in world space. `x` is unbounded along the meadow; `y` is the
/// vertical position inside the plantable band and maps 1:1 to screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: i64,
    pub y: i64,
}

impl WorldPoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// The closed set of flower kinds a visitor can plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Daisy,
    Tulip,
    Rose,
    Sunflower,
    Lily,
    Poppy,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Daisy,
        Category::Tulip,
        Category::Rose,
        Category::Sunflower,
        Category::Lily,
        Category::Poppy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Daisy => "daisy",
            Category::Tulip => "tulip",
            Category::Rose => "rose",
            Category::Sunflower => "sunflower",
            Category::Lily => "lily",
            Category::Poppy => "poppy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Daisy => "Daisy",
            Category::Tulip => "Tulip",
            Category::Rose => "Rose",
            Category::Sunflower => "Sunflower",
            Category::Lily => "Lily",
            Category::Poppy => "Poppy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown flower category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(raw.to_owned()))
    }
}

/// A planted flower as stored and served by the meadow store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    pub slug: String,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Category,
    pub position: WorldPoint,
    pub created_at: DateTime<Utc>,
}

impl Flower {
    pub fn x(&self) -> i64 {
        self.position.x
    }

    pub fn y(&self) -> i64 {
        self.position.y
    }

    /// Author name for display, falling back to "anonymous".
    pub fn byline(&self) -> &str {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or("anonymous")
    }
}

/// Body of a create request. The store assigns `slug` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFlower {
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Category,
    pub position: WorldPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a title is required")]
    MissingTitle,
    #[error("a message is required")]
    MissingMessage,
    #[error("title is longer than {MAX_TITLE_CHARS} characters")]
    TitleTooLong,
    #[error("message is longer than {MAX_MESSAGE_CHARS} characters")]
    MessageTooLong,
    #[error("author is longer than {MAX_AUTHOR_CHARS} characters")]
    AuthorTooLong,
}

impl CreateFlower {
    /// Trim free-text fields and check required/length constraints.
    /// An author that is blank after trimming becomes `None`.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_owned();
        self.message = self.message.trim().to_owned();
        self.author = self
            .author
            .map(|a| a.trim().to_owned())
            .filter(|a| !a.is_empty());

        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.message.is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(ValidationError::TitleTooLong);
        }
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong);
        }
        if self
            .author
            .as_ref()
            .is_some_and(|a| a.chars().count() > MAX_AUTHOR_CHARS)
        {
            return Err(ValidationError::AuthorTooLong);
        }
        Ok(self)
    }
}

/// Inclusive world-space x-range used to narrow `list` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct XRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_x: Option<i64>,
}

impl XRange {
    pub fn contains(&self, x: i64) -> bool {
        self.min_x.is_none_or(|min| x >= min) && self.max_x.is_none_or(|max| x <= max)
    }

    pub fn to_query(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(min) = self.min_x {
            parts.push(format!("min_x={min}"));
        }
        if let Some(max) = self.max_x {
            parts.push(format!("max_x={max}"));
        }
        parts.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, message: &str, author: Option<&str>) -> CreateFlower {
        CreateFlower {
            title: title.to_owned(),
            message: message.to_owned(),
            author: author.map(str::to_owned),
            category: Category::Tulip,
            position: WorldPoint::new(10, 20),
        }
    }

    #[test]
    fn normalized_trims_and_drops_blank_author() {
        let out = input("  Hello  ", " hi there ", Some("   "))
            .normalized()
            .expect("valid input");
        assert_eq!(out.title, "Hello");
        assert_eq!(out.message, "hi there");
        assert_eq!(out.author, None);
    }

    #[test]
    fn normalized_rejects_missing_fields() {
        assert_eq!(
            input(" ", "msg", None).normalized(),
            Err(ValidationError::MissingTitle)
        );
        assert_eq!(
            input("title", "\n", None).normalized(),
            Err(ValidationError::MissingMessage)
        );
    }

    #[test]
    fn normalized_enforces_length_limits() {
        let long_title = "x".repeat(MAX_TITLE_CHARS + 1);
        assert_eq!(
            input(&long_title, "m", None).normalized(),
            Err(ValidationError::TitleTooLong)
        );
        let long_author = "a".repeat(MAX_AUTHOR_CHARS + 1);
        assert_eq!(
            input("t", "m", Some(&long_author)).normalized(),
            Err(ValidationError::AuthorTooLong)
        );
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Sunflower".parse::<Category>(), Ok(Category::Sunflower));
        assert!("cactus".parse::<Category>().is_err());
    }

    #[test]
    fn flower_json_uses_lowercase_category() {
        let flower = Flower {
            slug: "hello-abc123".into(),
            title: "Hello".into(),
            message: "world".into(),
            author: None,
            category: Category::Poppy,
            position: WorldPoint::new(-5, 40),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp"),
        };
        let json = serde_json::to_value(&flower).expect("serialize flower");
        assert_eq!(json["category"], "poppy");
        assert!(json.get("author").is_none());
        let back: Flower = serde_json::from_value(json).expect("deserialize flower");
        assert_eq!(back, flower);
    }

    #[test]
    fn x_range_contains_is_inclusive_and_open_ended() {
        let range = XRange {
            min_x: Some(-10),
            max_x: Some(10),
        };
        assert!(range.contains(-10));
        assert!(range.contains(10));
        assert!(!range.contains(11));
        assert!(XRange::default().contains(i64::MIN));
        assert_eq!(range.to_query(), "min_x=-10&max_x=10");
    }

    #[test]
    fn byline_falls_back_to_anonymous() {
        let mut flower = Flower {
            slug: "s".into(),
            title: "t".into(),
            message: "m".into(),
            author: Some("  ".into()),
            category: Category::Daisy,
            position: WorldPoint::default(),
            created_at: Utc::now(),
        };
        assert_eq!(flower.byline(), "anonymous");
        flower.author = Some("Ada".into());
        assert_eq!(flower.byline(), "Ada");
    }
}
