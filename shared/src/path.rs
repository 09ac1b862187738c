/// Navigable path convention shared by the client router and the server's
/// deep-link fallback: `/` browses the meadow, `/f/<slug>` inspects a flower.
pub const ROOT_PATH: &str = "/";
pub const FLOWER_SEGMENT: &str = "f";
/// Older share links used `/m/<slug>`; they still open the flower.
pub const LEGACY_SEGMENT: &str = "m";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Flower(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        // Drop any query string or fragment the browser hands us.
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        match (segments.next(), segments.next(), segments.next()) {
            (Some(FLOWER_SEGMENT | LEGACY_SEGMENT), Some(slug), None) if is_slug(slug) => {
                Route::Flower(slug.to_owned())
            }
            _ => Route::Root,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Root => ROOT_PATH.to_owned(),
            Route::Flower(slug) => flower_path(slug),
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            Route::Root => None,
            Route::Flower(slug) => Some(slug),
        }
    }
}

pub fn flower_path(slug: &str) -> String {
    format!("/{FLOWER_SEGMENT}/{slug}")
}

/// Slugs are lowercase ASCII alphanumerics separated by single dashes.
pub fn is_slug(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= 64
        && !raw.starts_with('-')
        && !raw.ends_with('-')
        && !raw.contains("--")
        && raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
