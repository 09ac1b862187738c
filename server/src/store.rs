use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use meadow_shared::{CreateFlower, Flower, ValidationError, XRange};
use thiserror::Error;

use crate::config::SLUG_ATTEMPTS;
use crate::slug::slugify;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("slug `{0}` is already taken")]
    Conflict(String),
}

/// In-memory flower store keyed by slug. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct FlowerStore {
    flowers: DashMap<String, Flower>,
}

impl FlowerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<Flower> {
        self.flowers.get(slug).map(|entry| entry.value().clone())
    }

    /// Flowers inside `range`, ordered by x then creation time, capped at `limit`.
    pub fn list(&self, range: XRange, limit: usize) -> Vec<Flower> {
        let mut out: Vec<Flower> = self
            .flowers
            .iter()
            .filter(|entry| range.contains(entry.value().x()))
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by(|a, b| {
            a.x()
                .cmp(&b.x())
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.slug.cmp(&b.slug))
        });
        out.truncate(limit);
        out
    }

    pub fn create(&self, input: CreateFlower, now: DateTime<Utc>) -> Result<Flower, CreateError> {
        self.create_with(input, now, slugify)
    }

    /// `create` with an injectable slug generator; retries on collision.
    pub fn create_with(
        &self,
        input: CreateFlower,
        now: DateTime<Utc>,
        mut next_slug: impl FnMut(&str) -> String,
    ) -> Result<Flower, CreateError> {
        let input = input.normalized()?;
        let mut last_slug = String::new();

        for _ in 0..SLUG_ATTEMPTS {
            let slug = next_slug(&input.title);
            match self.flowers.entry(slug.clone()) {
                Entry::Occupied(_) => {
                    last_slug = slug;
                }
                Entry::Vacant(slot) => {
                    let flower = Flower {
                        slug,
                        title: input.title,
                        message: input.message,
                        author: input.author,
                        category: input.category,
                        position: input.position,
                        created_at: now,
                    };
                    slot.insert(flower.clone());
                    return Ok(flower);
                }
            }
        }

        Err(CreateError::Conflict(last_slug))
    }
}
