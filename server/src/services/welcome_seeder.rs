use chrono::Utc;
use meadow_shared::{Category, CreateFlower, WorldPoint};
use tracing::{info, warn};

use crate::state::AppState;

const WELCOME_Y: i64 = 420;

/// Plant the welcome flower at the world origin so a fresh meadow is never empty.
pub fn run(state: &AppState) {
    if !state.store.is_empty() {
        return;
    }

    let input = CreateFlower {
        title: "Welcome".to_owned(),
        message: "Click anywhere on the grass to plant a flower of your own.".to_owned(),
        author: None,
        category: Category::Sunflower,
        position: WorldPoint::new(0, WELCOME_Y),
    };
    match state.store.create(input, Utc::now()) {
        Ok(flower) => info!(slug = %flower.slug, "seeded welcome flower"),
        Err(e) => warn!(error = %e, "failed to seed welcome flower"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FlowerStore;

    #[test]
    fn seeds_once_into_an_empty_store() {
        let state = AppState::new(FlowerStore::new());
        run(&state);
        run(&state);
        assert_eq!(state.store.len(), 1);
        let flowers = state.store.list(Default::default(), 10);
        assert!(flowers[0].slug.starts_with("welcome-"));
        assert_eq!(flowers[0].position, WorldPoint::new(0, WELCOME_Y));
    }
}
