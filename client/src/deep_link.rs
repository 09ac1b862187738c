use meadow_shared::{Flower, Route};

use crate::field::Field;
use crate::navigation::NavigationPort;
use crate::store::{FlowerStore, StoreError};

/// A slug the field does not have yet. Hand it to the store and pass the
/// answer back to `DeepLinks::complete`; a newer navigation makes it stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub slug: String,
    nonce: u64,
}

/// Keeps the field's mode in step with the URL: the path the page was opened
/// at, and every back/forward afterwards. Never writes history itself.
#[derive(Debug, Default)]
pub struct DeepLinks {
    pending: Option<String>,
    nonce: u64,
}

impl DeepLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Records the page's initial route; nothing resolves until the bulk load settles.
    pub fn on_initial_path<N: NavigationPort>(&mut self, field: &Field<N>) {
        self.nonce += 1;
        self.pending = Route::parse(&field.nav().current_path())
            .slug()
            .map(str::to_owned);
    }

    /// Call once `Field::finish_bulk_load` has run, whatever its outcome.
    /// A user who started planting or inspecting meanwhile keeps their mode.
    pub fn on_bulk_load_settled<N: NavigationPort>(
        &mut self,
        field: &mut Field<N>,
    ) -> Option<Resolution> {
        let slug = self.pending.take()?;
        if !field.mode().is_browsing() {
            log::debug!("skipping deep link {slug}: already {}", field.mode().name());
            return None;
        }
        self.route_to(slug, field)
    }

    /// popstate: the browser has already moved to `path`.
    pub fn on_location_change<N: NavigationPort>(
        &mut self,
        path: &str,
        field: &mut Field<N>,
    ) -> Option<Resolution> {
        self.nonce += 1;
        if field.mode().placement_point().is_some() {
            field.browse_from_navigation();
        }

        match Route::parse(path) {
            Route::Root => {
                self.pending = None;
                field.browse_from_navigation();
                None
            }
            Route::Flower(slug) if !field.load_state().is_settled() => {
                self.pending = Some(slug);
                None
            }
            Route::Flower(slug) => self.route_to(slug, field),
        }
    }

    fn route_to<N: NavigationPort>(
        &mut self,
        slug: String,
        field: &mut Field<N>,
    ) -> Option<Resolution> {
        if let Some(flower) = field.flowers().get(&slug).cloned() {
            field.inspect_from_navigation(flower);
            return None;
        }
        log::debug!("resolving {slug} from the store");
        Some(Resolution {
            slug,
            nonce: self.nonce,
        })
    }

    /// Applies a store lookup. A fetched flower is always kept; the transition
    /// only happens if the ticket is current and the user hasn't moved on.
    /// Returns whether the field entered inspection.
    pub fn complete<N: NavigationPort>(
        &mut self,
        ticket: Resolution,
        result: Result<Flower, StoreError>,
        field: &mut Field<N>,
    ) -> bool {
        let current = ticket.nonce == self.nonce;

        match result {
            Ok(flower) => {
                field.insert_flower(flower);
                if !current {
                    log::debug!("dropping stale resolution for {}", ticket.slug);
                    return false;
                }
                if !field.mode().is_browsing() {
                    return false;
                }
                let Some(flower) = field.flowers().get(&ticket.slug).cloned() else {
                    return false;
                };
                field.inspect_from_navigation(flower)
            }
            Err(err) => {
                if current {
                    field.fail_resolution(&ticket.slug, &err);
                }
                false
            }
        }
    }

    pub async fn resolve<S: FlowerStore, N: NavigationPort>(
        &mut self,
        store: &S,
        ticket: Resolution,
        field: &mut Field<N>,
    ) -> bool {
        let result = store.get_by_slug(&ticket.slug).await;
        self.complete(ticket, result, field)
    }
}
