//! What the bottom sheet lists: nearby or saved places, narrowed by the
//! search box.

use serde::{Deserialize, Serialize};

use crate::Place;
use crate::algo::ProximityResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListTab {
    #[default]
    Nearby,
    Saved,
}

/// Places to show for `tab`, filtered by a case-insensitive substring match
/// of `query` on the name. A blank query keeps the whole source.
pub fn visible_places<'a>(
    tab: ListTab,
    query: &str,
    proximity: &'a ProximityResult,
    saved: &'a [Place],
) -> Vec<&'a Place> {
    let source: Box<dyn Iterator<Item = &'a Place> + 'a> = match tab {
        ListTab::Nearby => Box::new(proximity.places()),
        ListTab::Saved => Box::new(saved.iter()),
    };

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return source.collect();
    }
    source
        .filter(|place| place.name.to_lowercase().contains(&needle))
        .collect()
}

/// Tab and search text of the list, as edited by the user
#[derive(Debug, Clone, Default)]
pub struct PlaceListPresenter {
    tab: ListTab,
    query: String,
}

impl PlaceListPresenter {
    pub fn tab(&self) -> ListTab {
        self.tab
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_tab(&mut self, tab: ListTab) {
        self.tab = tab;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn visible_places<'a>(
        &self,
        proximity: &'a ProximityResult,
        saved: &'a [Place],
    ) -> Vec<&'a Place> {
        visible_places(self.tab, &self.query, proximity, saved)
    }
}
