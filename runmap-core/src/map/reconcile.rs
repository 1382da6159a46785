//! Keyed diff between the live marker set and a new target place set.

use hashbrown::{HashMap, HashSet};

use super::provider::{MarkerHandle, MarkerKind, MarkerSpec};
use crate::{Place, PlaceId};

/// A marker currently shown on the map
#[derive(Debug, Clone)]
pub(crate) struct PlacedMarker {
    pub(crate) handle: MarkerHandle,
    pub(crate) spec: MarkerSpec,
}

/// Provider calls needed to turn the live markers into the target set
#[derive(Debug, Default)]
pub(crate) struct ReconcilePlan<'a> {
    pub(crate) remove: Vec<PlaceId>,
    pub(crate) update: Vec<(&'a Place, MarkerSpec)>,
    pub(crate) create: Vec<(&'a Place, MarkerSpec)>,
    pub(crate) unchanged: usize,
}

pub(crate) fn marker_spec(place: &Place) -> MarkerSpec {
    MarkerSpec {
        kind: MarkerKind::Place(place.kind),
        position: place.coordinates,
        label: place.name.clone(),
    }
}

/// Plans the reconciliation. Duplicate ids in `target` keep their first
/// occurrence.
pub(crate) fn plan<'a>(
    existing: &HashMap<PlaceId, PlacedMarker>,
    target: &'a [Place],
) -> ReconcilePlan<'a> {
    let mut plan = ReconcilePlan::default();
    let mut seen: HashSet<&str> = HashSet::with_capacity(target.len());

    for place in target {
        if !seen.insert(place.id.as_str()) {
            continue;
        }
        let spec = marker_spec(place);
        match existing.get(&place.id) {
            Some(marker) if marker.spec == spec => plan.unchanged += 1,
            Some(_) => plan.update.push((place, spec)),
            None => plan.create.push((place, spec)),
        }
    }

    plan.remove = existing
        .keys()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();

    plan
}
