use crate::stations::error::LocateStationError;
use crate::types::station::{Capability, LatLon, ResolvedLocation, Station};
use haversine::{distance, Location as HaversineLocation, Units};
use log::{debug, info};
use ordered_float::OrderedFloat;
use std::fmt::Display;

/// Great-circle distance between two coordinates in kilometers (Earth radius 6371 km).
pub fn distance_km(from: LatLon, to: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: from.latitude(),
            longitude: from.longitude(),
        },
        HaversineLocation {
            latitude: to.latitude(),
            longitude: to.longitude(),
        },
        Units::Kilometers,
    )
}

/// Picks the station closest to the controller out of a vendor's candidate list.
///
/// The locator only looks at stations handed to it; it does not know how to list them.
/// Candidates lacking the required capability or listed in the skip set are ignored,
/// and a winner farther than `max_distance_km` is rejected rather than returned.
#[derive(Debug, Clone)]
pub struct StationLocator<Id> {
    max_distance_km: f64,
    skip: Vec<Id>,
    required: Option<Capability>,
}

impl<Id> StationLocator<Id>
where
    Id: Clone + PartialEq + Display,
{
    pub fn new(max_distance_km: f64) -> Self {
        Self {
            max_distance_km,
            skip: Vec::new(),
            required: None,
        }
    }

    /// Never pick any of these stations, e.g. ones known to report bogus values.
    pub fn skipping(mut self, ids: impl IntoIterator<Item = Id>) -> Self {
        self.skip.extend(ids);
        self
    }

    pub fn requiring(mut self, capability: Capability) -> Self {
        self.required = Some(capability);
        self
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    fn qualifies(&self, station: &Station<Id>) -> bool {
        if let Some(capability) = self.required {
            if !station.has(capability) {
                return false;
            }
        }
        if self.skip.contains(&station.id) {
            debug!("Skipping station {}", station.id);
            return false;
        }
        true
    }

    /// Returns the nearest qualifying station, ties going to the one listed first.
    pub fn resolve_nearest(
        &self,
        origin: LatLon,
        candidates: &[Station<Id>],
    ) -> Result<ResolvedLocation<Id>, LocateStationError> {
        let nearest = candidates
            .iter()
            .filter(|station| self.qualifies(station))
            .map(|station| (station, distance_km(origin, station.location)))
            .min_by_key(|(_, dist)| OrderedFloat(*dist));

        let Some((station, dist)) = nearest else {
            return Err(LocateStationError::NoCandidates {
                listed: candidates.len(),
            });
        };

        if dist > self.max_distance_km {
            return Err(LocateStationError::TooFar {
                id: station.id.to_string(),
                distance_km: dist,
                max_distance_km: self.max_distance_km,
            });
        }

        info!(
            "Found nearest station {} at {:.2} km from {}",
            station.id, dist, origin
        );
        Ok(ResolvedLocation {
            id: station.id.clone(),
            distance_km: dist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VILNIUS: LatLon = LatLon(54.6872, 25.2797);
    const KAUNAS: LatLon = LatLon(54.8985, 23.9036);
    const PARIS: LatLon = LatLon(48.8566, 2.3522);

    fn scenario() -> Vec<Station<String>> {
        vec![
            Station::new("A".to_string(), LatLon(54.6, 25.1)),
            Station::new("B".to_string(), LatLon(54.7, 25.3)),
        ]
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_itself() {
        let ab = distance_km(VILNIUS, KAUNAS);
        let ba = distance_km(KAUNAS, VILNIUS);
        assert!((ab - ba).abs() < 1e-9);
        assert_eq!(distance_km(VILNIUS, VILNIUS), 0.0);
        // Vilnius to Kaunas is roughly 92 km as the crow flies
        assert!(ab > 85.0 && ab < 100.0, "{}", ab);
    }

    #[test]
    fn picks_the_closer_of_two_candidates() {
        let origin = LatLon(54.65, 25.15);
        let candidates = scenario();
        let expected = if distance_km(origin, candidates[0].location)
            < distance_km(origin, candidates[1].location)
        {
            "A"
        } else {
            "B"
        };

        let resolved = StationLocator::new(20.0)
            .resolve_nearest(origin, &candidates)
            .unwrap();

        assert_eq!(resolved.id, expected);
        assert_eq!(resolved.id, "A");
        assert!(resolved.distance_km <= 20.0);
    }

    #[test]
    fn candidates_beyond_the_limit_are_not_found() {
        let err = StationLocator::new(20.0)
            .resolve_nearest(PARIS, &scenario())
            .unwrap_err();
        match err {
            LocateStationError::TooFar {
                distance_km,
                max_distance_km,
                ..
            } => {
                assert!(distance_km > 20.0);
                assert_eq!(max_distance_km, 20.0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn every_origin_outside_lithuania_is_rejected() {
        let candidates = scenario();
        let locator = StationLocator::new(20.0);
        for origin in [PARIS, LatLon(0.0, 0.0), LatLon(-33.86, 151.2), LatLon(59.33, 18.06)] {
            assert!(locator.resolve_nearest(origin, &candidates).is_err());
        }
    }

    #[test]
    fn skipped_stations_are_never_chosen() {
        let origin = LatLon(54.6, 25.1);
        let resolved = StationLocator::new(50.0)
            .skipping(["A".to_string()])
            .resolve_nearest(origin, &scenario())
            .unwrap();
        assert_eq!(resolved.id, "B");
    }

    #[test]
    fn capability_filter_applies_before_distance() {
        let candidates = vec![
            Station::new(1u32, LatLon(54.6872, 25.2797)),
            Station::new(2u32, LatLon(54.70, 25.30)).with_capability(Capability::RainSensor),
        ];
        let resolved = StationLocator::new(20.0)
            .requiring(Capability::RainSensor)
            .resolve_nearest(VILNIUS, &candidates)
            .unwrap();
        assert_eq!(resolved.id, 2);
    }

    #[test]
    fn nothing_left_after_filtering() {
        let candidates = vec![Station::new(1164u32, VILNIUS)];
        let err = StationLocator::new(20.0)
            .skipping([1164])
            .resolve_nearest(VILNIUS, &candidates)
            .unwrap_err();
        assert!(matches!(err, LocateStationError::NoCandidates { listed: 1 }));

        let err = StationLocator::<u32>::new(20.0)
            .resolve_nearest(VILNIUS, &[])
            .unwrap_err();
        assert!(matches!(err, LocateStationError::NoCandidates { listed: 0 }));
    }

    #[test]
    fn ties_keep_the_first_listed() {
        let candidates = vec![
            Station::new("first".to_string(), KAUNAS),
            Station::new("second".to_string(), KAUNAS),
        ];
        let resolved = StationLocator::new(5.0)
            .resolve_nearest(KAUNAS, &candidates)
            .unwrap();
        assert_eq!(resolved.id, "first");
    }

    #[test]
    fn result_is_the_minimum_over_many_candidates() {
        let origin = LatLon(55.0, 24.0);
        let candidates: Vec<Station<u32>> = (0..50)
            .map(|i| {
                let offset = (i as f64 - 25.0) * 0.013;
                Station::new(i, LatLon(55.0 + offset, 24.0 - offset * 0.7))
            })
            .collect();
        let resolved = StationLocator::new(20.0)
            .skipping([25])
            .resolve_nearest(origin, &candidates)
            .unwrap();

        let best = candidates
            .iter()
            .filter(|s| s.id != 25)
            .map(|s| distance_km(origin, s.location))
            .fold(f64::INFINITY, f64::min);
        assert!((resolved.distance_km - best).abs() < 1e-12);
        assert_ne!(resolved.id, 25);
    }
}
