//! Station selection: from a geographic point to one playable station.
//!
//! Selection walks the cached place catalog by distance, gathers the
//! channel lists of the nearest places until a station budget is met,
//! then picks one channel according to the configured mode.

use crate::cache::PlaceCache;
use crate::client::DirectoryClient;
use crate::error::{Error, Result};
use crate::models::{Channel, Place, SelectedStation};
use gtgeo::GeoPoint;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of candidate stations to gather per selection
pub const DEFAULT_STATION_BUDGET: usize = 20;

/// How the final channel is picked from the gathered candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// First channel of the nearest place that has any
    Nearest,
    /// Same pick as nearest; the directory orders channels by popularity
    Popular,
    /// Uniform choice over all gathered candidates
    #[default]
    Random,
}

/// Selects a station for a geographic point.
pub struct StationFinder {
    client: DirectoryClient,
    cache: PlaceCache,
    budget: usize,
    mode: SelectionMode,
}

impl StationFinder {
    pub fn new(client: DirectoryClient, cache_ttl: Duration, budget: usize, mode: SelectionMode) -> Self {
        Self {
            client,
            cache: PlaceCache::new(cache_ttl),
            budget,
            mode,
        }
    }

    /// Select one playable station near `point`.
    ///
    /// Places whose channel list cannot be fetched are logged and
    /// skipped; the selection fails only when the catalog itself is
    /// unavailable or no channel at all could be gathered.
    pub async fn select(&mut self, point: GeoPoint) -> Result<SelectedStation> {
        let places = self.cache.ensure_fresh(&self.client).await?;
        let ranked = rank_by_distance(&places, point);
        let picked = take_within_budget(&ranked, self.budget);
        let Some(nearest) = picked.first().copied() else {
            return Err(Error::NoPlacesFound {
                latitude: point.latitude,
                longitude: point.longitude,
            });
        };
        debug!(
            "Considering {} places near ({:.2}, {:.2})",
            picked.len(),
            point.latitude,
            point.longitude
        );

        let mut channels: Vec<Channel> = Vec::new();
        let last_index = picked.len() - 1;
        for (index, place) in picked.iter().enumerate() {
            match self.client.place_channels(&place.id).await {
                Ok(items) => extend_capped(&mut channels, items, index == last_index, self.budget),
                Err(e) => warn!("Failed to fetch channels for {}: {e}", place.title),
            }
        }

        let channel = pick_channel(&channels, self.mode).ok_or(Error::NoChannelsFound {
            latitude: point.latitude,
            longitude: point.longitude,
        })?;

        let station_id = channel.station_id().to_string();
        let stream_url = self.client.resolve_stream_url(&station_id).await;

        Ok(SelectedStation {
            station_id,
            station_name: channel.page.title.clone(),
            location: nearest.title.clone(),
            country: nearest.country.clone(),
            stream_url,
        })
    }
}

/// Order places by distance to `point`, nearest first. The sort is
/// stable, so equidistant places keep their catalog order.
fn rank_by_distance<'a>(places: &'a [Place], point: GeoPoint) -> Vec<&'a Place> {
    let mut ranked: Vec<(f64, &Place)> = places
        .iter()
        .map(|place| (point.distance_km(place.location()), place))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().map(|(_, place)| place).collect()
}

/// Walk the ranked places, accumulating announced sizes until the
/// budget is met. The budget check runs before each place is taken, so
/// the nearest place is always included and the total may overshoot by
/// at most one place.
fn take_within_budget<'a>(ranked: &[&'a Place], budget: usize) -> Vec<&'a Place> {
    let mut picked = Vec::new();
    let mut total: usize = 0;
    for place in ranked {
        if total >= budget {
            break;
        }
        picked.push(*place);
        total += place.size as usize;
    }
    picked
}

/// Add a place's channels to the aggregate. The last place is sampled
/// down so the aggregate never exceeds the budget.
fn extend_capped(channels: &mut Vec<Channel>, items: Vec<Channel>, is_last_place: bool, budget: usize) {
    let remaining = budget.saturating_sub(channels.len());
    if is_last_place && items.len() > remaining {
        let mut rng = rand::rng();
        channels.extend(items.choose_multiple(&mut rng, remaining).cloned());
    } else {
        channels.extend(items);
    }
}

fn pick_channel(channels: &[Channel], mode: SelectionMode) -> Option<&Channel> {
    match mode {
        SelectionMode::Nearest | SelectionMode::Popular => channels.first(),
        SelectionMode::Random => channels.choose(&mut rand::rng()),
    }
}
