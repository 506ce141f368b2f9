//! Curated satellites shown on the globe, keyed by NORAD catalog number.

use indexmap::IndexMap;
use std::sync::LazyLock;

use super::models::SatelliteCategory;
use SatelliteCategory::{
    Communication, EarthObservation, Navigation, Scientific, SpaceStation, Weather,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub catalog_id: &'static str,
    pub name: &'static str,
    pub category: SatelliteCategory,
}

const fn entry(catalog_id: &'static str, name: &'static str, category: SatelliteCategory) -> CatalogEntry {
    CatalogEntry {
        catalog_id,
        name,
        category,
    }
}

const ENTRIES: [CatalogEntry; 24] = [
    entry("25544", "ISS (ZARYA)", SpaceStation),
    entry("48274", "CSS (TIANHE)", SpaceStation),
    entry("20580", "Hubble Space Telescope", Scientific),
    entry("43013", "NOAA-20 (JPSS-1)", Weather),
    entry("29155", "NOAA-18", Weather),
    entry("39084", "Landsat 8", EarthObservation),
    entry("49260", "Landsat 9", EarthObservation),
    entry("36508", "SDO (Solar Dynamics)", Scientific),
    entry("28874", "GPS IIR-M 1", Navigation),
    entry("32260", "GPS IIR-M 5", Navigation),
    entry("40534", "GPS IIF-9", Navigation),
    entry("41019", "GPS IIF-11", Navigation),
    entry("36411", "GOES-15", Communication),
    entry("41866", "GOES-16", Weather),
    entry("43226", "GOES-17", Weather),
    entry("44713", "STARLINK-1007", Communication),
    entry("44714", "STARLINK-1008", Communication),
    entry("44715", "STARLINK-1009", Communication),
    entry("44716", "STARLINK-1010", Communication),
    entry("44717", "STARLINK-1011", Communication),
    entry("42962", "IRIDIUM 163", Communication),
    entry("42803", "IRIDIUM 148", Communication),
    entry("33591", "NOAA-19", Weather),
    entry("43689", "METOP-C", Weather),
];

static CATALOG: LazyLock<IndexMap<&'static str, CatalogEntry>> =
    LazyLock::new(|| ENTRIES.iter().map(|e| (e.catalog_id, *e)).collect());

/// All curated satellites in display order
pub fn curated() -> &'static IndexMap<&'static str, CatalogEntry> {
    &CATALOG
}

pub fn lookup(catalog_id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.get(catalog_id)
}
