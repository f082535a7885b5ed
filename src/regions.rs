//! Region catalog: display name → geo id, loaded once per cache instance.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::{error, info};

use crate::domain::GeoId;

/// Region dataset shipped with the crate (`data/regions_and_ID.json`).
pub const BUNDLED_REGIONS: &str = include_str!("../data/regions_and_ID.json");

/// Default file name looked up by [`crate::Config`].
pub const DEFAULT_REGIONS_FILE: &str = "regions_and_ID.json";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read region dataset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse region dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the raw region JSON comes from.
pub trait RegionSource: Send + Sync {
    fn read_catalog(&self) -> Result<String, DatasetError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Region JSON read from a file on every load attempt.
#[derive(Debug, Clone)]
pub struct FileRegionSource {
    path: PathBuf,
}

impl FileRegionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegionSource for FileRegionSource {
    fn read_catalog(&self) -> Result<String, DatasetError> {
        std::fs::read_to_string(&self.path).map_err(|source| DatasetError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Region JSON compiled into the binary, e.g. [`BUNDLED_REGIONS`].
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedRegionSource(pub &'static str);

impl RegionSource for EmbeddedRegionSource {
    fn read_catalog(&self) -> Result<String, DatasetError> {
        Ok(self.0.to_owned())
    }

    fn describe(&self) -> String {
        "embedded dataset".to_owned()
    }
}

/// Parsed region dataset. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCatalog {
    by_name: BTreeMap<String, GeoId>,
    ids: HashSet<GeoId>,
}

impl RegionCatalog {
    /// Parse a flat `{"region name": id}` JSON object.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: BTreeMap<String, i64> = serde_json::from_str(json)?;
        let by_name = raw
            .into_iter()
            .map(|(name, id)| (name, GeoId::new(id)))
            .collect::<BTreeMap<_, _>>();
        let ids = by_name.values().copied().collect();
        Ok(Self { by_name, ids })
    }

    /// Whether `id` belongs to any region.
    pub fn contains(&self, id: GeoId) -> bool {
        self.ids.contains(&id)
    }

    /// Geo id of a region by its exact display name.
    pub fn id_for(&self, name: &str) -> Option<GeoId> {
        self.by_name.get(name).copied()
    }

    /// Number of distinct geo ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `(name, id)` pairs ordered by name.
    pub fn regions(&self) -> impl Iterator<Item = (&str, GeoId)> {
        self.by_name.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Lazily loaded, never refreshed region catalog.
///
/// The source is read at most once per successful load; concurrent first
/// callers block on the same initialization. A failed load is not remembered,
/// so the next call reads the source again.
pub struct RegionCodeCache {
    source: Box<dyn RegionSource>,
    catalog: OnceCell<RegionCatalog>,
}

impl fmt::Debug for RegionCodeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionCodeCache")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl RegionCodeCache {
    /// Cache over `source`; nothing is read until the first lookup.
    pub fn new(source: impl RegionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            catalog: OnceCell::new(),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileRegionSource::new(path))
    }

    /// Cache over [`BUNDLED_REGIONS`].
    pub fn bundled() -> Self {
        Self::new(EmbeddedRegionSource(BUNDLED_REGIONS))
    }

    /// Load the catalog if it is not loaded yet and return it.
    pub fn load(&self) -> Result<&RegionCatalog, DatasetError> {
        self.catalog
            .get_or_try_init(|| -> Result<RegionCatalog, DatasetError> {
                info!(source = %self.source.describe(), "loading region dataset");
                let raw = self.source.read_catalog()?;
                let catalog = RegionCatalog::from_json(&raw)?;
                info!(regions = catalog.len(), "region dataset loaded");
                Ok(catalog)
            })
            .inspect_err(|err| {
                error!(source = %self.source.describe(), error = %err, "region dataset unavailable");
            })
    }

    /// Whether `id` is a known region; loads the catalog on first use.
    pub fn is_valid(&self, id: GeoId) -> Result<bool, DatasetError> {
        Ok(self.load()?.contains(id))
    }

    /// `true` once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Source that counts how many times it was read.
    #[derive(Debug, Clone)]
    pub(crate) struct CountingSource {
        json: &'static str,
        reads: Arc<AtomicUsize>,
    }

    impl CountingSource {
        pub(crate) fn new(json: &'static str) -> Self {
            Self {
                json,
                reads: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub(crate) fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl RegionSource for CountingSource {
        fn read_catalog(&self) -> Result<String, DatasetError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.json.to_owned())
        }

        fn describe(&self) -> String {
            "counting test source".to_owned()
        }
    }

    pub(crate) const SAMPLE: &str = r#"{ "Москва": 213, "Санкт-Петербург": 2, "Россия": 225 }"#;

    #[test]
    fn load_is_idempotent_and_reads_once() {
        let source = CountingSource::new(SAMPLE);
        let cache = RegionCodeCache::new(source.clone());
        assert!(!cache.is_loaded());

        let first = cache.load().unwrap().clone();
        for _ in 0..5 {
            assert_eq!(cache.load().unwrap(), &first);
        }
        assert_eq!(source.reads(), 1);
        assert!(cache.is_loaded());
    }

    #[test]
    fn is_valid_loads_implicitly() {
        let source = CountingSource::new(SAMPLE);
        let cache = RegionCodeCache::new(source.clone());

        assert!(cache.is_valid(GeoId::new(213)).unwrap());
        assert!(!cache.is_valid(GeoId::new(123)).unwrap());
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn concurrent_first_access_reads_once() {
        let source = CountingSource::new(SAMPLE);
        let cache = Arc::new(RegionCodeCache::new(source.clone()));

        let handles = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.is_valid(GeoId::new(2)).unwrap())
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn separate_instances_own_their_cache() {
        let source = CountingSource::new(SAMPLE);
        let first = RegionCodeCache::new(source.clone());
        let second = RegionCodeCache::new(source.clone());

        first.load().unwrap();
        second.load().unwrap();
        assert_eq!(source.reads(), 2);
    }

    #[test]
    fn missing_file_is_dataset_error() {
        let cache = RegionCodeCache::from_file("/nonexistent/regions_and_ID.json");
        let err = cache.load().unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
        assert!(!cache.is_loaded());
    }

    #[test]
    fn corrupt_file_is_dataset_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"Москва\": \"not a number\" }}").unwrap();

        let cache = RegionCodeCache::from_file(file.path());
        assert!(matches!(cache.load(), Err(DatasetError::Parse(_))));
    }

    #[test]
    fn file_source_loads_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let cache = RegionCodeCache::from_file(file.path());
        let catalog = cache.load().unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.id_for("Москва"), Some(GeoId::new(213)));
        assert_eq!(
            catalog.regions().collect::<Vec<_>>(),
            vec![
                ("Москва", GeoId::new(213)),
                ("Россия", GeoId::new(225)),
                ("Санкт-Петербург", GeoId::new(2)),
            ]
        );
    }

    #[test]
    fn bundled_dataset_parses_and_knows_moscow() {
        let cache = RegionCodeCache::bundled();
        let catalog = cache.load().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.contains(GeoId::new(213)));
        assert_eq!(catalog.id_for("Санкт-Петербург"), Some(GeoId::new(2)));
    }
}
