//! Host cache hierarchy discovery.
//!
//! Latency cliffs in a sweep line up with the cache sizes of the core running
//! it. On Linux those sizes are exposed per core under
//! `/sys/devices/system/cpu/cpu0/cache/index*/`. Other platforms report no
//! caches.

use std::fmt;

/// Pointer width assumed when computing page-table coverage.
pub const ADDRESS_SIZE_BYTES: u64 = 8;

/// Fallback page size when the platform does not expose one.
pub const DEFAULT_PAGE_SIZE: u64 = 4096;

/// Kind of data a cache holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// Data cache.
    Data,
    /// Instruction cache.
    Instruction,
    /// Unified data and instruction cache.
    Unified,
}

impl CacheKind {
    /// Parse the sysfs `type` attribute.
    pub fn from_sysfs(s: &str) -> Option<Self> {
        match s.trim() {
            "Data" => Some(CacheKind::Data),
            "Instruction" => Some(CacheKind::Instruction),
            "Unified" => Some(CacheKind::Unified),
            _ => None,
        }
    }

    /// Whether array reads go through this cache.
    pub fn holds_data(&self) -> bool {
        !matches!(self, CacheKind::Instruction)
    }
}

/// One level of the cache hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLevel {
    /// Level number (1 = closest to the core).
    pub level: u8,
    /// What the cache holds.
    pub kind: CacheKind,
    /// Capacity in bytes.
    pub size_bytes: u64,
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.kind {
            CacheKind::Data => "d",
            CacheKind::Instruction => "i",
            CacheKind::Unified => "",
        };
        write!(f, "L{}{}: {} bytes", self.level, suffix, self.size_bytes)
    }
}

/// Parse a sysfs cache size such as `32K`, `1024K`, `6M` or `512`.
pub fn parse_cache_size(s: &str) -> Option<u64> {
    let s = s.trim();
    let (digits, multiplier) = match s.char_indices().last()? {
        (i, 'K') | (i, 'k') => (&s[..i], 1024),
        (i, 'M') | (i, 'm') => (&s[..i], 1024 * 1024),
        (i, 'G') | (i, 'g') => (&s[..i], 1024 * 1024 * 1024),
        _ => (s, 1),
    };
    digits.trim().parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Array size beyond which the page-table entries covering the array no
/// longer fit in half of the last-level cache.
///
/// Each page-table entry (`address_size` bytes) maps `page_size` bytes, so an
/// array of `n` bytes needs `n * address_size / page_size` bytes of entries.
pub fn page_table_eviction_threshold(page_size: u64, address_size: u64, llc_bytes: u64) -> f64 {
    0.5 * (page_size as f64 / address_size as f64) * llc_bytes as f64
}

/// Largest data-holding cache, if any.
pub fn last_level(caches: &[CacheLevel]) -> Option<&CacheLevel> {
    caches
        .iter()
        .filter(|c| c.kind.holds_data())
        .max_by_key(|c| (c.level, c.size_bytes))
}

/// Detect the caches of CPU 0, ordered by level.
///
/// Returns an empty list when the information is unavailable.
pub fn detect_caches() -> Vec<CacheLevel> {
    #[cfg(target_os = "linux")]
    {
        linux::detect(std::path::Path::new(linux::SYSFS_CACHE_DIR))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Vec::new()
    }
}

#[cfg(target_os = "linux")]
pub(crate) mod linux {
    use std::fs;
    use std::path::Path;

    use super::{parse_cache_size, CacheKind, CacheLevel};

    pub(crate) const SYSFS_CACHE_DIR: &str = "/sys/devices/system/cpu/cpu0/cache";

    fn read_attr(dir: &Path, name: &str) -> Option<String> {
        fs::read_to_string(dir.join(name)).ok()
    }

    fn read_index(dir: &Path) -> Option<CacheLevel> {
        let level = read_attr(dir, "level")?.trim().parse().ok()?;
        let kind = CacheKind::from_sysfs(&read_attr(dir, "type")?)?;
        let size_bytes = parse_cache_size(&read_attr(dir, "size")?)?;
        Some(CacheLevel {
            level,
            kind,
            size_bytes,
        })
    }

    /// Read every `index*` directory under `root`.
    pub(crate) fn detect(root: &Path) -> Vec<CacheLevel> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("cache topology unavailable at {}: {}", root.display(), e);
                return Vec::new();
            }
        };

        let mut caches: Vec<CacheLevel> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("index"))
            .filter_map(|entry| read_index(&entry.path()))
            .collect();
        caches.sort_by_key(|c| (c.level, c.kind != CacheKind::Data));
        caches
    }
}
