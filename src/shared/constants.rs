/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// PHOTO FOLDERS
// =============================================================================

/// Folder for truck photos captured at loading time
pub const VEHICLE_PHOTO_FOLDER: &str = "vehicle-photos";

/// Folder for delivery photos captured at offloading time
pub const OFFLOADING_PHOTO_FOLDER: &str = "offloading-photos";

/// Folder for driver license scans
pub const DRIVER_LICENSE_FOLDER: &str = "driver-licenses";

/// Largest photo accepted, in bytes
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Image types accepted for photos
pub const ALLOWED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];
