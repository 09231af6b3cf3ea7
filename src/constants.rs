// src/constants.rs
//
// Application-wide constants.
// Each constant is documented with its purpose and usage context.

/// Maximum number of image URL resolutions in flight during one load.
///
/// Used in: `application/image_resolver.rs`, `infrastructure/config.rs`
pub const DEFAULT_RESOLVE_CONCURRENCY: usize = 8;

/// Key prefix under which uploaded images are stored.
///
/// Guest-readable objects live under `public/` in the hosted storage layout.
///
/// Used in: `infrastructure/config.rs`, `infrastructure/blob.rs`
pub const DEFAULT_BLOB_PREFIX: &str = "public/";

/// Whole-request timeout for backend calls, in seconds.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connect timeout for backend calls, in seconds.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that overrides the stored session token.
///
/// Used in: `infrastructure/session.rs`
pub const TOKEN_ENV_VAR: &str = "NOTEBOARD_TOKEN";

/// Width of rendered note images, in pixels.
///
/// Used in: `ports/html.rs`
pub const IMAGE_DISPLAY_WIDTH_PX: u32 = 400;

/// Characters of a description shown per note in the plain-text listing.
///
/// Used in: `ports/text.rs`
pub const LIST_DESCRIPTION_WIDTH: usize = 60;

/// Delay in milliseconds after opening the browser before the temp dir may go away.
///
/// The browser needs a moment to read the file before the temporary directory
/// is removed on exit.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;
