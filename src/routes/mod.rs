/// Router Module Index
///
/// Splits the application's routing into security-segregated modules so access
/// control is applied explicitly at the module level (via Axum layers) rather
/// than per-handler, preventing accidental exposure of protected endpoints.

/// Routes accessible to all visitors (reads plus the public enquiry form).
/// Listing handlers must enforce `is_active=true` at the Repository level.
pub mod public;

/// Content-management routes restricted to the 'admin' role claim, gated by
/// the `AdminUser` extractor middleware.
pub mod admin;
