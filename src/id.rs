//! Submission identifiers.

use uuid::Uuid;

/// Generate a new submission ID.
///
/// UUID v4: collision-resistant for the practical lifetime of the system
/// with no coordination, and never fails. The string form is used both as
/// the record-store key component and as the detail-view address.
pub fn new_submission_id() -> String {
    Uuid::new_v4().to_string()
}
