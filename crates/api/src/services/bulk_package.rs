//! Bulk badge packaging into a zip archive.
//!
//! One bad record must not abort hundreds of good ones: a per-attendee
//! render failure is logged and skipped, and the final archive reports a
//! success count distinct from the attempted count.

use std::future::Future;
use std::io::{Cursor, Write};

use persistence::entities::AttendeeWithContextEntity;
use shared::sanitize::sanitize_filename_component;
use thiserror::Error;
use tracing::{info, warn};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use crate::services::badge_render::BadgeRenderError;

/// Archive assembly errors.
///
/// These cover the archive container itself; individual badge failures
/// are absorbed per entry.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Archive assembly failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished archive with its batch counts.
pub struct ArchiveOutcome {
    pub bytes: Vec<u8>,
    pub attempted: usize,
    pub succeeded: usize,
}

/// Packages per-attendee badges into one archive.
pub struct BadgeArchiveBuilder;

impl BadgeArchiveBuilder {
    /// Renders every attendee through `render` and packages the successes.
    ///
    /// `render` resolves to `Ok(None)` for the fatal exhibition-miss case
    /// and `Err` for per-attendee failures; both are skipped while the
    /// batch continues. Entry ordering follows the input list but is not
    /// significant.
    pub async fn build<F, Fut>(
        attendees: &[AttendeeWithContextEntity],
        mut render: F,
    ) -> Result<ArchiveOutcome, ArchiveError>
    where
        F: FnMut(&AttendeeWithContextEntity) -> Fut,
        Fut: Future<Output = Result<Option<Vec<u8>>, BadgeRenderError>>,
    {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut succeeded = 0usize;

        for attendee in attendees {
            match render(attendee).await {
                Ok(Some(pdf)) => {
                    zip.start_file(entry_name(attendee), options)?;
                    zip.write_all(&pdf)?;
                    succeeded += 1;
                }
                Ok(None) => {
                    warn!(
                        attendee_id = attendee.id,
                        "Exhibition missing during bulk render, entry skipped"
                    );
                }
                Err(e) => {
                    warn!(
                        attendee_id = attendee.id,
                        error = %e,
                        "Badge render failed, entry skipped"
                    );
                }
            }
        }

        let bytes = zip.finish()?.into_inner();
        info!(
            attempted = attendees.len(),
            succeeded = succeeded,
            "Badge archive assembled"
        );

        Ok(ArchiveOutcome {
            bytes,
            attempted: attendees.len(),
            succeeded,
        })
    }
}

/// Deterministic archive entry name; the attendee id keeps entries unique
/// even when sanitized names collide.
fn entry_name(attendee: &AttendeeWithContextEntity) -> String {
    let company = sanitize_filename_component(attendee.company_name.as_deref().unwrap_or("guest"));
    let person = sanitize_filename_component(&attendee.full_name);
    format!("{}_{}_{}.pdf", company, person, attendee.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn attendee(id: i64, full_name: &str, company: Option<&str>) -> AttendeeWithContextEntity {
        AttendeeWithContextEntity {
            id,
            exhibition_id: 17,
            exhibitor_id: company.map(|_| 42),
            full_name: full_name.to_string(),
            role_title: None,
            email: None,
            access_code: Some(format!("code-{id}")),
            created_at: Utc::now(),
            company_name: company.map(String::from),
            exhibition_name: "Expo".to_string(),
            exhibition_starts_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            exhibition_ends_on: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
            exhibition_location: None,
            exhibition_status: "published".to_string(),
        }
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_build_packages_all_successes() {
        let attendees = vec![
            attendee(1, "Jane Doe", Some("ACME")),
            attendee(2, "John Roe", Some("ACME")),
        ];

        let outcome = BadgeArchiveBuilder::build(&attendees, |_| async {
            Ok(Some(b"%PDF-fake".to_vec()))
        })
        .await
        .unwrap();

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(
            entry_names(&outcome.bytes),
            vec!["ACME_Jane_Doe_1.pdf", "ACME_John_Roe_2.pdf"]
        );
    }

    #[tokio::test]
    async fn test_build_skips_failed_entries_and_continues() {
        let attendees = vec![
            attendee(1, "Good One", Some("ACME")),
            attendee(2, "Bad Apple", Some("ACME")),
            attendee(3, "Good Two", Some("ACME")),
        ];

        let outcome = BadgeArchiveBuilder::build(&attendees, |a| {
            let fails = a.id == 2;
            async move {
                if fails {
                    Err(BadgeRenderError::Pdf("malformed name".to_string()))
                } else {
                    Ok(Some(b"%PDF-fake".to_vec()))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(entry_names(&outcome.bytes).len(), 2);
    }

    #[tokio::test]
    async fn test_build_skips_exhibition_miss() {
        let attendees = vec![attendee(1, "Jane Doe", Some("ACME"))];

        let outcome = BadgeArchiveBuilder::build(&attendees, |_| async { Ok(None) })
            .await
            .unwrap();

        assert_eq!(outcome.attempted, 1);
        assert_eq!(outcome.succeeded, 0);
        assert!(entry_names(&outcome.bytes).is_empty());
    }

    #[tokio::test]
    async fn test_build_empty_batch_yields_empty_archive() {
        let outcome = BadgeArchiveBuilder::build(&[], |_| async {
            Ok(Some(b"%PDF-fake".to_vec()))
        })
        .await
        .unwrap();

        assert_eq!(outcome.attempted, 0);
        assert_eq!(outcome.succeeded, 0);
        assert!(entry_names(&outcome.bytes).is_empty());
    }

    #[test]
    fn test_entry_name_for_invitee_without_company() {
        let name = entry_name(&attendee(9, "Solo Guest", None));
        assert_eq!(name, "guest_Solo_Guest_9.pdf");
    }

    #[test]
    fn test_entry_names_stay_unique_for_identical_names() {
        let first = entry_name(&attendee(1, "Jane Doe", Some("ACME")));
        let second = entry_name(&attendee(2, "Jane Doe", Some("ACME")));
        assert_ne!(first, second);
    }

    #[test]
    fn test_entry_name_sanitizes_hostile_names() {
        let name = entry_name(&attendee(3, "../..//evil", Some("A/B Corp")));
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }
}
