use crate::AuditError;
use std::fmt;

const ACCEPTED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Outcome of filtering raw input down to auditable URLs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlValidation {
    /// Accepted URLs in input order, duplicates kept
    pub urls: Vec<String>,

    /// Number of non-empty lines that were not absolute http(s) URLs
    pub rejected: usize,
}

/// Non-fatal notice that some input lines were dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationWarning {
    pub rejected: usize,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} invalid URLs removed. Only valid URLs will be audited.",
            self.rejected
        )
    }
}

impl UrlValidation {
    /// Converts the validation into a startable batch
    ///
    /// # Returns
    ///
    /// * `Ok((urls, warning))` - At least one URL was accepted; `warning` is
    ///   set when some lines were rejected
    /// * `Err(AuditError::NoValidUrls)` - Nothing auditable was supplied
    pub fn into_batch(self) -> Result<(Vec<String>, Option<ValidationWarning>), AuditError> {
        if self.urls.is_empty() {
            return Err(AuditError::NoValidUrls);
        }

        let warning = (self.rejected > 0).then_some(ValidationWarning {
            rejected: self.rejected,
        });

        Ok((self.urls, warning))
    }
}

/// Returns true if `candidate` is `http://` or `https://` followed by at least one character
pub fn is_absolute_url(candidate: &str) -> bool {
    ACCEPTED_SCHEMES.iter().any(|scheme| {
        candidate
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty())
    })
}

/// Splits raw input into lines and keeps the absolute http(s) URLs
///
/// Lines are trimmed and blank lines ignored; blank lines do not count as
/// rejected.
///
/// # Examples
///
/// ```
/// use gtm_audit::url::validate_urls;
///
/// let validation = validate_urls("https://a.com\n\nnot-a-url\n  http://b.org  ");
/// assert_eq!(validation.urls, vec!["https://a.com", "http://b.org"]);
/// assert_eq!(validation.rejected, 1);
/// ```
pub fn validate_urls(raw: &str) -> UrlValidation {
    let mut validation = UrlValidation::default();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_absolute_url(line) {
            validation.urls.push(line.to_string());
        } else {
            validation.rejected += 1;
        }
    }

    validation
}
