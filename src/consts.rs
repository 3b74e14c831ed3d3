/// Provider metadata keys stripped from webhook payloads before field
/// mapping. Compared case-insensitively after key normalization.
pub const WEBFLOW_METADATA_KEYS: [&str; 22] = [
    "name",
    "site",
    "submittedat",
    "formid",
    "formname",
    "form",
    "id",
    "createdon",
    "updatedon",
    "archived",
    "draft",
    "test",
    "lastpublished",
    "lastupdated",
    "triggertype",
    "payload",
    "siteid",
    "formelementid",
    "pageid",
    "publishedpath",
    "pageurl",
    "schema",
];

/// Upper bound on the payload preview attached to extraction failures.
pub const PAYLOAD_PREVIEW_MAX_CHARS: usize = 512;

/// Category assigned when a submission carries none.
pub const DEFAULT_CATEGORY: &str = "general";

/// Issued badges stay valid for this many months.
pub const BADGE_VALIDITY_MONTHS: u32 = 3;

/// An application sitting in needs_info for longer than this gets a reminder.
pub const NEEDS_INFO_REMINDER_CUTOFF_HOURS: i64 = 48;

/// How often the reminder sweep runs.
pub const REMINDER_SWEEP_INTERVAL_SECS: u64 = 6 * 60 * 60;
