//! Business-DNA profile state and the merge fold that grows it.
//!
//! [`ProfileState`] is pure data: one opaque session id plus five known
//! extraction slots. [`merge`] folds a partial provider update into a
//! state, producing a new state; [`ProfileState::completeness`] derives
//! the integrity score on demand so score and state can never diverge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical slot names, in panel display order.
///
/// Single source of truth for the closed field set: merge, completeness,
/// and the console panel all iterate this list.
pub const FIELDS: [&str; 5] = [
    "niche",
    "target_audience",
    "pricing_model",
    "unique_selling_point",
    "acquisition_channel",
];

// ── ProfileState ─────────────────────────────────────────────────────────────

/// Accumulated DNA record for one session.
///
/// Unset slots serialize as `null` so a snapshot always carries the full
/// field set on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    /// Opaque per-session identifier. Generated once, never merged over,
    /// never counted as extracted data.
    pub session_id: String,
    pub niche: Option<String>,
    pub target_audience: Option<String>,
    pub pricing_model: Option<String>,
    pub unique_selling_point: Option<String>,
    pub acquisition_channel: Option<String>,
}

impl ProfileState {
    /// Fresh state with a generated session id and all slots unset.
    pub fn new() -> Self {
        Self::with_session_id(generate_session_id())
    }

    /// Fresh state under an explicit session id.
    pub fn with_session_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            niche: None,
            target_audience: None,
            pricing_model: None,
            unique_selling_point: None,
            acquisition_channel: None,
        }
    }

    /// Current value of a named slot, or `None` for unset or unknown names.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "niche" => self.niche.as_deref(),
            "target_audience" => self.target_audience.as_deref(),
            "pricing_model" => self.pricing_model.as_deref(),
            "unique_selling_point" => self.unique_selling_point.as_deref(),
            "acquisition_channel" => self.acquisition_channel.as_deref(),
            _ => None,
        }
    }

    /// Write a slot by name. Returns `false` for names outside the closed
    /// field set; the caller decides whether that is worth logging.
    fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "niche" => &mut self.niche,
            "target_audience" => &mut self.target_audience,
            "pricing_model" => &mut self.pricing_model,
            "unique_selling_point" => &mut self.unique_selling_point,
            "acquisition_channel" => &mut self.acquisition_channel,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Number of slots holding a non-empty value.
    fn set_count(&self) -> usize {
        FIELDS
            .iter()
            .filter(|name| self.field(name).is_some_and(|v| !v.is_empty()))
            .count()
    }

    /// Integrity score: percentage of the five slots that are set.
    ///
    /// Always an integer in `[0, 100]`; `100` iff every slot is set.
    /// The session id is excluded from both sides of the ratio.
    pub fn completeness(&self) -> u8 {
        (self.set_count() * 100 / FIELDS.len()) as u8
    }
}

impl Default for ProfileState {
    fn default() -> Self {
        Self::new()
    }
}

/// `SESSION_` + 9 uppercase hex characters, uuid-seeded.
fn generate_session_id() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("SESSION_{}", &hex[..9])
}

// ── merge ────────────────────────────────────────────────────────────────────

/// Fold a partial provider update into `current`, producing the new state.
///
/// Pure and total: for each known slot a non-empty value in `update`
/// replaces it, anything else preserves it. An absent key means "no new
/// information this turn", never "clear this field". Keys outside the
/// closed field set are ignored so provider drift cannot grow the record.
pub fn merge(current: &ProfileState, update: &BTreeMap<String, String>) -> ProfileState {
    let mut next = current.clone();
    for name in FIELDS {
        if let Some(value) = update.get(name) {
            if !value.is_empty() {
                next.set_field(name, value.clone());
            }
        }
    }
    next
}

// ── Tests ────────────────────────────────────────────────────────────────────
