//! Single-field change adjudication.
//!
//! A grid edit arrives as `(old value the client saw, new value the client
//! typed)`. The verdict functions here compare those against each other and,
//! for updates, against the authoritative stored value. All inputs must
//! already be sanitized (empty cells replaced by the column default).

use serde::Serialize;
use serde_json::Value;

/// Outcome of adjudicating one proposed field change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeVerdict {
    /// The change is applied to the edit set.
    Accept,
    /// The client's view is stale: another writer changed the field first.
    Reject,
    /// Nothing to do (no actual change, or the stored value already matches).
    Nop,
}

/// Equality predicate used to compare sanitized cell values.
pub type EqualsFn = fn(&Value, &Value) -> bool;

/// `undefined`, `null` and `""` all mean "empty cell".
///
/// Grid widgets produce any of the three for a cleared cell; JSON has no
/// `undefined`, so an absent value deserializes to `Null`.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Replace an empty value with `default`.
pub fn sanitize(value: &Value, default: &Value) -> Value {
    if is_empty_value(value) {
        default.clone()
    } else {
        value.clone()
    }
}

/// Three-way check used when updating an existing record.
///
/// `stored` is `None` when the record no longer exists.
pub fn three_way(
    old: &Value,
    new: &Value,
    stored: Option<&Value>,
    equals: EqualsFn,
) -> ChangeVerdict {
    if equals(old, new) {
        return ChangeVerdict::Nop;
    }
    let Some(stored) = stored else {
        return ChangeVerdict::Reject;
    };
    if equals(new, stored) {
        return ChangeVerdict::Nop;
    }
    if !equals(old, stored) {
        return ChangeVerdict::Reject;
    }
    ChangeVerdict::Accept
}

/// Two-way check used when creating a record (there is no stored state).
pub fn two_way(old: &Value, new: &Value, equals: EqualsFn) -> ChangeVerdict {
    if equals(old, new) {
        ChangeVerdict::Nop
    } else {
        ChangeVerdict::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strict(a: &Value, b: &Value) -> bool {
        a == b
    }

    // -----------------------------------------------------------------------
    // Emptiness
    // -----------------------------------------------------------------------

    #[test]
    fn null_and_empty_string_are_empty() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("")));
    }

    #[test]
    fn zero_and_false_are_not_empty() {
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!(" ")));
    }

    #[test]
    fn sanitize_substitutes_default_for_empty() {
        assert_eq!(sanitize(&Value::Null, &json!("")), json!(""));
        assert_eq!(sanitize(&json!(""), &Value::Null), Value::Null);
        assert_eq!(sanitize(&json!("Rock"), &json!("")), json!("Rock"));
    }

    // -----------------------------------------------------------------------
    // Three-way
    // -----------------------------------------------------------------------

    #[test]
    fn unchanged_edit_is_nop() {
        let verdict = three_way(&json!("Rock"), &json!("Rock"), Some(&json!("Pop")), strict);
        assert_eq!(verdict, ChangeVerdict::Nop);
    }

    #[test]
    fn missing_record_rejects() {
        let verdict = three_way(&json!("Rock"), &json!("Jazz"), None, strict);
        assert_eq!(verdict, ChangeVerdict::Reject);
    }

    #[test]
    fn matching_baseline_accepts() {
        let verdict = three_way(&json!("Rock"), &json!("Jazz"), Some(&json!("Rock")), strict);
        assert_eq!(verdict, ChangeVerdict::Accept);
    }

    #[test]
    fn stale_baseline_rejects() {
        let verdict = three_way(&json!("Rock"), &json!("Jazz"), Some(&json!("Pop")), strict);
        assert_eq!(verdict, ChangeVerdict::Reject);
    }

    #[test]
    fn already_applied_change_is_nop() {
        // Stored value already equals the proposal, even if the baseline is stale.
        let verdict = three_way(&json!("Rock"), &json!("Jazz"), Some(&json!("Jazz")), strict);
        assert_eq!(verdict, ChangeVerdict::Nop);
    }

    #[test]
    fn repeated_submission_accepts_then_nops() {
        let mut stored = json!("Rock");
        let first = three_way(&json!("Rock"), &json!("Jazz"), Some(&stored), strict);
        assert_eq!(first, ChangeVerdict::Accept);
        stored = json!("Jazz");
        let second = three_way(&json!("Rock"), &json!("Jazz"), Some(&stored), strict);
        assert_eq!(second, ChangeVerdict::Nop);
    }

    // -----------------------------------------------------------------------
    // Two-way
    // -----------------------------------------------------------------------

    #[test]
    fn two_way_accepts_any_difference() {
        assert_eq!(two_way(&json!(""), &json!("Intro"), strict), ChangeVerdict::Accept);
        assert_eq!(two_way(&json!(""), &json!(""), strict), ChangeVerdict::Nop);
    }
}
