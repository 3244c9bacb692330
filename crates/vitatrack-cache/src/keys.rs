//! Cache key naming.
//!
//! Key shapes are wire-compatible with the deployed system: every format
//! here must be reproduced exactly, or existing deployments orphan the
//! entries already stored under the old shape.
//!
//! - `session:<identity>` - session token entries
//! - `healthData:<identity>` - health snapshot entries
//! - `calorie:<bmiBucket>:<conditions|none>` - memoized recommendations
//! - `cache:<identity>:<path>` - generic request-cache entries
//! - `perf:test` - diagnostic probe marker

/// Diagnostic probe key.
pub const PERF_PROBE_KEY: &str = "perf:test";

/// Width of a BMI bucket.
pub const BMI_BUCKET_WIDTH: f64 = 2.5;

/// Key for a session entry.
#[must_use]
pub fn session(identity: &str) -> String {
    format!("session:{identity}")
}

/// Key for a cached health snapshot.
#[must_use]
pub fn profile(identity: &str) -> String {
    format!("healthData:{identity}")
}

/// Key for a generic request-cache entry.
#[must_use]
pub fn request(identity: &str, path: &str) -> String {
    format!("cache:{identity}:{path}")
}

/// Prefix covering every request-cache entry of one identity.
#[must_use]
pub fn request_prefix(identity: &str) -> String {
    format!("cache:{identity}:")
}

/// Quantizes a BMI into its bucket.
///
/// Similar-but-distinct profiles intentionally land in the same bucket so
/// they share one memoized recommendation: 23.1 and 24.9 both map to 22.5.
#[must_use]
pub fn bmi_bucket(bmi: f64) -> f64 {
    (bmi / BMI_BUCKET_WIDTH).floor() * BMI_BUCKET_WIDTH
}

/// Key for a memoized recommendation.
///
/// The condition set is trimmed, deduplicated, and sorted so every caller
/// with the same semantic profile produces the same key; an empty set
/// prints as `none`.
#[must_use]
pub fn recommendation(bmi: f64, conditions: &[String]) -> String {
    let bucket = format_bucket(bmi_bucket(bmi));
    let normalized = normalize_conditions(conditions);
    let suffix = if normalized.is_empty() {
        "none".to_string()
    } else {
        normalized.join(",")
    };
    format!("calorie:{bucket}:{suffix}")
}

/// Buckets are multiples of 2.5; whole numbers print without a decimal
/// point (`25`, not `25.0`) to match the deployed key shapes.
fn format_bucket(bucket: f64) -> String {
    if bucket.fract() == 0.0 {
        format!("{bucket:.0}")
    } else {
        format!("{bucket:.1}")
    }
}

fn normalize_conditions(conditions: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = conditions
        .iter()
        .map(|condition| condition.trim().to_string())
        .filter(|condition| !condition.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_identity_key_shapes() {
        assert_eq!(session("alice"), "session:alice");
        assert_eq!(profile("alice"), "healthData:alice");
        assert_eq!(
            request("alice", "/api/meals/daily"),
            "cache:alice:/api/meals/daily"
        );
        assert_eq!(request_prefix("alice"), "cache:alice:");
    }

    #[test]
    fn test_bmi_bucketing() {
        assert_eq!(bmi_bucket(24.9), 22.5);
        assert_eq!(bmi_bucket(23.1), 22.5);
        assert_eq!(bmi_bucket(22.5), 22.5);
        assert_eq!(bmi_bucket(25.0), 25.0);
        assert_eq!(bmi_bucket(0.0), 0.0);
    }

    #[test]
    fn test_nearby_bmis_collide() {
        let key1 = recommendation(24.9, &conditions(&["diabetes"]));
        let key2 = recommendation(23.1, &conditions(&["diabetes"]));
        assert_eq!(key1, key2);
        assert_eq!(key1, "calorie:22.5:diabetes");
    }

    #[test]
    fn test_whole_buckets_print_without_decimal() {
        assert_eq!(recommendation(25.1, &[]), "calorie:25:none");
        assert_eq!(recommendation(19.9, &[]), "calorie:17.5:none");
    }

    #[test]
    fn test_conditions_are_sorted_and_deduplicated() {
        let key = recommendation(
            24.0,
            &conditions(&["hypertension", "diabetes", "hypertension", " diabetes "]),
        );
        assert_eq!(key, "calorie:22.5:diabetes,hypertension");
    }

    #[test]
    fn test_empty_conditions_print_as_none() {
        assert_eq!(recommendation(24.0, &[]), "calorie:22.5:none");
        assert_eq!(
            recommendation(24.0, &conditions(&["", "  "])),
            "calorie:22.5:none"
        );
    }

    #[test]
    fn test_condition_order_is_irrelevant() {
        let key1 = recommendation(24.0, &conditions(&["a", "b"]));
        let key2 = recommendation(24.0, &conditions(&["b", "a"]));
        assert_eq!(key1, key2);
    }
}
