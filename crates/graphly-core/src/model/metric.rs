// ── Availability marker ──
//
// Every collected section is wrapped in `Metric<T>` so downstream stages
// (and the exported report) can tell "zero usage" apart from "collection
// failed". Absence is explicit, never a silent zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Metric<T> {
    /// The section was collected successfully.
    Available(T),
    /// The collection call failed; the failure was logged and the run
    /// continued with this section degraded.
    Unavailable,
}

impl<T> Metric<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Metric<U> {
        match self {
            Self::Available(v) => Metric::Available(f(v)),
            Self::Unavailable => Metric::Unavailable,
        }
    }
}

impl<T: Default> Metric<T> {
    /// The collected value, or `T::default()` for a degraded section.
    pub fn value_or_default(self) -> T {
        match self {
            Self::Available(v) => v,
            Self::Unavailable => T::default(),
        }
    }
}

impl<T> From<Option<T>> for Metric<T> {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Unavailable, Self::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_status_tag() {
        let m = Metric::Available(3u32);
        let json = serde_json::to_string(&m).expect("serialize");
        assert_eq!(json, r#"{"status":"available","value":3}"#);

        let u: Metric<u32> = Metric::Unavailable;
        let json = serde_json::to_string(&u).expect("serialize");
        assert_eq!(json, r#"{"status":"unavailable"}"#);
    }

    #[test]
    fn round_trips() {
        let m: Metric<Vec<u8>> =
            serde_json::from_str(r#"{"status":"available","value":[1,2]}"#).expect("deserialize");
        assert_eq!(m, Metric::Available(vec![1, 2]));
    }
}
