//! Entity traits: identity + continuity across state changes.

use chrono::{DateTime, Duration, Utc};

use crate::id::CompanyId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity owned by one company (tenant).
pub trait CompanyScoped: Entity {
    fn company_id(&self) -> CompanyId;
}

/// A company-scoped entity carrying a human-facing sequence number.
///
/// Numbers start at 1 and are unique per company.
pub trait Sequenced: CompanyScoped {
    fn number(&self) -> u32;
}

/// Next `updated_at` value for a mutation happening at `now`.
///
/// Always strictly after `previous`, even when the clock has not advanced
/// (or went backwards) since the last write.
pub fn bump_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_is_strictly_monotonic() {
        let t = Utc::now();
        assert!(bump_timestamp(t, t) > t);
        assert!(bump_timestamp(t, t - Duration::seconds(5)) > t);
        let later = t + Duration::seconds(1);
        assert_eq!(bump_timestamp(t, later), later);
    }
}
