use super::{ELASTIC_CAP, ELASTIC_FACTOR, OFFSET_THRESHOLD, VELOCITY_THRESHOLD};
use strum::Display as StrumDisplay;

/// Outcome of a released drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Gesture {
    /// Content pulled left: same as "next".
    Advance,
    /// Content pulled right: same as "prev".
    Retreat,
    /// Below both thresholds: snap back.
    Ignore,
}

impl Gesture {
    /// Classifies a released drag by its total horizontal offset and release
    /// velocity (units per second). Either threshold alone commits the slide;
    /// the direction always follows the sign of the offset. Non-finite input
    /// is ignored.
    pub fn classify(offset_x: f32, velocity_x: f32) -> Self {
        if !offset_x.is_finite() || !velocity_x.is_finite() {
            return Self::Ignore;
        }

        let committed = offset_x.abs() > OFFSET_THRESHOLD || velocity_x.abs() > VELOCITY_THRESHOLD;
        if !committed {
            return Self::Ignore;
        }

        // a pure flick with no displacement carries its direction in the velocity
        let sign = if offset_x != 0.0 { offset_x } else { velocity_x };
        if sign < 0.0 {
            Self::Advance
        } else {
            Self::Retreat
        }
    }
}

/// Visual displacement for an in-progress drag.
///
/// Tracks the finger one-to-one up to a full slide `span`, then resists with
/// [`ELASTIC_FACTOR`] and never exceeds `ELASTIC_CAP * span`.
pub fn elastic_offset(offset_x: f32, span: f32) -> f32 {
    if !offset_x.is_finite() || !span.is_finite() || span <= 0.0 {
        return 0.0;
    }

    let distance = offset_x.abs();
    let displaced = if distance <= span {
        distance
    } else {
        (span + (distance - span) * ELASTIC_FACTOR).min(span * ELASTIC_CAP)
    };
    displaced.copysign(offset_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_threshold_commits_by_sign() {
        assert_eq!(Gesture::classify(-60.0, 0.0), Gesture::Advance);
        assert_eq!(Gesture::classify(60.0, 0.0), Gesture::Retreat);
    }

    #[test]
    fn test_velocity_threshold_commits_short_drags() {
        assert_eq!(Gesture::classify(-30.0, -600.0), Gesture::Advance);
        assert_eq!(Gesture::classify(30.0, 600.0), Gesture::Retreat);
        assert_eq!(Gesture::classify(0.0, -900.0), Gesture::Advance);
    }

    #[test]
    fn test_small_slow_drags_snap_back() {
        assert_eq!(Gesture::classify(20.0, 100.0), Gesture::Ignore);
        assert_eq!(Gesture::classify(-50.0, 500.0), Gesture::Ignore);
        assert_eq!(Gesture::classify(0.0, 0.0), Gesture::Ignore);
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        assert_eq!(Gesture::classify(f32::NAN, 0.0), Gesture::Ignore);
        assert_eq!(Gesture::classify(-80.0, f32::INFINITY), Gesture::Ignore);
        assert_eq!(Gesture::classify(f32::NEG_INFINITY, 0.0), Gesture::Ignore);
    }

    #[test]
    fn test_elastic_offset_is_bounded() {
        assert_eq!(elastic_offset(120.0, 400.0), 120.0);
        assert_eq!(elastic_offset(-400.0, 400.0), -400.0);
        assert!((elastic_offset(500.0, 400.0) - 435.0).abs() < 1e-3);
        assert_eq!(elastic_offset(-10_000.0, 400.0), -600.0);
        assert_eq!(elastic_offset(f32::NAN, 400.0), 0.0);
        assert_eq!(elastic_offset(50.0, 0.0), 0.0);
    }
}
