//! Property tests for contrast math

use portal_a11y::{contrast_ratio, evaluate, Color, ComplianceLevel, ContrastResult};
use proptest::prelude::*;

fn arb_color() -> impl Strategy<Value = Color> {
    any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Color::from_rgb(r, g, b))
}

proptest! {
    #[test]
    fn ratio_is_symmetric(a in arb_color(), b in arb_color()) {
        let (a, b) = (a.to_string(), b.to_string());
        prop_assert_eq!(contrast_ratio(&a, &b).unwrap(), contrast_ratio(&b, &a).unwrap());
    }

    #[test]
    fn ratio_is_bounded(a in arb_color(), b in arb_color()) {
        let ratio = a.contrast_with(&b);
        prop_assert!((1.0..=21.0 + 1e-9).contains(&ratio));
    }

    #[test]
    fn hex_round_trips(color in arb_color()) {
        prop_assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
    }

    #[test]
    fn evaluation_is_deterministic(a in arb_color(), b in arb_color(), large in any::<bool>()) {
        let (fg, bg) = (a.to_string(), b.to_string());
        prop_assert_eq!(evaluate(&fg, &bg, large).unwrap(), evaluate(&fg, &bg, large).unwrap());
    }

    #[test]
    fn level_matches_thresholds(a in arb_color(), b in arb_color(), large in any::<bool>()) {
        let result = ContrastResult::from_colors(a, b, large);
        let ratio = a.contrast_with(&b);
        let aaa = if large { 4.5 } else { 7.0 };
        let expected = if ratio >= aaa {
            ComplianceLevel::AAA
        } else if ratio >= result.required_ratio {
            ComplianceLevel::AA
        } else {
            ComplianceLevel::Fail
        };
        prop_assert_eq!(result.level, expected);
    }

    #[test]
    fn malformed_hex_is_rejected(s in "[^0-9a-fA-F#]{1,8}") {
        prop_assert!(s.parse::<Color>().is_err());
    }
}
