// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Priority fusion of movement and hazard status

use super::{HazardStatus, MovementStatus, SecurityLevel};

/// Max-merge of the two source levels.
///
/// Movement's reason is kept only when movement is strictly higher; on a tie
/// the hazard reason is reported.
pub fn aggregate(movement: &MovementStatus, hazard: &HazardStatus) -> SecurityLevel {
    if movement.level > hazard.level {
        movement.clone()
    } else {
        hazard.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Level;

    const ALL: [Level; 4] = [Level::Calculating, Level::Safe, Level::Warning, Level::Danger];

    #[test]
    fn test_output_is_max_level() {
        for m in ALL {
            for h in ALL {
                let out = aggregate(&SecurityLevel::new(m, "movement"), &SecurityLevel::new(h, "hazard"));
                assert_eq!(out.level, m.max(h));
            }
        }
    }

    #[test]
    fn test_tie_reports_hazard_reason() {
        for level in ALL {
            let out = aggregate(
                &SecurityLevel::new(level, "movement"),
                &SecurityLevel::new(level, "hazard"),
            );
            assert_eq!(out.reason, "hazard");
        }
    }

    #[test]
    fn test_strictly_higher_movement_reports_movement_reason() {
        let out = aggregate(
            &SecurityLevel::new(Level::Danger, "sudden stop"),
            &SecurityLevel::new(Level::Warning, "flood watch"),
        );
        assert_eq!(out, SecurityLevel::new(Level::Danger, "sudden stop"));

        let out = aggregate(
            &SecurityLevel::new(Level::Safe, "normal movement"),
            &SecurityLevel::new(Level::Calculating, "hazard status unknown"),
        );
        assert_eq!(out.reason, "normal movement");
    }

    #[test]
    fn test_all_sources_unknown_still_defined() {
        let out = aggregate(
            &SecurityLevel::new(Level::Calculating, "speed unavailable"),
            &SecurityLevel::new(Level::Calculating, "hazard status unknown"),
        );
        assert_eq!(out, SecurityLevel::new(Level::Calculating, "hazard status unknown"));
    }
}
