//! AccessKit mapping for announcement lanes.
//!
//! Hosts that expose their tree through [AccessKit](https://accesskit.dev/)
//! can render a lane as a live node: this module maps the [`LaneSpec`] wire
//! contract onto AccessKit roles and live-region politeness. The composing
//! layer owns node ids and tree updates; Operable only builds the node.
//!
//! ```ignore
//! let spec = LaneSpec::for_lane(Politeness::Polite).unwrap();
//! let node = lane_node(&spec, "Saved");
//! // push (node_id, node) in the next TreeUpdate
//! ```

use accesskit::{Live, Node, Role};

use super::{LaneRole, LaneSpec, Politeness};

/// The AccessKit live-region politeness for a lane.
pub fn live_for(politeness: Politeness) -> Live {
    match politeness {
        Politeness::Polite => Live::Polite,
        Politeness::Assertive => Live::Assertive,
        Politeness::Off => Live::Off,
    }
}

/// The AccessKit role for a lane role.
pub fn role_for(role: LaneRole) -> Role {
    match role {
        LaneRole::Status => Role::Status,
        LaneRole::Alert => Role::Alert,
    }
}

/// Build the AccessKit node for one lane holding `text`.
///
/// The role and politeness carry the lane contract; AccessKit reads the
/// node value as the narrated content, and an empty value models the
/// cleared state between two writes.
pub fn lane_node(spec: &LaneSpec, text: &str) -> Node {
    let mut node = Node::new(role_for(spec.role));
    node.set_live(live_for(spec.politeness));
    if !text.is_empty() {
        node.set_value(text);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_roles() {
        let polite = LaneSpec::for_lane(Politeness::Polite).unwrap();
        let assertive = LaneSpec::for_lane(Politeness::Assertive).unwrap();

        assert_eq!(lane_node(&polite, "x").role(), Role::Status);
        assert_eq!(lane_node(&assertive, "x").role(), Role::Alert);
    }

    #[test]
    fn test_off_lane() {
        assert_eq!(live_for(Politeness::Off), Live::Off);
        assert!(LaneSpec::for_lane(Politeness::Off).is_none());
    }
}
