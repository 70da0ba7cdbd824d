use proptest::prelude::*;

use profile_provisioner::automation::AutomationError;

use super::mock_engine::Behaviour;

/// Printable ASCII passwords of any composition
pub fn password_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

/// Raw salt text; the hasher binds whatever text it is given
pub fn salt_text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9+/]{4,32}={0,2}"
}

/// Instant outcomes only, so runs need no clock movement
pub fn instant_behaviour_strategy() -> impl Strategy<Value = Behaviour> {
    prop_oneof![
        3 => Just(Behaviour::Succeed),
        1 => Just(Behaviour::Fail(AutomationError::Navigation(
            "signup form missing".to_string()
        ))),
        1 => Just(Behaviour::Fail(AutomationError::Timeout { timeout_seconds: 30 })),
        1 => Just(Behaviour::Incomplete),
    ]
}

pub fn script_strategy() -> impl Strategy<Value = Vec<Behaviour>> {
    prop::collection::vec(instant_behaviour_strategy(), 1..16)
}
