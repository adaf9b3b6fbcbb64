//! Property tests for the optional-field encoding of AppQoS models.

use appqos_api::models::{App, Pool, PowerProfile};
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

fn power_profile_strategy() -> impl Strategy<Value = PowerProfile> {
    (
        option::of(any::<u32>()),
        option::of("[a-z]{1,12}"),
        option::of(any::<u32>()),
        option::of(any::<u32>()),
        option::of(prop_oneof![
            Just("performance".to_string()),
            Just("balance_performance".to_string()),
            Just("power".to_string()),
        ]),
    )
        .prop_map(|(id, name, min_freq, max_freq, epp)| PowerProfile {
            id,
            name,
            min_freq,
            max_freq,
            epp,
        })
}

fn app_strategy() -> impl Strategy<Value = App> {
    (
        option::of(any::<u32>()),
        option::of(any::<u32>()),
        option::of("[a-z][a-z0-9-]{0,15}"),
        option::of(vec(0u32..256, 0..8)),
        option::of(vec(1u32..4_194_304, 0..8)),
    )
        .prop_map(|(id, pool_id, name, cores, pids)| App {
            id,
            pool_id,
            name,
            cores,
            pids,
        })
}

fn pool_strategy() -> impl Strategy<Value = Pool> {
    (
        option::of("[A-Za-z][A-Za-z0-9 _-]{0,15}"),
        option::of(any::<u32>()),
        option::of(vec(app_strategy(), 0..3)),
        option::of(any::<u64>()),
        option::of(0u32..=100),
        option::of(any::<u32>()),
        option::of(vec(0u32..256, 0..16)),
        option::of(power_profile_strategy()),
    )
        .prop_map(
            |(name, id, apps, cbm, mba, mba_bw, cores, power_profile)| Pool {
                name,
                id,
                apps,
                cbm,
                mba,
                mba_bw,
                cores,
                power_profile,
            },
        )
}

proptest! {
    #[test]
    fn pool_encode_decode_preserves_set_fields(pool in pool_strategy()) {
        let encoded = serde_json::to_value(&pool).unwrap();
        let object = encoded.as_object().unwrap();

        prop_assert_eq!(object.contains_key("name"), pool.name.is_some());
        prop_assert_eq!(object.contains_key("id"), pool.id.is_some());
        prop_assert_eq!(object.contains_key("apps"), pool.apps.is_some());
        prop_assert_eq!(object.contains_key("cbm"), pool.cbm.is_some());
        prop_assert_eq!(object.contains_key("mba"), pool.mba.is_some());
        prop_assert_eq!(object.contains_key("mba_bw"), pool.mba_bw.is_some());
        prop_assert_eq!(object.contains_key("cores"), pool.cores.is_some());
        prop_assert_eq!(object.contains_key("power_profile"), pool.power_profile.is_some());
        prop_assert!(object.values().all(|value| !value.is_null()));

        let decoded: Pool = serde_json::from_value(encoded).unwrap();
        prop_assert_eq!(decoded, pool);
    }
}
