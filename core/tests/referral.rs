//! The referral trigger: threshold crossing on lifetime top-ups, the
//! one-shot guarantee, and the bonus-amount setting override.

use kontosim_core::{
    engine::BankEngine,
    preset::Category,
    referral::{BONUS_SETTING_KEY, DEFAULT_REFERRAL_BONUS, REFERRAL_THRESHOLD},
};

fn engine(seed: u64) -> BankEngine {
    BankEngine::in_memory(seed).expect("in-memory engine")
}

fn referred_pair(engine: &BankEngine) {
    engine.create_account("ref", "Referrer", None).unwrap();
    engine
        .create_account("new", "Newcomer", Some("ref".to_string()))
        .unwrap();
}

#[test]
fn crossing_the_threshold_awards_the_bonus_once() {
    let mut engine = engine(40);
    referred_pair(&engine);

    // First top-up stays below the threshold: nothing fires.
    let outcome = engine.top_up("new", 1.5).unwrap();
    assert!(!outcome.referral_bonus_awarded);
    assert_eq!(engine.store().activation_count().unwrap(), 0);

    // Second top-up pushes the lifetime total from 1.50 to 3.00.
    let outcome = engine.top_up("new", 1.5).unwrap();
    assert!(outcome.referral_bonus_awarded);
    assert_eq!(outcome.referrer_name.as_deref(), Some("Referrer"));
    assert!(outcome.account.referral_activated);
    assert_eq!(outcome.account.total_recharged, 3.0);

    // Referrer's three balances each rose by exactly the bonus.
    let referrer = engine.get_account("ref").unwrap();
    assert_eq!(referrer.balances.display, DEFAULT_REFERRAL_BONUS);
    assert_eq!(referrer.balances.tracked, DEFAULT_REFERRAL_BONUS);
    assert_eq!(referrer.balances.certified, DEFAULT_REFERRAL_BONUS);

    // Exactly one activation row, carrying the bonus.
    assert_eq!(engine.store().activation_count().unwrap(), 1);
    let activation = engine
        .store()
        .activation_for_referred("new")
        .unwrap()
        .unwrap();
    assert_eq!(activation.referrer_id, "ref");
    assert_eq!(activation.bonus_amount, DEFAULT_REFERRAL_BONUS);

    // And one income ledger entry on the referrer.
    let entries = engine.list_transactions("ref").unwrap();
    assert!(entries
        .iter()
        .any(|e| e.category == Category::ReferralBonus && e.is_certified));
}

#[test]
fn never_fires_twice_for_the_same_referred_account() {
    let mut engine = engine(41);
    referred_pair(&engine);

    engine.top_up("new", REFERRAL_THRESHOLD).unwrap();
    assert_eq!(engine.store().activation_count().unwrap(), 1);

    // Further top-ups keep the total above the threshold; the
    // activated flag keeps the trigger dead forever.
    for _ in 0..3 {
        let outcome = engine.top_up("new", 5.0).unwrap();
        assert!(!outcome.referral_bonus_awarded);
    }
    assert_eq!(engine.store().activation_count().unwrap(), 1);
    assert_eq!(
        engine.get_account("ref").unwrap().balances.display,
        DEFAULT_REFERRAL_BONUS
    );
}

#[test]
fn no_bonus_without_a_referrer() {
    let mut engine = engine(42);
    engine.create_account("solo", "Solo", None).unwrap();

    let outcome = engine.top_up("solo", 10.0).unwrap();
    assert!(!outcome.referral_bonus_awarded);
    assert!(outcome.referrer_name.is_none());
    assert_eq!(engine.store().activation_count().unwrap(), 0);
}

#[test]
fn dangling_referrer_skips_bonus_but_keeps_the_top_up() {
    let mut engine = engine(43);
    engine
        .create_account("new", "Newcomer", Some("deleted".to_string()))
        .unwrap();

    let outcome = engine.top_up("new", 5.0).unwrap();
    assert!(!outcome.referral_bonus_awarded);
    assert_eq!(outcome.account.total_recharged, 5.0);
    assert_eq!(outcome.account.balances.display, 5.0);
    // The flag stays down: the referrer never got paid.
    assert!(!outcome.account.referral_activated);
    assert_eq!(engine.store().activation_count().unwrap(), 0);
}

#[test]
fn bonus_amount_is_overridable_via_setting() {
    let mut engine = engine(44);
    referred_pair(&engine);
    engine.store().set_setting(BONUS_SETTING_KEY, "50").unwrap();

    let outcome = engine.top_up("new", 2.0).unwrap();
    assert!(outcome.referral_bonus_awarded);

    let referrer = engine.get_account("ref").unwrap();
    assert_eq!(referrer.balances.display, 50.0);
    let activation = engine
        .store()
        .activation_for_referred("new")
        .unwrap()
        .unwrap();
    assert_eq!(activation.bonus_amount, 50.0);
}

#[test]
fn top_up_itself_certifies_money_and_logs_an_entry() {
    let mut engine = engine(45);
    engine.create_account("a", "A", None).unwrap();

    let outcome = engine.top_up("a", 12.5).unwrap();
    assert_eq!(outcome.account.balances.display, 12.5);
    assert_eq!(outcome.account.balances.certified, 12.5);
    assert_eq!(outcome.account.total_recharged, 12.5);
    assert!(outcome.entry.is_certified);
    assert_eq!(outcome.entry.category, Category::TopUp);
    assert_eq!(outcome.entry.amount_string(), "12.50");
}
