use discord_bot::commands::gambling::{GamblingError, flip_coin, pick_number};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn same_seed_gives_same_flips() {
    let mut first = StdRng::seed_from_u64(99);
    let mut second = StdRng::seed_from_u64(99);
    for _ in 0..20 {
        assert_eq!(flip_coin(&mut first), flip_coin(&mut second));
    }
}

#[test]
fn wide_ranges_do_not_overflow() {
    let mut rng = StdRng::seed_from_u64(3);
    let number = pick_number(&mut rng, i64::MIN, i64::MAX).unwrap();
    assert!((i64::MIN..=i64::MAX).contains(&number));
}

#[test]
fn empty_range_message_is_user_facing() {
    assert_eq!(
        GamblingError::EmptyRange.to_string(),
        "The first number should be `inferior` to the second one !"
    );
}
