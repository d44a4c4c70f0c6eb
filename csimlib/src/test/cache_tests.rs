use crate::address::{block_address, decode};
use crate::cache::{AccessOutcome, Cache, CacheSet, CacheTrait};
use crate::config::CacheParameters;
use crate::error::SimulationError;
use crate::simulator::Simulator;

fn tags(set: &CacheSet) -> Vec<Option<u64>> {
    set.lines().iter().map(|line| line.valid.then_some(line.tag)).collect()
}

/// Builds an address mapping to `set` with `tag` for the given parameters
fn address(tag: u64, set: u64, parameters: &CacheParameters) -> u64 {
    block_address(tag, set, parameters.set_bits, parameters.block_bits)
}

#[test]
fn decode_splits_set_and_tag() {
    assert_eq!(decode(0x10, 1, 1), (0x4, 0));
    assert_eq!(decode(0x20, 1, 1), (0x8, 0));
    assert_eq!(decode(0x12, 1, 1), (0x4, 1));
    // Top bit of a 64 bit address ends up in the tag, with no sign extension
    assert_eq!(decode(0xffff_ffff_ffff_fff0, 2, 4), (0x03ff_ffff_ffff_ffff, 0x3));
}

#[test]
fn decode_then_rebuild_zeroes_the_offset() {
    let addresses = [0u64, 0x1, 0x7ff000418, 0x6031a0, 0xdead_beef_cafe_f00d, u64::MAX];
    for (s, b) in [(1, 1), (4, 4), (5, 5), (10, 3), (31, 32)] {
        for address in addresses {
            let (tag, set) = decode(address, s, b);
            assert!(set < 1 << s);
            let offset_mask = (1u64 << b) - 1;
            assert_eq!(block_address(tag, set, s, b), address & !offset_mask);
        }
    }
}

#[test]
fn new_cache_is_entirely_invalid() {
    let parameters = CacheParameters::new(3, 4, 2).unwrap();
    let cache = Cache::new(&parameters).unwrap();
    assert_eq!(cache.sets().len(), 8);
    assert!(cache.sets().iter().all(|set| set.lines().len() == 4));
    assert_eq!(cache.get_invalid_line_count(), 32);
}

#[test]
fn repeated_access_hits() {
    let parameters = CacheParameters::new(2, 2, 3).unwrap();
    let mut cache = Cache::new(&parameters).unwrap();
    assert_eq!(cache.access(0x48), AccessOutcome::MissNoEvict);
    assert_eq!(cache.access(0x48), AccessOutcome::Hit);
    // Same block, different offset
    assert_eq!(cache.access(0x4f), AccessOutcome::Hit);
    assert_eq!(cache.get_invalid_line_count(), 7);
}

#[test]
fn hit_moves_line_to_front_keeping_order() {
    let mut set = CacheSet::new(4);
    for tag in [1, 2, 3, 4] {
        assert_eq!(set.access(tag), AccessOutcome::MissNoEvict);
    }
    assert_eq!(tags(&set), vec![Some(4), Some(3), Some(2), Some(1)]);
    assert_eq!(set.access(2), AccessOutcome::Hit);
    assert_eq!(tags(&set), vec![Some(2), Some(4), Some(3), Some(1)]);
    assert_eq!(set.access(2), AccessOutcome::Hit);
    assert_eq!(tags(&set), vec![Some(2), Some(4), Some(3), Some(1)]);
}

#[test]
fn evicts_least_recently_used() {
    let mut set = CacheSet::new(3);
    for tag in [10, 11, 12] {
        set.access(tag);
    }
    // The first distinct tag past capacity evicts the oldest
    assert_eq!(set.access(13), AccessOutcome::MissWithEvict { evicted_tag: 10 });
    assert_eq!(tags(&set), vec![Some(13), Some(12), Some(11)]);
    // A hit on 11 protects it, so 12 goes next
    assert_eq!(set.access(11), AccessOutcome::Hit);
    assert_eq!(set.access(14), AccessOutcome::MissWithEvict { evicted_tag: 12 });
    assert_eq!(tags(&set), vec![Some(14), Some(11), Some(13)]);
    assert_eq!(set.valid_line_count(), 3);
}

#[test]
fn direct_mapped_set_always_replaces() {
    let mut set = CacheSet::new(1);
    assert_eq!(set.access(1), AccessOutcome::MissNoEvict);
    assert_eq!(set.access(2), AccessOutcome::MissWithEvict { evicted_tag: 1 });
    assert_eq!(set.access(2), AccessOutcome::Hit);
    assert_eq!(set.access(1), AccessOutcome::MissWithEvict { evicted_tag: 2 });
}

#[test]
fn sets_are_independent() {
    let parameters = CacheParameters::new(2, 1, 4).unwrap();
    let mut cache = Cache::new(&parameters).unwrap();
    for set in 0..4 {
        assert_eq!(cache.access(address(7, set, &parameters)), AccessOutcome::MissNoEvict);
    }
    for set in 0..4 {
        assert_eq!(cache.access(address(7, set, &parameters)), AccessOutcome::Hit);
    }
    assert_eq!(
        cache.access(address(8, 2, &parameters)),
        AccessOutcome::MissWithEvict { evicted_tag: 7 }
    );
    assert_eq!(cache.access(address(7, 1, &parameters)), AccessOutcome::Hit);
    assert_eq!(cache.get_invalid_line_count(), 0);
}

#[test]
fn set_never_holds_more_than_associativity_lines() {
    let parameters = CacheParameters::new(1, 4, 1).unwrap();
    let mut cache = Cache::new(&parameters).unwrap();
    let mut evictions = 0;
    for tag in 0..100u64 {
        // Revisit a few tags so hits are mixed in with misses
        let tag = if tag % 3 == 0 { tag / 3 } else { tag };
        let valid_before = cache.sets()[0].valid_line_count();
        let outcome = cache.access(address(tag, 0, &parameters));
        if outcome.is_eviction() {
            assert_eq!(valid_before, 4);
            evictions += 1;
        }
        assert!(cache.sets()[0].valid_line_count() <= 4);
        let valid_tags: Vec<u64> = cache.sets()[0].lines().iter().filter(|l| l.valid).map(|l| l.tag).collect();
        let mut unique = valid_tags.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), valid_tags.len(), "duplicate tag in set");
    }
    assert!(evictions > 0);
}

#[test]
fn outcome_labels() {
    assert_eq!(AccessOutcome::Hit.labels(), &["hit"]);
    assert_eq!(AccessOutcome::MissNoEvict.labels(), &["miss"]);
    assert_eq!(AccessOutcome::MissWithEvict { evicted_tag: 3 }.labels(), &["miss", "eviction"]);
    assert!(AccessOutcome::Hit.is_hit());
    assert!(!AccessOutcome::MissNoEvict.is_eviction());
}

#[test]
fn oversized_cache_is_an_allocation_error() {
    // Passes validation, but 2^60 sets can never be allocated
    let parameters = CacheParameters::new(60, 1, 1).unwrap();
    assert!(matches!(Cache::new(&parameters), Err(SimulationError::Allocation(_))));
    let error = Simulator::new(&parameters, false).err().unwrap();
    assert!(matches!(error, SimulationError::Allocation(_)));
    assert!(error.to_string().starts_with("Failed to allocate cache memory"));
}
