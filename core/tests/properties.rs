use gacha_wheel_core::colors::wheel_colors;
use gacha_wheel_core::layout::compute_layout;
use gacha_wheel_core::participant::{Participant, ParticipantId};
use gacha_wheel_core::partition::{group_capacity, partition, PrefixPairing};
use gacha_wheel_core::wheel::winner_index;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn numbered(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|idx| Participant::new(idx as u64 + 1, format!("P{idx}")))
        .collect()
}

proptest! {
    #[test]
    fn layout_covers_full_circle(count in 2usize..200) {
        let layout = compute_layout(count);
        prop_assert_eq!(layout.len(), count);
        prop_assert_eq!(layout[0].start_deg, -90.0);
        for pair in layout.windows(2) {
            prop_assert!((pair[0].end_deg - pair[1].start_deg).abs() < 1e-9);
        }
        let total: f64 = layout.iter().map(|seg| seg.sweep()).sum();
        prop_assert!((total - 360.0).abs() < 1e-9);
        prop_assert!((layout[count - 1].end_deg - 270.0).abs() < 1e-9);
    }

    #[test]
    fn winner_index_in_range_and_stable(rotation in 0.0f64..1.0e6, count in 2usize..100) {
        let index = winner_index(rotation, count).unwrap();
        prop_assert!(index < count);
        prop_assert_eq!(winner_index(rotation, count), Some(index));
    }

    #[test]
    fn whole_turns_do_not_change_winner(degrees in 0u32..1_000_000, turns in 1u32..20, count in 2usize..100) {
        let base = degrees as f64;
        let turned = base + 360.0 * turns as f64;
        prop_assert_eq!(winner_index(base, count), winner_index(turned, count));
    }

    #[test]
    fn partition_sizes_and_coverage(total in 2usize..60, groups in 2usize..12, seed in any::<u64>()) {
        prop_assume!(groups <= total);
        let members = numbered(total);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = partition(&mut rng, &members, groups, None).unwrap();
        let floor = total / groups;
        let ceil = total.div_ceil(groups);
        prop_assert_eq!(result.sizes().iter().sum::<usize>(), total);
        for size in result.sizes() {
            prop_assert!(size == floor || size == ceil);
        }
        let mut ids: Vec<ParticipantId> = result
            .groups
            .iter()
            .flat_map(|group| group.members.iter().map(|m| m.id))
            .collect();
        ids.sort_unstable();
        let expected: Vec<ParticipantId> = members.iter().map(|m| m.id).collect();
        prop_assert_eq!(ids, expected);
        prop_assert_eq!(result.reveal_order.len(), total);
    }

    #[test]
    fn paired_partition_keeps_invariants(total in 4usize..60, groups in 2usize..12, seed in any::<u64>()) {
        prop_assume!(groups * 2 <= total);
        let mut members = numbered(total);
        members[1].name = "Pair-one".to_string();
        members[total - 1].name = "Pair-two".to_string();
        let rule = PrefixPairing::new(["pair-one"], ["pair-two"]);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = partition(&mut rng, &members, groups, Some(&rule)).unwrap();
        let first = members[1].id;
        let second = members[total - 1].id;
        prop_assert_eq!(result.paired, Some((first, second)));
        prop_assert_eq!(result.group_of(first), result.group_of(second));
        let floor = total / groups;
        let ceil = total.div_ceil(groups);
        for size in result.sizes() {
            prop_assert!(size == floor || size == ceil);
        }
        let mut ids: Vec<ParticipantId> = result
            .groups
            .iter()
            .flat_map(|group| group.members.iter().map(|m| m.id))
            .collect();
        ids.sort_unstable();
        prop_assert_eq!(ids.len(), total);
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
        for step in &result.reveal_order {
            prop_assert_eq!(result.group_of(step.participant_id), Some(step.group_index));
        }
    }

    #[test]
    fn tight_paired_partition_uses_a_group_with_room(
        (groups, total) in (2usize..12).prop_flat_map(|groups| (Just(groups), groups + 1..groups * 2)),
        seed in any::<u64>(),
    ) {
        prop_assume!(total >= 3);
        let mut members = numbered(total);
        members[1].name = "Pair-one".to_string();
        members[total - 1].name = "Pair-two".to_string();
        let rule = PrefixPairing::new(["pair-one"], ["pair-two"]);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = partition(&mut rng, &members, groups, Some(&rule)).unwrap();
        let first = members[1].id;
        let second = members[total - 1].id;
        prop_assert_eq!(result.paired, Some((first, second)));
        let target = result.group_of(first);
        prop_assert_eq!(target, result.group_of(second));
        let target = target.unwrap();
        prop_assert!(group_capacity(total, groups, target) >= 2);
        for (index, size) in result.sizes().into_iter().enumerate() {
            prop_assert_eq!(size, group_capacity(total, groups, index));
        }
        prop_assert_eq!(result.sizes().iter().sum::<usize>(), total);
    }

    #[test]
    fn color_cycle_has_no_equal_neighbours(count in 0usize..300, palette_len in 2usize..20) {
        let palette: Vec<String> = (0..palette_len).map(|idx| format!("#{idx:06X}")).collect();
        let colors = wheel_colors(count, &palette);
        prop_assert_eq!(colors.len(), count);
        for pair in colors.windows(2) {
            prop_assert_ne!(&pair[0], &pair[1]);
        }
    }
}
