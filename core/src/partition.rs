use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::colors::group_color;
use crate::error::ValidationError;
use crate::participant::{Participant, ParticipantId};

pub const MIN_GROUP_COUNT: usize = 2;
pub const MIN_PARTITION_PARTICIPANTS: usize = 2;
pub const MAX_GROUP_COUNT: usize = 10;
pub const GROUP_REVEAL_STEP_MS: i64 = 200;

/// Forces two participants into the same group when both are present.
pub trait PairingRule {
    fn is_first(&self, participant: &Participant) -> bool;
    fn is_second(&self, participant: &Participant) -> bool;

    fn find_pair<'a>(&self, participants: &'a [Participant]) -> Option<(&'a Participant, &'a Participant)> {
        let first = participants.iter().find(|p| self.is_first(p))?;
        let second = participants
            .iter()
            .find(|p| p.id != first.id && self.is_second(p))?;
        Some((first, second))
    }
}

/// Pairing by case-insensitive name prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixPairing {
    first: Vec<String>,
    second: Vec<String>,
}

impl PrefixPairing {
    pub fn new<A, B>(first: A, second: B) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        Self {
            first: normalize_prefixes(first),
            second: normalize_prefixes(second),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() || self.second.is_empty()
    }
}

fn normalize_prefixes<I>(prefixes: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    prefixes
        .into_iter()
        .map(|prefix| prefix.as_ref().trim().to_lowercase())
        .filter(|prefix| !prefix.is_empty())
        .collect()
}

fn matches_prefix(name: &str, prefixes: &[String]) -> bool {
    let name = name.trim().to_lowercase();
    prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
}

impl PairingRule for PrefixPairing {
    fn is_first(&self, participant: &Participant) -> bool {
        matches_prefix(&participant.name, &self.first)
    }

    fn is_second(&self, participant: &Participant) -> bool {
        matches_prefix(&participant.name, &self.second)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub index: usize,
    pub members: Vec<Participant>,
}

impl Group {
    pub fn name(&self) -> String {
        group_name(self.index)
    }

    pub fn color(&self) -> &'static str {
        group_color(self.index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealStep {
    pub participant_id: ParticipantId,
    pub group_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionResult {
    pub groups: Vec<Group>,
    pub reveal_order: Vec<RevealStep>,
    pub paired: Option<(ParticipantId, ParticipantId)>,
}

impl PartitionResult {
    pub fn total(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Group::len).collect()
    }

    pub fn group_of(&self, id: ParticipantId) -> Option<usize> {
        self.groups
            .iter()
            .find(|group| group.members.iter().any(|member| member.id == id))
            .map(|group| group.index)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.groups
            .iter()
            .flat_map(|group| group.members.iter())
            .find(|member| member.id == id)
    }

    pub fn reveal(&self) -> RevealProgress<'_> {
        RevealProgress {
            result: self,
            step: 0,
        }
    }
}

/// Walks the reveal order one member at a time for the group animation.
#[derive(Debug, Clone)]
pub struct RevealProgress<'a> {
    result: &'a PartitionResult,
    step: usize,
}

impl<'a> RevealProgress<'a> {
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.step >= self.result.reveal_order.len()
    }

    /// Members revealed so far, per group, in reveal order.
    pub fn revealed(&self) -> Vec<Vec<&'a Participant>> {
        let mut groups = vec![Vec::new(); self.result.groups.len()];
        for step in &self.result.reveal_order[..self.step] {
            if let (Some(slot), Some(member)) = (
                groups.get_mut(step.group_index),
                self.result.participant(step.participant_id),
            ) {
                slot.push(member);
            }
        }
        groups
    }
}

impl<'a> Iterator for RevealProgress<'a> {
    type Item = (&'a Participant, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.result.reveal_order.get(self.step)?;
        self.step += 1;
        let member = self.result.participant(step.participant_id)?;
        Some((member, step.group_index))
    }
}

pub fn group_name(index: usize) -> String {
    format!("Kelompok {}", index + 1)
}

pub fn max_group_count(participants: usize) -> usize {
    participants.min(MAX_GROUP_COUNT)
}

pub fn approx_group_size(participants: usize, groups: usize) -> usize {
    if groups == 0 {
        return 0;
    }
    participants.div_ceil(groups)
}

pub fn group_capacity(total: usize, groups: usize, index: usize) -> usize {
    let base = total / groups;
    let extra = total % groups;
    base + usize::from(index < extra)
}

pub fn validate_partition(total: usize, group_count: usize) -> Result<(), ValidationError> {
    if total < MIN_PARTITION_PARTICIPANTS {
        return Err(ValidationError::NotEnoughParticipants {
            required: MIN_PARTITION_PARTICIPANTS,
            found: total,
        });
    }
    if group_count < MIN_GROUP_COUNT {
        return Err(ValidationError::InvalidGroupCount {
            requested: group_count,
        });
    }
    if total < group_count {
        return Err(ValidationError::NotEnoughForGroups {
            groups: group_count,
            found: total,
        });
    }
    Ok(())
}

pub fn partition<R: Rng + ?Sized>(
    rng: &mut R,
    participants: &[Participant],
    group_count: usize,
    pairing: Option<&dyn PairingRule>,
) -> Result<PartitionResult, ValidationError> {
    let total = participants.len();
    validate_partition(total, group_count)?;

    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);

    let pair = pairing.and_then(|rule| rule.find_pair(participants));
    if let Some((first, second)) = pair {
        // the pair only fits in a group with room for two
        let targets: Vec<usize> = (0..group_count)
            .filter(|g| group_capacity(total, group_count, *g) >= 2)
            .collect();
        if !targets.is_empty() {
            let target = targets[rng.random_range(0..targets.len())];
            return Ok(partition_paired(
                rng,
                shuffled,
                group_count,
                (first.id, second.id),
                target,
            ));
        }
    }

    let mut groups = empty_groups(group_count);
    let mut reveal_order = Vec::with_capacity(total);
    for (i, member) in shuffled.into_iter().enumerate() {
        let group_index = i % group_count;
        reveal_order.push(RevealStep {
            participant_id: member.id,
            group_index,
        });
        groups[group_index].members.push(member);
    }
    Ok(PartitionResult {
        groups,
        reveal_order,
        paired: None,
    })
}

fn partition_paired<R: Rng + ?Sized>(
    rng: &mut R,
    mut pool: Vec<Participant>,
    group_count: usize,
    pair: (ParticipantId, ParticipantId),
    target: usize,
) -> PartitionResult {
    let total = pool.len();
    let mut groups = empty_groups(group_count);
    let mut reveal_order = Vec::with_capacity(total);

    for id in [pair.0, pair.1] {
        if let Some(idx) = pool.iter().position(|member| member.id == id) {
            let member = pool.remove(idx);
            reveal_order.push(RevealStep {
                participant_id: member.id,
                group_index: target,
            });
            groups[target].members.push(member);
        }
    }

    let mut cursor = 0;
    for member in pool {
        for _ in 0..group_count {
            if groups[cursor].len() < group_capacity(total, group_count, cursor) {
                break;
            }
            cursor = (cursor + 1) % group_count;
        }
        reveal_order.push(RevealStep {
            participant_id: member.id,
            group_index: cursor,
        });
        groups[cursor].members.push(member);
        cursor = (cursor + 1) % group_count;
    }

    for group in &mut groups {
        group.members.shuffle(rng);
    }

    PartitionResult {
        groups,
        reveal_order,
        paired: Some(pair),
    }
}

fn empty_groups(count: usize) -> Vec<Group> {
    (0..count)
        .map(|index| Group {
            index,
            members: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn roster(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| Participant::new(idx as u64 + 1, *name))
            .collect()
    }

    #[test]
    fn rejects_unmet_minimums() {
        let mut rng = StdRng::seed_from_u64(1);
        let one = roster(&["A"]);
        assert_eq!(
            partition(&mut rng, &one, 2, None),
            Err(ValidationError::NotEnoughParticipants {
                required: 2,
                found: 1
            })
        );
        let three = roster(&["A", "B", "C"]);
        assert_eq!(
            partition(&mut rng, &three, 1, None),
            Err(ValidationError::InvalidGroupCount { requested: 1 })
        );
        assert_eq!(
            partition(&mut rng, &three, 4, None),
            Err(ValidationError::NotEnoughForGroups {
                groups: 4,
                found: 3
            })
        );
    }

    #[test]
    fn five_into_two() {
        let mut rng = StdRng::seed_from_u64(2);
        let members = roster(&["A", "B", "C", "D", "E"]);
        let result = partition(&mut rng, &members, 2, None).unwrap();
        assert_eq!(result.sizes(), vec![3, 2]);
        let mut names: Vec<&str> = result
            .groups
            .iter()
            .flat_map(|group| group.members.iter().map(|m| m.name.as_str()))
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
        assert!(result.paired.is_none());
    }

    #[test]
    fn reveal_order_matches_final_groups() {
        let mut rng = StdRng::seed_from_u64(3);
        let members = roster(&["A", "B", "C", "D", "E", "F", "G"]);
        let result = partition(&mut rng, &members, 3, None).unwrap();
        assert_eq!(result.reveal_order.len(), 7);
        for step in &result.reveal_order {
            assert_eq!(result.group_of(step.participant_id), Some(step.group_index));
        }
    }

    #[test]
    fn pairing_keeps_pair_together_and_first_in_reveal() {
        let rule = PrefixPairing::new(["ko"], ["mi"]);
        let members = roster(&["Andi", "Koji", "Budi", "Citra", "Mina", "Dika", "Eka", "Fajar"]);
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = partition(&mut rng, &members, 3, Some(&rule)).unwrap();
            let koji = ParticipantId(2);
            let mina = ParticipantId(5);
            assert_eq!(result.paired, Some((koji, mina)));
            assert_eq!(result.group_of(koji), result.group_of(mina));
            assert_eq!(result.reveal_order[0].participant_id, koji);
            assert_eq!(result.reveal_order[1].participant_id, mina);
            let mut sizes = result.sizes();
            sizes.sort_unstable();
            assert_eq!(sizes, vec![2, 3, 3]);
            for step in &result.reveal_order {
                assert_eq!(result.group_of(step.participant_id), Some(step.group_index));
            }
        }
    }

    #[test]
    fn pairing_skipped_when_no_group_holds_two() {
        let rule = PrefixPairing::new(["a"], ["b"]);
        let members = roster(&["Ana", "Bo", "Cy"]);
        let mut rng = StdRng::seed_from_u64(4);
        let result = partition(&mut rng, &members, 3, Some(&rule)).unwrap();
        assert!(result.paired.is_none());
        assert_eq!(result.sizes(), vec![1, 1, 1]);
    }

    #[test]
    fn pair_only_lands_in_groups_with_room_for_two() {
        let rule = PrefixPairing::new(["ana"], ["bo"]);
        let members = roster(&["Ana", "Bo", "Cy", "Di", "Ed"]);
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = partition(&mut rng, &members, 3, Some(&rule)).unwrap();
            let (first, second) = result.paired.unwrap();
            let group = result.group_of(first).unwrap();
            assert_eq!(result.group_of(second), Some(group));
            assert_ne!(group, 2, "seed {seed}");
            assert_eq!(result.sizes(), vec![2, 2, 1]);
        }
    }

    #[test]
    fn same_participant_cannot_pair_with_itself() {
        let rule = PrefixPairing::new(["an"], ["an"]);
        let members = roster(&["Ana", "Bo", "Cy", "Di"]);
        let mut rng = StdRng::seed_from_u64(5);
        let result = partition(&mut rng, &members, 2, Some(&rule)).unwrap();
        assert!(result.paired.is_none());
    }

    #[test]
    fn reveal_progress_fills_groups_step_by_step() {
        let mut rng = StdRng::seed_from_u64(6);
        let members = roster(&["A", "B", "C", "D"]);
        let result = partition(&mut rng, &members, 2, None).unwrap();
        let mut progress = result.reveal();
        assert!(progress.revealed().iter().all(Vec::is_empty));
        let (first, group) = progress.next().unwrap();
        assert_eq!(progress.revealed()[group], vec![first]);
        assert_eq!(progress.by_ref().count(), 3);
        assert!(progress.is_complete());
        assert_eq!(progress.revealed().iter().map(Vec::len).sum::<usize>(), 4);
    }

    #[test]
    fn helpers() {
        assert_eq!(group_name(0), "Kelompok 1");
        assert_eq!(max_group_count(25), 10);
        assert_eq!(max_group_count(4), 4);
        assert_eq!(approx_group_size(7, 3), 3);
        assert_eq!(group_capacity(7, 3, 0), 3);
        assert_eq!(group_capacity(7, 3, 1), 2);
    }
}
