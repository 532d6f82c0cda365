//! Multi-stage quest tracking and generation (§4.10).
//!
//! Generalizes the teacher's single-condition [`crate::goal`] model into the
//! original engine's multi-stage quest: a quest holds an ordered list of
//! stages, each with one active objective, and advances stage by stage
//! rather than flipping a single status flag.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::instance::GeneratedLayout;
use crate::rng::RollStream;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Objective {
    Kill { target_template_id: Uuid, required_quantity: u32, current_quantity: u32 },
    Fetch { item_template_id: Uuid, required_quantity: u32 },
    Deliver { item_template_id: Uuid, recipient_instance_id: Uuid },
    Negotiate { skill: String, difficulty: u32 },
    ClearRegion { target_template_id: Uuid, completion_check_enabled: bool },
    /// Satisfied just by reaching this stage and talking to the giver again;
    /// no item, skill check, or kill count gates it.
    Talk { topic: String },
    /// Branches on a player-picked response rather than a skill roll;
    /// `choice_id` must match one of `choices` to succeed (§3 data model).
    DialogueChoice { prompt: String, choices: Vec<String> },
}

/// One stage of a quest; `choice_id` is set on branching stages produced by
/// a `negotiate` success/failure so turn-in can pick the right follow-on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestStage {
    pub objective: Objective,
    pub choice_id: Option<String>,
    pub success_next: Option<usize>,
    pub failure_next: Option<usize>,
}

impl QuestStage {
    pub fn simple(objective: Objective) -> Self {
        Self { objective, choice_id: None, success_next: None, failure_next: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestState {
    Active,
    ReadyToComplete,
    Completed,
    Abandoned,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestRewards {
    pub xp: i64,
    pub gold: i64,
    pub item_template_ids: Vec<Uuid>,
}

/// Where an `instance` quest's region surfaces in the world (§4.12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPoint {
    pub external_region_id: Uuid,
    pub external_room_id: Uuid,
    pub exit_command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: Uuid,
    pub template_id: Uuid,
    pub name: String,
    pub description: String,
    pub stages: Vec<QuestStage>,
    pub current_stage_index: usize,
    pub giver_instance_id: Uuid,
    pub rewards: QuestRewards,
    pub state: QuestState,
    pub instance_region_id: Option<Uuid>,
    pub entry_point: Option<EntryPoint>,
}

impl Quest {
    pub fn active_objective(&self) -> Option<&Objective> {
        self.stages.get(self.current_stage_index).map(|s| &s.objective)
    }

    pub fn active_objective_mut(&mut self) -> Option<&mut Objective> {
        self.stages.get_mut(self.current_stage_index).map(|s| &mut s.objective)
    }

    pub fn is_final_stage(&self) -> bool {
        self.current_stage_index + 1 >= self.stages.len()
    }

    /// Advance to `stage_index`, or mark `ReadyToComplete` if it was the
    /// final stage (§4.10 Turn-in).
    fn advance_to(&mut self, stage_index: Option<usize>) {
        match stage_index {
            Some(idx) if idx < self.stages.len() => self.current_stage_index = idx,
            _ => self.state = QuestState::ReadyToComplete,
        }
    }
}

/// `npc_killed` event handler: bump every active quest's `kill` objective
/// matching `npc_template_id`, returning ids of quests that just reached
/// `required_quantity` (§4.10 Events consumed).
pub fn on_npc_killed(quests: &mut [Quest], npc_template_id: Uuid) -> Vec<Uuid> {
    let mut completed = Vec::new();
    for quest in quests.iter_mut().filter(|q| q.state == QuestState::Active) {
        let quest_id = quest.id;
        if let Some(Objective::Kill { target_template_id, required_quantity, current_quantity }) = quest.active_objective_mut() {
            if *target_template_id == npc_template_id && *current_quantity < *required_quantity {
                *current_quantity += 1;
                if *current_quantity >= *required_quantity {
                    completed.push(quest_id);
                }
            }
        }
    }
    for quest in quests.iter_mut() {
        if completed.contains(&quest.id) {
            quest.state = QuestState::ReadyToComplete;
        }
    }
    completed
}

/// Region-clear scan for active `clear_region` quests flagged
/// `completion_check_enabled`: `true` once no matching NPC remains alive in
/// `instance_region_id` (§4.10).
pub fn check_region_clear(quest: &mut Quest, alive_template_ids_in_region: &[Uuid]) -> bool {
    if quest.state != QuestState::Active {
        return false;
    }
    let Some(Objective::ClearRegion { target_template_id, completion_check_enabled }) = quest.active_objective() else {
        return false;
    };
    if !completion_check_enabled {
        return false;
    }
    let target = *target_template_id;
    if alive_template_ids_in_region.iter().any(|id| *id == target) {
        return false;
    }
    quest.state = QuestState::ReadyToComplete;
    true
}

/// Outcome of a turn-in attempt against one stage (§4.10 Turn-in).
#[derive(Debug, Clone, PartialEq)]
pub enum TurnInOutcome {
    /// Stage requirements not yet satisfied; nothing changed.
    NotReady,
    /// Advanced to another stage (not yet the final reward).
    Advanced,
    /// Final stage satisfied; caller should apply rewards and close the quest.
    Completed,
}

/// Attempt to satisfy the quest's active objective during `talk <giver>
/// complete`. `inventory` is `(item_template_id, item_instance_id)` pairs
/// currently held; `skill_check` resolves a negotiate roll.
pub fn attempt_turn_in(quest: &mut Quest, inventory: &mut Vec<(Uuid, Uuid)>, skill_check: impl FnOnce(&str, u32) -> bool, choice_id: Option<&str>) -> TurnInOutcome {
    if quest.state != QuestState::Active && quest.state != QuestState::ReadyToComplete {
        return TurnInOutcome::NotReady;
    }

    let stage_idx = quest.current_stage_index;
    let (success, consumed_item): (bool, Option<Uuid>) = match quest.stages.get(stage_idx).map(|s| s.objective.clone()) {
        Some(Objective::Deliver { item_template_id, .. }) => {
            let pos = inventory.iter().position(|(tmpl, _)| *tmpl == item_template_id);
            match pos {
                Some(pos) => (true, Some(inventory.remove(pos).1)),
                None => (false, None),
            }
        }
        Some(Objective::Fetch { item_template_id, required_quantity }) => {
            let held = inventory.iter().filter(|(tmpl, _)| *tmpl == item_template_id).count() as u32;
            if held >= required_quantity {
                let mut remaining = required_quantity;
                inventory.retain(|(tmpl, _)| {
                    if *tmpl == item_template_id && remaining > 0 {
                        remaining -= 1;
                        false
                    } else {
                        true
                    }
                });
                (true, None)
            } else {
                (false, None)
            }
        }
        Some(Objective::Negotiate { skill, difficulty }) => (skill_check(&skill, difficulty), None),
        Some(Objective::Kill { required_quantity, current_quantity, .. }) => (current_quantity >= required_quantity, None),
        Some(Objective::ClearRegion { .. }) => (quest.state == QuestState::ReadyToComplete, None),
        Some(Objective::Talk { .. }) => (true, None),
        Some(Objective::DialogueChoice { choices, .. }) => (choice_id.is_some_and(|c| choices.iter().any(|v| v == c)), None),
        None => return TurnInOutcome::NotReady,
    };
    let _ = consumed_item;

    let branches_on_choice = |objective: &Objective| matches!(objective, Objective::Negotiate { .. } | Objective::DialogueChoice { .. });

    if !success {
        let stage = &quest.stages[stage_idx];
        if branches_on_choice(&stage.objective) {
            let next = stage.failure_next;
            quest.advance_to(next);
            return if quest.state == QuestState::ReadyToComplete { TurnInOutcome::Completed } else { TurnInOutcome::Advanced };
        }
        return TurnInOutcome::NotReady;
    }

    if quest.is_final_stage() {
        quest.state = QuestState::Completed;
        return TurnInOutcome::Completed;
    }

    let stage = &quest.stages[stage_idx];
    let next = if branches_on_choice(&stage.objective) { stage.success_next } else { Some(stage_idx + 1) };
    quest.advance_to(next);
    if quest.state == QuestState::ReadyToComplete {
        quest.state = QuestState::Completed;
        TurnInOutcome::Completed
    } else {
        TurnInOutcome::Advanced
    }
}

/// Fill the board back to `max_quests` after a completion, preferring quest
/// kinds not already represented to restore variety first (§4.10 Board
/// replenishment).
pub fn ensure_initial_quests(board: &mut Vec<Quest>, max_quests: usize, mut make_quest: impl FnMut(&[Quest]) -> Option<Quest>) {
    while board.len() < max_quests {
        match make_quest(board) {
            Some(quest) => board.push(quest),
            None => break,
        }
    }
}

/// A candidate hostile/item/region the generator can pick from; the caller
/// (`World`) supplies these since the generator has no content registry of
/// its own.
#[derive(Debug, Clone)]
pub struct HostileCandidate {
    pub template_id: Uuid,
    pub level: i64,
    pub faction: String,
    pub region_id: Uuid,
    pub drops_item_template_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct FriendlyCandidate {
    pub template_id: Uuid,
    pub instance_id: Uuid,
}

/// A resolved `InstanceQuestTemplateDef` (content `Sym` ids already mapped
/// to live `Uuid`s by the caller's content registry).
#[derive(Debug, Clone)]
pub struct InstanceQuestCandidate {
    pub id: Uuid,
    pub level: i64,
    pub possible_target_template_ids: Vec<Uuid>,
    pub possible_entry_regions: Vec<Uuid>,
    pub min_rooms: usize,
    pub max_rooms: usize,
}

/// §4.10 Generation: produces quest instances from candidate pools supplied
/// by the caller, keeping this module free of a direct content-registry
/// dependency.
pub struct QuestGenerator {
    pub level_window: i64,
}

impl Default for QuestGenerator {
    fn default() -> Self {
        Self { level_window: 3 }
    }
}

impl QuestGenerator {
    /// `kill`: a hostile template within `[player_level - L, player_level + L]`.
    pub fn generate_kill(&self, giver: Uuid, player_level: i64, hostiles: &[HostileCandidate], rng: &mut RollStream) -> Option<Quest> {
        let in_range: Vec<&HostileCandidate> = hostiles.iter().filter(|h| (h.level - player_level).abs() <= self.level_window).collect();
        let idx = rng.pick_index(in_range.len())?;
        let target = in_range[idx];
        let required = rng.uniform_inclusive(3, 8).max(1) as u32;
        Some(Quest {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            name: "Thin Their Ranks".into(),
            description: "Defeat enough of the threat to matter.".into(),
            stages: vec![QuestStage::simple(Objective::Kill { target_template_id: target.template_id, required_quantity: required, current_quantity: 0 })],
            current_stage_index: 0,
            giver_instance_id: giver,
            rewards: QuestRewards { xp: 50 * required as i64, gold: 10 * required as i64, item_template_ids: vec![] },
            state: QuestState::Active,
            instance_region_id: None,
            entry_point: None,
        })
    }

    /// `fetch`: an (item, mob, region) triple where the mob drops the item.
    pub fn generate_fetch(&self, giver: Uuid, hostiles: &[HostileCandidate], rng: &mut RollStream) -> Option<Quest> {
        let droppers: Vec<&HostileCandidate> = hostiles.iter().filter(|h| h.drops_item_template_id.is_some()).collect();
        let idx = rng.pick_index(droppers.len())?;
        let source = droppers[idx];
        let item_template_id = source.drops_item_template_id?;
        let required = rng.uniform_inclusive(1, 5).max(1) as u32;
        Some(Quest {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            name: "Gather Supplies".into(),
            description: "Bring back what's needed.".into(),
            stages: vec![QuestStage::simple(Objective::Fetch { item_template_id, required_quantity: required })],
            current_stage_index: 0,
            giver_instance_id: giver,
            rewards: QuestRewards { xp: 20 * required as i64, gold: 15 * required as i64, item_template_ids: vec![] },
            state: QuestState::Active,
            instance_region_id: None,
            entry_point: None,
        })
    }

    /// `deliver`: pick any friendly recipient.
    pub fn generate_deliver(&self, giver: Uuid, item_template_id: Uuid, recipients: &[FriendlyCandidate], rng: &mut RollStream) -> Option<Quest> {
        let idx = rng.pick_index(recipients.len())?;
        let recipient = &recipients[idx];
        Some(Quest {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            name: "A Small Errand".into(),
            description: "Carry this to someone who needs it.".into(),
            stages: vec![QuestStage::simple(Objective::Deliver { item_template_id, recipient_instance_id: recipient.instance_id })],
            current_stage_index: 0,
            giver_instance_id: giver,
            rewards: QuestRewards { xp: 30, gold: 20, item_template_ids: vec![] },
            state: QuestState::Active,
            instance_region_id: None,
            entry_point: None,
        })
    }

    /// `instance`: pick a registered template, a target creature, a
    /// procedural layout, and an outdoor entry room (§4.10, §4.12).
    pub fn generate_instance(&self, giver: Uuid, player_level: i64, templates: &[InstanceQuestCandidate], rng: &mut RollStream) -> Option<(Quest, GeneratedLayout)> {
        let eligible: Vec<&InstanceQuestCandidate> = templates.iter().filter(|t| t.level <= player_level).collect();
        let idx = rng.pick_index(eligible.len())?;
        let template = eligible[idx];
        let target_idx = rng.pick_index(template.possible_target_template_ids.len())?;
        let target_template_id = template.possible_target_template_ids[target_idx];
        let entry_idx = rng.pick_index(template.possible_entry_regions.len())?;
        let entry_region_id = template.possible_entry_regions[entry_idx];

        let layout = crate::instance::generate_layout(template.min_rooms, template.max_rooms, rng);

        let quest = Quest {
            id: Uuid::new_v4(),
            template_id: template.id,
            name: "Into the Depths".into(),
            description: "Clear out whatever has taken root there.".into(),
            stages: vec![QuestStage::simple(Objective::ClearRegion { target_template_id, completion_check_enabled: true })],
            current_stage_index: 0,
            giver_instance_id: giver,
            rewards: QuestRewards { xp: 200, gold: 100, item_template_ids: vec![] },
            state: QuestState::Active,
            instance_region_id: None,
            entry_point: Some(EntryPoint { external_region_id: entry_region_id, external_room_id: Uuid::nil(), exit_command: "descend".into() }),
        };
        Some((quest, layout))
    }
}

pub type QuestBoard = HashMap<Uuid, Quest>;

#[cfg(test)]
mod tests {
    use super::*;

    fn kill_quest(required: u32, target: Uuid) -> Quest {
        Quest {
            id: Uuid::new_v4(),
            template_id: Uuid::nil(),
            name: "Test".into(),
            description: String::new(),
            stages: vec![QuestStage::simple(Objective::Kill { target_template_id: target, required_quantity: required, current_quantity: 0 })],
            current_stage_index: 0,
            giver_instance_id: Uuid::nil(),
            rewards: QuestRewards::default(),
            state: QuestState::Active,
            instance_region_id: None,
            entry_point: None,
        }
    }

    #[test]
    fn kill_objective_reaches_ready_to_complete_on_final_kill() {
        let target = Uuid::new_v4();
        let mut quests = vec![kill_quest(2, target)];
        assert!(on_npc_killed(&mut quests, target).is_empty());
        assert_eq!(quests[0].state, QuestState::Active);
        let ready = on_npc_killed(&mut quests, target);
        assert_eq!(ready, vec![quests[0].id]);
        assert_eq!(quests[0].state, QuestState::ReadyToComplete);
    }

    #[test]
    fn unrelated_kill_does_not_progress_quest() {
        let target = Uuid::new_v4();
        let mut quests = vec![kill_quest(1, target)];
        assert!(on_npc_killed(&mut quests, Uuid::new_v4()).is_empty());
        assert_eq!(quests[0].state, QuestState::Active);
    }

    #[test]
    fn fetch_turn_in_consumes_exact_quantity() {
        let item = Uuid::new_v4();
        let mut quest = Quest {
            id: Uuid::new_v4(),
            template_id: Uuid::nil(),
            name: "Fetch".into(),
            description: String::new(),
            stages: vec![QuestStage::simple(Objective::Fetch { item_template_id: item, required_quantity: 2 })],
            current_stage_index: 0,
            giver_instance_id: Uuid::nil(),
            rewards: QuestRewards::default(),
            state: QuestState::Active,
            instance_region_id: None,
            entry_point: None,
        };
        let mut inventory = vec![(item, Uuid::new_v4()), (item, Uuid::new_v4()), (item, Uuid::new_v4())];
        let outcome = attempt_turn_in(&mut quest, &mut inventory, |_, _| true, None);
        assert_eq!(outcome, TurnInOutcome::Completed);
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn ensure_initial_quests_fills_to_max() {
        let mut board = Vec::new();
        let mut made = 0;
        ensure_initial_quests(&mut board, 3, |_| {
            made += 1;
            Some(kill_quest(1, Uuid::new_v4()))
        });
        assert_eq!(board.len(), 3);
        assert_eq!(made, 3);
    }
}
