//! Template expansion.
//!
//! A template is expanded into the flat sequence of steps the user walks
//! through: one set instance per planned set, rests between sets, and the
//! template's own rests and notes passed through in order.

use serde::{Deserialize, Serialize};

use super::block::{BlockStatus, PlaybackBlock, RestOrigin};
use super::machine::activate_next;
use super::session::RestTimer;
use crate::error::PlaybackError;
use crate::plan::{PlannedSetLookup, Template, TemplateBlock};

/// Result of [`flatten`]: blocks with exactly one active, plus its timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flattened {
    pub blocks: Vec<PlaybackBlock>,
    pub timer: RestTimer,
}

/// Expand `template` into playback blocks and activate the first actionable one.
///
/// Planned sets are resolved through `lookup` so later edits are honoured;
/// the snapshot embedded in the template is used when the lookup misses.
///
/// # Errors
/// [`PlaybackError::EmptyTemplate`] if the template has no blocks or expands
/// to notes only.
pub fn flatten<L>(template: &Template, lookup: &L) -> Result<Flattened, PlaybackError>
where
    L: PlannedSetLookup + ?Sized,
{
    let mut blocks = Vec::new();

    for block in &template.blocks {
        match block {
            TemplateBlock::PlannedSet(snapshot) => {
                let planned = lookup
                    .planned_set(&snapshot.id)
                    .unwrap_or_else(|| snapshot.clone());
                for set_num in 1..=planned.sets {
                    blocks.push(PlaybackBlock::SetInstance {
                        exercise: planned.exercise.clone(),
                        reps: planned.reps,
                        weight: planned.weight,
                        current_set_num: set_num,
                        total_sets: planned.sets,
                        status: BlockStatus::Pending,
                    });
                    if set_num < planned.sets && planned.rest_time > 0 {
                        blocks.push(PlaybackBlock::Rest {
                            duration: planned.rest_time,
                            actual_duration: None,
                            origin: Some(RestOrigin {
                                exercise: planned.exercise.clone(),
                                set_num,
                            }),
                            status: BlockStatus::Pending,
                        });
                    }
                }
            }
            TemplateBlock::Rest { duration } => blocks.push(PlaybackBlock::Rest {
                duration: *duration,
                actual_duration: None,
                origin: None,
                status: BlockStatus::Pending,
            }),
            TemplateBlock::Note { text } => blocks.push(PlaybackBlock::Note {
                text: text.clone(),
                status: BlockStatus::Pending,
            }),
        }
    }

    if blocks.iter().all(PlaybackBlock::is_note) {
        return Err(PlaybackError::EmptyTemplate);
    }

    let timer = match activate_next(&mut blocks, 0) {
        Some(index) => RestTimer::for_block(&blocks[index]),
        None => return Err(PlaybackError::EmptyTemplate),
    };

    Ok(Flattened { blocks, timer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlannedSet;
    use crate::playback::block::BlockKind;

    fn template(blocks: Vec<TemplateBlock>) -> Template {
        let mut tpl = Template::new("Test").unwrap();
        tpl.blocks = blocks;
        tpl
    }

    fn planned(exercise: &str, sets: u32, rest_time: u32) -> PlannedSet {
        PlannedSet::new(exercise, sets, 5, 80.0, rest_time).unwrap()
    }

    fn kinds(blocks: &[PlaybackBlock]) -> Vec<BlockKind> {
        blocks.iter().map(PlaybackBlock::kind).collect()
    }

    #[test]
    fn three_sets_with_rest_have_no_trailing_rest() {
        let tpl = template(vec![TemplateBlock::PlannedSet(planned("Bench", 3, 60))]);
        let flat = flatten(&tpl, &()).unwrap();

        assert_eq!(
            kinds(&flat.blocks),
            vec![
                BlockKind::SetInstance,
                BlockKind::Rest,
                BlockKind::SetInstance,
                BlockKind::Rest,
                BlockKind::SetInstance,
            ]
        );
        assert_eq!(flat.blocks[0].status(), BlockStatus::Active);
        assert!(flat.blocks[1..]
            .iter()
            .all(|b| b.status() == BlockStatus::Pending));
        let set_nums: Vec<u32> = flat
            .blocks
            .iter()
            .filter_map(|b| match b {
                PlaybackBlock::SetInstance {
                    current_set_num, ..
                } => Some(*current_set_num),
                _ => None,
            })
            .collect();
        assert_eq!(set_nums, vec![1, 2, 3]);
        assert_eq!(flat.timer, RestTimer::idle());
    }

    #[test]
    fn zero_rest_time_inserts_no_rest() {
        let tpl = template(vec![TemplateBlock::PlannedSet(planned("Row", 2, 0))]);
        let flat = flatten(&tpl, &()).unwrap();
        assert_eq!(
            kinds(&flat.blocks),
            vec![BlockKind::SetInstance, BlockKind::SetInstance]
        );
    }

    #[test]
    fn leading_notes_are_completed_immediately() {
        let tpl = template(vec![
            TemplateBlock::Note {
                text: "warm up".into(),
            },
            TemplateBlock::PlannedSet(planned("Squat", 1, 0)),
        ]);
        let flat = flatten(&tpl, &()).unwrap();
        assert_eq!(flat.blocks[0].status(), BlockStatus::Completed);
        assert_eq!(flat.blocks[1].status(), BlockStatus::Active);
    }

    #[test]
    fn leading_rest_starts_the_timer() {
        let tpl = template(vec![
            TemplateBlock::Note { text: "breathe".into() },
            TemplateBlock::Rest { duration: 45 },
            TemplateBlock::PlannedSet(planned("Squat", 1, 0)),
        ]);
        let flat = flatten(&tpl, &()).unwrap();
        assert_eq!(
            flat.timer,
            RestTimer {
                seconds_left: 45,
                initial_rest_duration: 45,
                running: true
            }
        );
        assert_eq!(flat.blocks[1].status(), BlockStatus::Active);
    }

    #[test]
    fn empty_or_note_only_templates_are_rejected() {
        assert!(matches!(
            flatten(&template(vec![]), &()),
            Err(PlaybackError::EmptyTemplate)
        ));
        let notes = template(vec![
            TemplateBlock::Note { text: "a".into() },
            TemplateBlock::Note { text: "b".into() },
        ]);
        assert!(matches!(
            flatten(&notes, &()),
            Err(PlaybackError::EmptyTemplate)
        ));
    }

    #[test]
    fn lookup_overrides_embedded_snapshot() {
        let saved = planned("Press", 2, 30);
        let tpl = template(vec![TemplateBlock::PlannedSet(saved.clone())]);

        let mut edited = saved.clone();
        edited.sets = 4;
        edited.rest_time = 0;
        let flat = flatten(&tpl, &vec![edited]).unwrap();

        assert_eq!(flat.blocks.len(), 4);
        assert!(flat.blocks.iter().all(|b| !b.is_rest()));
    }

    #[test]
    fn rests_record_their_origin() {
        let tpl = template(vec![TemplateBlock::PlannedSet(planned("Curl", 2, 40))]);
        let flat = flatten(&tpl, &()).unwrap();
        match &flat.blocks[1] {
            PlaybackBlock::Rest { origin, .. } => {
                let origin = origin.as_ref().unwrap();
                assert_eq!(origin.exercise, "Curl");
                assert_eq!(origin.set_num, 1);
            }
            other => panic!("expected rest, got {other:?}"),
        }
    }
}
