use bevy_ecs::{
    entity::Entity,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use tracing::debug;

use crate::constants::mechanics::MAX_INPUT_LEN;
use crate::systems::{Enemy, GameStage, ScoreResource};

/// Keystrokes typed since the last match or clear.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends `c` if it is printable and the buffer has room. Returns whether it was accepted.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.text.chars().count() >= MAX_INPUT_LEN {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

impl From<&str> for InputBuffer {
    fn from(text: &str) -> Self {
        let mut buffer = Self::default();
        for c in text.chars() {
            buffer.push(c);
        }
        buffer
    }
}

/// Whether `input` spells `label` exactly, ignoring case. Empty input never matches.
pub fn matches(label: &str, input: &str) -> bool {
    !input.is_empty() && label.to_lowercase() == input.to_lowercase()
}

/// Splits `entities` into those whose label matches `input` and the rest, preserving order.
pub fn partition_matches<T, F>(entities: Vec<T>, input: &str, label: F) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> &str,
{
    if input.is_empty() {
        return (Vec::new(), entities);
    }
    entities.into_iter().partition(|entity| matches(label(entity), input))
}

/// Removes every entity matching the buffer.
///
/// Returns the survivors and how many were removed; the buffer is cleared only if something matched.
pub fn resolve<T, F>(entities: Vec<T>, input: &mut InputBuffer, label: F) -> (Vec<T>, usize)
where
    F: Fn(&T) -> &str,
{
    let (matched, surviving) = partition_matches(entities, input.as_str(), label);
    if !matched.is_empty() {
        input.clear();
    }
    (surviving, matched.len())
}

/// Despawns enemies whose label was typed and awards a point for each.
///
/// Runs after collisions, so a run that ended earlier in the same tick scores nothing more.
pub fn typing_system(
    mut commands: Commands,
    stage: Res<GameStage>,
    mut input: ResMut<InputBuffer>,
    mut score: ResMut<ScoreResource>,
    query: Query<(Entity, &Enemy)>,
) {
    if *stage != GameStage::Playing || input.is_empty() {
        return;
    }

    let live: Vec<(Entity, &Enemy)> = query.iter().collect();
    let (matched, _) = partition_matches(live, input.as_str(), |(_, enemy)| enemy.label.as_str());
    if matched.is_empty() {
        return;
    }

    for (entity, enemy) in &matched {
        debug!(label = %enemy.label, ?entity, "Enemy defeated");
        commands.entity(*entity).despawn();
    }

    score.award(matched.len() as u32);
    input.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_case() {
        assert!(matches("PogChamp", "pogchamp"));
        assert!(!matches("PogChamp", "pog"));
        assert!(!matches("PogChamp", ""));
    }

    #[test]
    fn test_push_rejects_control_and_overflow() {
        let mut buffer = InputBuffer::default();
        assert!(!buffer.push('\n'));
        for _ in 0..MAX_INPUT_LEN {
            assert!(buffer.push('a'));
        }
        assert!(!buffer.push('a'));
        assert_eq!(buffer.as_str().len(), MAX_INPUT_LEN);
    }
}
