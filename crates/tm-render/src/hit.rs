//! Hit testing: cell → token lookup.
//!
//! Walks tokens front-to-back (the reverse of paint order, with the
//! selected token first since it paints last) and returns the first whose
//! footprint covers the cell.

use tm_core::{EntityId, GridPos, Token};

/// Find the topmost token covering `cell`. Hidden tokens are only hittable
/// in GM view. Returns `None` for an empty collection or an empty cell.
pub fn hit_test_tokens(
    tokens: &[Token],
    cell: GridPos,
    selected: Option<EntityId>,
    is_dm_view: bool,
) -> Option<EntityId> {
    let hittable = |t: &Token| (t.is_visible || is_dm_view) && t.occupies(cell);

    if let Some(id) = selected
        && tokens.iter().any(|t| t.id == id && hittable(t))
    {
        return Some(id);
    }

    tokens.iter().rev().find(|t| hittable(*t)).map(|t| t.id)
}

/// All tokens covering `cell`, topmost first.
pub fn tokens_at(tokens: &[Token], cell: GridPos, is_dm_view: bool) -> Vec<EntityId> {
    tokens
        .iter()
        .rev()
        .filter(|t| (t.is_visible || is_dm_view) && t.occupies(cell))
        .map(|t| t.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::CreatureSize;

    fn token(id: &str, x: i32, y: i32) -> Token {
        Token::new(EntityId::intern(id), x, y)
    }

    #[test]
    fn empty_collection_misses() {
        assert_eq!(hit_test_tokens(&[], GridPos::new(0, 0), None, false), None);
    }

    #[test]
    fn later_tokens_are_on_top() {
        let tokens = [token("a", 2, 2), token("b", 2, 2)];
        assert_eq!(
            hit_test_tokens(&tokens, GridPos::new(2, 2), None, false),
            Some(EntityId::intern("b"))
        );
        assert_eq!(tokens_at(&tokens, GridPos::new(2, 2), false).len(), 2);
    }

    #[test]
    fn selected_token_wins() {
        let tokens = [token("a", 2, 2), token("b", 2, 2)];
        let a = EntityId::intern("a");
        assert_eq!(hit_test_tokens(&tokens, GridPos::new(2, 2), Some(a), false), Some(a));
        // Selection elsewhere doesn't steal the hit.
        assert_eq!(
            hit_test_tokens(&tokens, GridPos::new(5, 5), Some(a), false),
            None
        );
    }

    #[test]
    fn footprint_aware() {
        let mut dragon = token("dragon", 4, 4);
        dragon.size = CreatureSize::Huge;
        let tokens = [dragon];
        assert!(hit_test_tokens(&tokens, GridPos::new(6, 6), None, false).is_some());
        assert!(hit_test_tokens(&tokens, GridPos::new(7, 6), None, false).is_none());
    }

    #[test]
    fn hidden_tokens_need_dm_view() {
        let mut spy = token("spy", 1, 1);
        spy.is_visible = false;
        let tokens = [spy];
        assert_eq!(hit_test_tokens(&tokens, GridPos::new(1, 1), None, false), None);
        assert!(hit_test_tokens(&tokens, GridPos::new(1, 1), None, true).is_some());
    }
}
