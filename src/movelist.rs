use crate::r#move::Move;
use arrayvec::ArrayVec;

// No reachable position has more than 218 legal moves
pub const MAX_MOVELIST_CAPACITY: usize = 255;

#[derive(Clone, Debug)]
pub struct MoveList(ArrayVec<Move, MAX_MOVELIST_CAPACITY>);
impl Default for MoveList {
    fn default() -> Self {
        MoveList(ArrayVec::new())
    }
}
impl MoveList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn push(&mut self, m: Move) {
        self.0.push(m)
    }
    pub fn retain<F: FnMut(&Move) -> bool>(&mut self, mut keep: F) {
        self.0.retain(|m| keep(m))
    }
    pub fn append(&mut self, other: &MoveList) {
        for m in other {
            self.push(*m)
        }
    }
    pub fn as_slice(&self) -> &[Move] {
        self.0.as_slice()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}
impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
