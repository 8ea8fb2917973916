/// Keeps the current value of some irreversible state alongside the values it replaced,
/// so move application can push and move undo can pop.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StateStack<T> {
    current: T,
    history: Vec<T>,
}

impl<T: Clone> StateStack<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn push(&mut self, value: T) {
        let previous = std::mem::replace(&mut self.current, value);
        self.history.push(previous);
    }

    pub fn peek(&self) -> &T {
        &self.current
    }

    /// Restores the previous value and returns the one it replaced, or `None` when
    /// nothing has been pushed.
    pub fn pop(&mut self) -> Option<T> {
        let previous = self.history.pop()?;
        Some(std::mem::replace(&mut self.current, previous))
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = StateStack::new(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(*stack.peek(), 3);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(*stack.peek(), 1);
        assert_eq!(stack.pop(), None);
        assert_eq!(*stack.peek(), 1);
    }
}
